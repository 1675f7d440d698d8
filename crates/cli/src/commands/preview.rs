use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use bridge_kit_core::rules::validate_path;
use bridge_kit_deployer::PublishStore;
use bridge_kit_generator::{
    html_escape, render_index, render_not_found, render_placeholder, render_preview_frame,
};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::Workspace;

#[derive(Clone)]
pub struct AppState {
    store: PublishStore,
    base_url: String,
    live_reload: bool,
    reload_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(store: PublishStore, base_url: &str, live_reload: bool) -> Self {
        let (reload_tx, _) = broadcast::channel::<()>(100);
        Self {
            store,
            base_url: base_url.to_string(),
            live_reload,
            reload_tx,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/preview/{path}", get(preview_handler))
        .route("/pages/{path}", get(page_handler))
        .route("/embed/{path}", get(embed_handler))
        .route("/_reload", get(sse_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve published pages with hot reload.
///
/// Pages are read from the on-disk store on every request, so anything
/// published from another terminal shows up immediately; open browser tabs
/// reload when the store directory changes.
pub async fn run(port: Option<u16>) -> Result<()> {
    let ws = Workspace::load(false)?;
    let file_store = ws.file_store().await?;
    let store_dir = file_store.dir().to_path_buf();
    let store = PublishStore::new(Arc::new(file_store));
    let port = port.unwrap_or(ws.settings.preview.port);

    println!("🔎 Starting preview server...");
    println!("   Store: {}", store_dir.display());
    let published = store.list().await?;
    println!("   ✓ Published pages: {}", published.len());

    let state = AppState::new(store, ws.settings.base_url(), true);
    let watcher_tx = state.reload_tx.clone();
    let app = router(state);

    tokio::spawn(async move {
        if let Err(e) = watch_files(store_dir, watcher_tx).await {
            error!("File watcher error: {}", e);
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    for path in &published {
        println!("   http://localhost:{}/preview/{}", port, path);
    }
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;
    info!(%addr, "preview server listening");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Watch the store directory and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Staging files are hidden; only react once a page lands
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    println!("   📝 Store changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            match rx.recv().await {
                Ok(()) => yield Ok(Event::default().data("reload")),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Stored HTML for a path; malformed paths can never have been published
async fn lookup(state: &AppState, path: &str) -> bridge_kit_core::Result<Option<String>> {
    if validate_path(path).is_err() {
        return Ok(None);
    }
    match state.store.get(path).await {
        Ok(html) => Ok(Some(html)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn server_error(err: bridge_kit_core::Error) -> Response {
    error!("preview request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(format!(
            r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Store Error</h1>
<pre>{}</pre>
</body></html>"#,
            html_escape(&err.to_string())
        )),
    )
        .into_response()
}

fn not_found(path: &str) -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found(path))).into_response()
}

async fn index_handler(State(state): State<AppState>) -> Response {
    match state.store.list().await {
        Ok(paths) => Html(render_index(&paths, &state.base_url, state.live_reload)).into_response(),
        Err(e) => server_error(e),
    }
}

/// The preview route: stored page inside a sandboxed frame, or the error view
async fn preview_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match lookup(&state, &path).await {
        Ok(Some(html)) => {
            Html(render_preview_frame(&path, &html, state.live_reload)).into_response()
        }
        Ok(None) => not_found(&path),
        Err(e) => server_error(e),
    }
}

/// Raw stored document
async fn page_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match lookup(&state, &path).await {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => not_found(&path),
        Err(e) => server_error(e),
    }
}

/// Stored document, or a placeholder naming where it will be published
async fn embed_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    match lookup(&state, &path).await {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => Html(render_placeholder(&path, &state.base_url)).into_response(),
        Err(e) => server_error(e),
    }
}
