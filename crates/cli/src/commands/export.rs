use anyhow::{Context, Result};
use bridge_kit_core::ExportReceipt;
use bridge_kit_generator::render_page;
use std::path::{Path, PathBuf};

use super::{Workspace, load_page};

/// Send a page directory to WordPress as a post
pub async fn run(path: PathBuf, no_delay: bool) -> Result<()> {
    let ws = Workspace::load(no_delay)?;
    export_in(&ws, &path).await.map(|_| ())
}

pub async fn export_in(ws: &Workspace, path: &Path) -> Result<ExportReceipt> {
    println!("📤 Exporting bridge page to WordPress...");

    let page = load_page(path)?;
    let collaborators = ws.collaborators(ws.store().await?);
    let receipt = page
        .export_wordpress(collaborators.exporter.as_ref(), render_page)
        .await
        .context("WordPress export failed")?;

    println!("   ✓ {}", receipt.message);
    Ok(receipt)
}
