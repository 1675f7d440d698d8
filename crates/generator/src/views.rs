// Pages served by the preview server around the stored bridge pages.

use crate::html_escape;

const RELOAD_SCRIPT: &str = r#"<script>
        // Hot reload via Server-Sent Events
        const eventSource = new EventSource('/_reload');
        eventSource.onmessage = () => {
            console.log('Reloading...');
            location.reload();
        };
        eventSource.onerror = () => {
            console.log('Preview server disconnected');
            eventSource.close();
        };
    </script>"#;

/// Host part of a base URL, for display ("https://clickhumble.com/" -> "clickhumble.com")
fn display_host(base_url: &str) -> &str {
    base_url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

/// Wrap a stored page in a sandboxed, full-window iframe.
///
/// The page is passed through `srcdoc`, so its styles and scripts cannot
/// reach the preview chrome.
pub fn render_preview_frame(path: &str, page_html: &str, live_reload: bool) -> String {
    let reload = if live_reload { RELOAD_SCRIPT } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Preview: {path}</title>
    <style>
        html, body {{ margin: 0; padding: 0; height: 100%; }}
        iframe {{ width: 100%; height: 100%; border: 0; display: block; }}
    </style>
</head>
<body>
    <iframe srcdoc="{srcdoc}" title="Bridge Page Preview" sandbox="allow-scripts allow-same-origin"></iframe>
    {reload}
</body>
</html>"#,
        path = html_escape(path),
        srcdoc = html_escape(page_html),
        reload = reload,
    )
}

/// Error view for a path with nothing published under it
pub fn render_not_found(path: &str) -> String {
    let escaped_path = html_escape(path);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Preview Error</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            background: #f9fafb;
            color: #1f2937;
            display: flex;
            align-items: center;
            justify-content: center;
            min-height: 100vh;
            margin: 0;
            padding: 1rem;
        }}
        .card {{
            max-width: 28rem;
            background: white;
            border-radius: 8px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            padding: 1.5rem;
            text-align: center;
        }}
        h2 {{ color: #dc2626; margin-top: 0; }}
        .help {{
            background: #f9fafb;
            border: 1px solid #e5e7eb;
            border-radius: 4px;
            padding: 1rem;
            text-align: left;
            font-size: 0.9rem;
            margin-bottom: 1.5rem;
        }}
        .actions {{ display: flex; justify-content: center; gap: 1rem; }}
        .btn {{
            padding: 0.5rem 1rem;
            border-radius: 4px;
            border: 0;
            font-size: 1rem;
            cursor: pointer;
            text-decoration: none;
        }}
        .btn-primary {{ background: #2563eb; color: white; }}
        .btn-secondary {{ background: #e5e7eb; color: #1f2937; }}
    </style>
</head>
<body>
    <div class="card">
        <h2>Preview Error</h2>
        <p>Page not found. It may have been deleted or not published yet.</p>
        <p>Requested path: <code>{path}</code></p>
        <div class="help">
            <p><strong>Troubleshooting steps:</strong></p>
            <ul>
                <li>Make sure you've published the page</li>
                <li>Check that the path URL is correct</li>
                <li>Try refreshing the page</li>
                <li>Go back to the publish step and try again</li>
            </ul>
        </div>
        <div class="actions">
            <a class="btn btn-primary" href="/preview/{path}">Try Again</a>
            <button class="btn btn-secondary" onclick="history.back()">Go Back</button>
        </div>
    </div>
</body>
</html>"#,
        path = escaped_path,
    )
}

/// Stand-in shown in the embedded pane before a page has been published
pub fn render_placeholder(path: &str, base_url: &str) -> String {
    let shown_path = if path.is_empty() { "your-path" } else { path };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Bridge Page Preview</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            margin: 0;
            padding: 0;
            background-color: #f9fafb;
            color: #1f2937;
            line-height: 1.6;
        }}
        .container {{
            max-width: 1200px;
            margin: 0 auto;
            padding: 2rem;
            text-align: center;
        }}
        h1 {{ font-size: 1.8rem; margin-bottom: 1rem; color: #4f46e5; }}
        .preview-box {{
            background-color: white;
            border: 1px dashed #d1d5db;
            border-radius: 8px;
            padding: 2rem;
            margin: 2rem 0;
        }}
        .path {{ font-weight: bold; color: #4f46e5; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Bridge Page Preview</h1>
        <p>This is a preview of how your bridge page will look when published.</p>
        <div class="preview-box">
            <p>Your page will be published at:</p>
            <p class="path">{host}/{path}</p>
            <p>Run <code>bridge-kit publish</code> to make your page live.</p>
        </div>
    </div>
</body>
</html>"#,
        host = html_escape(display_host(base_url)),
        path = html_escape(shown_path),
    )
}

/// Landing page of the preview server listing every published path
pub fn render_index(paths: &[String], base_url: &str, live_reload: bool) -> String {
    let host = html_escape(display_host(base_url));

    let items_html = if paths.is_empty() {
        r#"<p class="empty">No pages published yet. Run <code>bridge-kit publish &lt;dir&gt;</code> or <code>bridge-kit wizard</code>.</p>"#
            .to_string()
    } else {
        let items: String = paths
            .iter()
            .map(|path| {
                let escaped = html_escape(path);
                format!(
                    r#"
            <li>
                <a href="/preview/{p}">{host}/{p}</a>
                <span class="raw">(<a href="/pages/{p}">raw</a>)</span>
            </li>"#,
                    p = escaped,
                    host = host,
                )
            })
            .collect();
        format!("<ul>{}\n        </ul>", items)
    };

    let preview_badge = if live_reload {
        r#"<div class="preview-badge">🚀 PREVIEW MODE - Live Reload Active</div>"#
    } else {
        ""
    };
    let reload = if live_reload { RELOAD_SCRIPT } else { "" };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Published Bridge Pages</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            background: #f5f5f5;
            padding: 2rem;
        }}
        .container {{
            max-width: 800px;
            margin: 0 auto;
            background: white;
            padding: 2rem;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0,0,0,0.1);
        }}
        .preview-badge {{
            background: #4f46e5;
            color: white;
            padding: 0.5rem 1rem;
            border-radius: 4px;
            display: inline-block;
            margin-bottom: 1rem;
            font-weight: bold;
        }}
        h1 {{ font-size: 1.6rem; margin-bottom: 1rem; }}
        ul {{ list-style: none; }}
        li {{ padding: 0.75rem 0; border-bottom: 1px solid #eee; }}
        li:last-child {{ border-bottom: none; }}
        .raw {{ color: #999; font-size: 0.9rem; margin-left: 0.5rem; }}
        .empty {{ color: #666; }}
    </style>
</head>
<body>
    <div class="container">
        {badge}
        <h1>Published Bridge Pages ({count})</h1>
        {items}
    </div>
    {reload}
</body>
</html>"#,
        badge = preview_badge,
        count = paths.len(),
        items = items_html,
        reload = reload,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_frame_embeds_escaped_page() {
        let page = r#"<!DOCTYPE html><html><body><a href="https://x.test/a">Go</a></body></html>"#;
        let html = render_preview_frame("my-page", page, false);

        assert!(html.contains(r#"sandbox="allow-scripts allow-same-origin""#));
        assert!(html.contains(
            "srcdoc=\"&lt;!DOCTYPE html&gt;&lt;html&gt;&lt;body&gt;&lt;a href=&quot;https://x.test/a&quot;&gt;"
        ));
        assert!(!html.contains("EventSource"));
        assert!(html.contains("<title>Preview: my-page</title>"));
    }

    #[test]
    fn test_preview_frame_live_reload() {
        let html = render_preview_frame("my-page", "<p>hi</p>", true);
        assert!(html.contains("new EventSource('/_reload')"));
    }

    #[test]
    fn test_not_found_view() {
        let html = render_not_found("missing-page");
        assert!(html.contains("Preview Error"));
        assert!(html.contains("Page not found"));
        assert!(html.contains("Troubleshooting steps"));
        assert!(html.contains(r#"href="/preview/missing-page">Try Again</a>"#));
        assert!(html.contains("history.back()"));
    }

    #[test]
    fn test_not_found_escapes_path() {
        let html = render_not_found("<x>");
        assert!(html.contains("<code>&lt;x&gt;</code>"));
        assert!(!html.contains("<x>"));
    }

    #[test]
    fn test_placeholder() {
        let html = render_placeholder("my-page", "https://clickhumble.com/");
        assert!(html.contains(r#"<p class="path">clickhumble.com/my-page</p>"#));

        let html = render_placeholder("", "https://clickhumble.com");
        assert!(html.contains("clickhumble.com/your-path"));
    }

    #[test]
    fn test_index_lists_paths() {
        let paths = vec!["alpha-page".to_string(), "beta-page".to_string()];
        let html = render_index(&paths, "https://clickhumble.com", true);

        assert!(html.contains("Published Bridge Pages (2)"));
        assert!(html.contains(r#"<a href="/preview/alpha-page">clickhumble.com/alpha-page</a>"#));
        assert!(html.contains(r#"<a href="/pages/beta-page">raw</a>"#));
        assert!(html.contains("PREVIEW MODE"));
    }

    #[test]
    fn test_index_empty() {
        let html = render_index(&[], "https://clickhumble.com", false);
        assert!(html.contains("No pages published yet"));
        assert!(!html.contains("PREVIEW MODE"));
    }
}
