use bridge_kit_core::types::PageRenderInput;
use url::Url;

use crate::html_escape;

/// File name offered when a page is downloaded instead of published
pub fn download_file_name(path: &str) -> String {
    format!("bridge-page-{}.html", path)
}

/// Turn a YouTube watch/short link into its embeddable form.
///
/// - `https://www.youtube.com/watch?v=ID` → `https://www.youtube.com/embed/ID`
/// - `https://youtu.be/ID` → `https://www.youtube.com/embed/ID`
/// - `https://www.youtube.com/shorts/ID` → `https://www.youtube.com/embed/ID`
///
/// Anything else (including links that are already embeds) is returned
/// unchanged.
pub fn embed_video_url(video_url: &str) -> String {
    let trimmed = video_url.trim();
    let Ok(url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let mut segments = url.path_segments().into_iter().flatten();

    let video_id = match host.as_str() {
        "youtu.be" => segments.next().map(str::to_string),
        "youtube.com" | "www.youtube.com" | "m.youtube.com" => match segments.next() {
            Some("watch") => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some("shorts") => segments.next().map(str::to_string),
            _ => None,
        },
        _ => None,
    };

    match video_id.filter(|id| !id.is_empty()) {
        Some(id) => format!("https://www.youtube.com/embed/{}", id),
        None => trimmed.to_string(),
    }
}

/// Render a complete, self-contained bridge page.
///
/// Output depends only on `input`: rendering the same input twice gives
/// byte-identical documents. The video block is emitted only for a
/// non-blank video URL and the bonuses section only when at least one
/// bonus is selected. Exactly one call-to-action anchor is emitted.
pub fn render_page(input: &PageRenderInput) -> String {
    let headline = html_escape(&input.headline);

    let color_vars: String = input
        .color_scheme
        .entries()
        .map(|(role, value)| format!("      --{}: {};\n", role.name(), html_escape(value)))
        .collect();

    let video_html = match input.video_url.as_deref().map(str::trim) {
        Some(video) if !video.is_empty() => format!(
            r#"
    <div class="video-container">
      <iframe src="{}" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe>
    </div>
"#,
            html_escape(&embed_video_url(video))
        ),
        _ => String::new(),
    };

    let benefits_html: String = input
        .benefits
        .iter()
        .map(|benefit| {
            format!(
                "\n      <div class=\"benefit-item\">{}</div>",
                html_escape(benefit)
            )
        })
        .collect();

    let bonuses_html = if input.selected_bonuses.is_empty() {
        String::new()
    } else {
        let items: String = input
            .selected_bonuses
            .iter()
            .map(|bonus| {
                format!(
                    r#"
      <div class="bonus-item">
        <div class="bonus-title">{}</div>
        <div class="bonus-description">{}</div>
      </div>"#,
                    html_escape(&bonus.title),
                    html_escape(&bonus.description)
                )
            })
            .collect();
        format!(
            r#"
    <div class="bonuses">
      <h2>Exclusive Bonuses:</h2>{}
    </div>
"#,
            items
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{headline}</title>
  <style>
    :root {{
{color_vars}    }}
    body {{
      font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
      margin: 0;
      padding: 0;
      background-color: var(--background);
      color: var(--text);
      line-height: 1.6;
    }}
    .container {{
      max-width: 1200px;
      margin: 0 auto;
      padding: 2rem;
    }}
    header {{
      text-align: center;
      padding: 2rem 0;
    }}
    h1 {{
      font-size: 2.5rem;
      margin-bottom: 1rem;
      color: var(--primary);
    }}
    .video-container {{
      position: relative;
      padding-bottom: 56.25%; /* 16:9 */
      height: 0;
      overflow: hidden;
      max-width: 100%;
      margin: 2rem 0;
    }}
    .video-container iframe {{
      position: absolute;
      top: 0;
      left: 0;
      width: 100%;
      height: 100%;
    }}
    .benefits {{
      margin: 2rem 0;
    }}
    .benefit-item {{
      display: flex;
      align-items: center;
      margin-bottom: 1rem;
    }}
    .benefit-item:before {{
      content: "✓";
      display: inline-block;
      color: var(--secondary);
      font-weight: bold;
      margin-right: 1rem;
    }}
    .bonuses {{
      background-color: rgba(0,0,0,0.05);
      padding: 2rem;
      border-radius: 8px;
      margin: 2rem 0;
    }}
    .bonus-item {{
      margin-bottom: 1.5rem;
    }}
    .bonus-title {{
      font-weight: bold;
      color: var(--accent);
      margin-bottom: 0.5rem;
    }}
    .cta-button {{
      display: block;
      background-color: var(--primary);
      color: white;
      text-align: center;
      padding: 1rem 2rem;
      font-size: 1.2rem;
      text-decoration: none;
      border-radius: 4px;
      margin: 2rem auto;
      max-width: 300px;
      font-weight: bold;
    }}
    footer {{
      text-align: center;
      margin-top: 3rem;
      padding: 1rem;
      font-size: 0.9rem;
      color: rgba(0,0,0,0.6);
    }}
  </style>
</head>
<body>
  <div class="container">
    <header>
      <h1>{headline}</h1>
    </header>
{video_html}
    <div class="benefits">
      <h2>Here's What You'll Get:</h2>{benefits_html}
    </div>
{bonuses_html}
    <a href="{affiliate_link}" class="cta-button">Get Instant Access Now</a>

    <footer>
      <p>This page was created with ClickHumble Bridge Page Creator</p>
    </footer>
  </div>
</body>
</html>
"#,
        headline = headline,
        color_vars = color_vars,
        video_html = video_html,
        benefits_html = benefits_html,
        bonuses_html = bonuses_html,
        affiliate_link = html_escape(&input.affiliate_link),
    )
}
