use anyhow::{Context, Result};
use bridge_kit_core::WizardState;
use bridge_kit_generator::{download_file_name, render_page};
use bridge_kit_validator::validate_page;
use std::fs;
use std::path::{Path, PathBuf};

use super::load_page;
use super::validate::print_report;

/// Render a page directory to `<output>/bridge-page-<path>.html`
pub async fn run(path: PathBuf, output: PathBuf) -> Result<()> {
    println!("🔨 Building bridge page...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    let page = load_page(&path)?;
    println!("✓ Loaded: {}", page.path());

    let report = validate_page(&page);
    if !report.is_valid() {
        print_report(&report);
        anyhow::bail!("Fix the errors above before building");
    }

    println!("📄 Rendering page...");
    let file = write_page(&page, &output)?;
    println!("   ✓ Generated {}", file.display());

    println!();
    println!("✅ Build complete!");
    println!("   Open {} in a browser or upload it to your host", file.display());
    println!();

    Ok(())
}

pub fn write_page(page: &WizardState, output: &Path) -> Result<PathBuf> {
    let request = page.publish_request()?;
    let html = render_page(&request.page);

    fs::create_dir_all(output).context("Failed to create output directory")?;
    let file = output.join(download_file_name(&request.path));
    fs::write(&file, html).with_context(|| format!("Failed to write {}", file.display()))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::PAGE_FILE;
    use tempfile::TempDir;

    const PAGE: &str = r#"
sales_page_url = "https://warriorplus.com/o2/a/example"
path = "my-page"
headlines = ["Stop Struggling Today"]
benefits = ["Save time", ""]
affiliate_link = "https://x.test/a"
"#;

    #[tokio::test]
    async fn test_build_writes_download_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PAGE_FILE), PAGE).unwrap();
        let out = dir.path().join("dist");

        run(dir.path().to_path_buf(), out.clone()).await.unwrap();

        let html = fs::read_to_string(out.join("bridge-page-my-page.html")).unwrap();
        assert!(html.contains("Stop Struggling Today"));
        assert!(html.contains(r#"href="https://x.test/a""#));
        assert_eq!(html.matches(r#"class="benefit-item""#).count(), 1);
    }

    #[tokio::test]
    async fn test_build_refuses_invalid_page() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PAGE_FILE),
            PAGE.replace("https://x.test/a", ""),
        )
        .unwrap();
        let out = dir.path().join("dist");

        assert!(run(dir.path().to_path_buf(), out.clone()).await.is_err());
        assert!(!out.exists());
    }
}
