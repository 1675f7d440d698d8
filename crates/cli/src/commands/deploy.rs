use anyhow::{Context, Result};
use bridge_kit_core::PublishReceipt;
use bridge_kit_validator::validate_page;
use std::path::{Path, PathBuf};

use super::validate::print_report;
use super::{Workspace, load_page, read_input};

/// Publish a page directory to the local store
pub async fn publish(path: PathBuf, force: bool, no_delay: bool) -> Result<()> {
    let ws = Workspace::load(no_delay)?;
    publish_in(&ws, &path, force).await.map(|_| ())
}

/// Returns `None` when the user declines the confirmation prompt
pub async fn publish_in(ws: &Workspace, path: &Path, force: bool) -> Result<Option<PublishReceipt>> {
    println!("🚀 Publishing bridge page...\n");

    let page = load_page(path)?;
    let report = validate_page(&page);
    if !report.is_valid() {
        print_report(&report);
        anyhow::bail!(
            "Fix the errors above, then run 'bridge-kit publish {}' again",
            path.display()
        );
    }

    let store = ws.store().await?;

    println!("📋 Publish Plan:");
    println!("   Path: {}", page.path());
    println!("   Headline: {}", page.selected_headline().unwrap_or_default());
    println!("   URL: {}/{}", ws.settings.base_url(), page.path());
    println!("   Store: {}", ws.data_dir().display());
    for warning in &report.warnings {
        println!("   ⚠ {}", warning);
    }
    println!();

    if store.contains(page.path()).await? {
        println!("   ✓ Page exists - will replace");
    } else {
        println!("   ℹ️  Page doesn't exist - will create");
    }
    println!();

    if !force {
        let input = read_input("❓ Publish this page? (y/N): ")?;
        if !input.eq_ignore_ascii_case("y") {
            println!("❌ Publish cancelled");
            return Ok(None);
        }
        println!();
    }

    println!("☁️  Publishing...");
    let collaborators = ws.collaborators(store);
    let receipt = page
        .publish(collaborators.publisher.as_ref())
        .await
        .context("Publish failed")?;

    println!("   ✓ {}", receipt.message);
    println!();
    println!("✅ Publish complete!");
    println!("   Live URL: {}", receipt.url);
    println!(
        "   Preview: http://localhost:{}{}",
        ws.settings.preview.port, receipt.preview_url
    );
    println!(
        "   Published at: {}",
        receipt.published_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(Some(receipt))
}

/// Remove a published page
pub async fn unpublish(path: String, force: bool, no_delay: bool) -> Result<()> {
    let ws = Workspace::load(no_delay)?;
    unpublish_in(&ws, &path, force).await.map(|_| ())
}

/// Returns whether a page was removed
pub async fn unpublish_in(ws: &Workspace, path: &str, force: bool) -> Result<bool> {
    println!("🗑️  Removing published page...\n");

    let store = ws.store().await?;
    if !store.contains(path).await? {
        println!("   ℹ️  Nothing published at '{}' - nothing to delete", path);
        return Ok(false);
    }

    println!("⚠️  WARNING: This will permanently delete:");
    println!("   {}/{}", ws.settings.base_url(), path);
    println!();

    if !force {
        println!("⚠️  Type the path to confirm deletion:");
        let input = read_input("   > ")?;
        if input != path {
            println!("❌ Path doesn't match. Unpublish cancelled.");
            return Ok(false);
        }
    }

    store.delete(path).await?;
    println!("✅ Page '{}' has been removed", path);
    Ok(true)
}

/// Print every published page
pub async fn list() -> Result<()> {
    let ws = Workspace::load(false)?;
    let paths = ws.store().await?.list().await?;

    if paths.is_empty() {
        println!("No pages published yet.");
        println!("Try: bridge-kit publish <page-dir> or bridge-kit wizard");
        return Ok(());
    }

    println!("📄 Published pages ({}):", paths.len());
    for path in &paths {
        println!("   {}/{}", ws.settings.base_url(), path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::PAGE_FILE;
    use std::fs;
    use tempfile::TempDir;

    const PAGE: &str = r#"
sales_page_url = "https://jvzoo.com/c/1/2"
path = "my-page"
headlines = ["Stop Struggling Today"]
benefits = ["Save time"]
affiliate_link = "https://x.test/a"
"#;

    fn setup() -> (TempDir, Workspace, PathBuf) {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::load_from(dir.path().join("home"), true).unwrap();
        let page_dir = dir.path().join("page");
        fs::create_dir_all(&page_dir).unwrap();
        fs::write(page_dir.join(PAGE_FILE), PAGE).unwrap();
        (dir, ws, page_dir)
    }

    #[tokio::test]
    async fn test_publish_then_unpublish() {
        let (_dir, ws, page_dir) = setup();

        let receipt = publish_in(&ws, &page_dir, true).await.unwrap().unwrap();
        assert_eq!(receipt.url, "https://clickhumble.com/my-page");
        assert_eq!(receipt.preview_url, "/preview/my-page");
        assert!(!receipt.replaced);

        let store = ws.store().await.unwrap();
        let html = store.get("my-page").await.unwrap();
        assert!(html.contains("Stop Struggling Today"));
        assert!(ws.data_dir().join("bridge_page_my-page.html").exists());

        let again = publish_in(&ws, &page_dir, true).await.unwrap().unwrap();
        assert!(again.replaced);

        assert!(unpublish_in(&ws, "my-page", true).await.unwrap());
        assert!(store.get("my-page").await.unwrap_err().is_not_found());
        assert!(!unpublish_in(&ws, "my-page", true).await.unwrap());
    }

    #[tokio::test]
    async fn test_publish_refuses_invalid_page() {
        let (_dir, ws, page_dir) = setup();
        fs::write(page_dir.join(PAGE_FILE), PAGE.replace("my-page", "-bad")).unwrap();

        assert!(publish_in(&ws, &page_dir, true).await.is_err());
        assert!(ws.store().await.unwrap().list().await.unwrap().is_empty());
    }
}
