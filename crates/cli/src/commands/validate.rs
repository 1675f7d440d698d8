use anyhow::Result;
use bridge_kit_validator::{ValidationReport, validate_page};
use std::path::PathBuf;

use super::load_page;

pub async fn run(path: PathBuf) -> Result<()> {
    println!("Validating bridge page at: {}", path.display());

    let page = load_page(&path)?;
    println!("✓ page.toml valid");
    println!("  Path: {}", page.path());
    println!(
        "  Headline: {}",
        page.selected_headline().unwrap_or_default()
    );
    println!();

    let report = validate_page(&page);
    print_report(&report);

    if !report.is_valid() {
        anyhow::bail!("{} error(s) found", report.errors.len());
    }
    println!("\n✅ Ready to publish");
    Ok(())
}

pub fn print_report(report: &ValidationReport) {
    for error in &report.errors {
        println!("  ✗ {}", error);
    }
    for warning in &report.warnings {
        println!("  ⚠ {}", warning);
    }
    for info in &report.info {
        println!("  • {}", info);
    }
}
