// Whole-page checks run before a page is built or published.

use bridge_kit_core::rules::{self, MIN_AVAILABLE_PATH_LEN};
use bridge_kit_core::{ColorRole, WizardState};
use regex::Regex;
use std::sync::LazyLock;

/// Bracketed template text such as `[Product Name]`
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]").expect("valid placeholder regex"));

const RECOMMENDED_BONUSES: std::ops::RangeInclusive<usize> = 3..=5;

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a page against every publish-blocking rule, plus softer advice.
pub fn validate_page(page: &WizardState) -> ValidationReport {
    let mut report = ValidationReport::default();

    // Errors
    if let Err(e) = rules::validate_sales_page_url(page.sales_page_url()) {
        report.errors.push(e.user_message());
    }
    if let Err(e) = rules::validate_path(page.path()) {
        report.errors.push(e.user_message());
    }
    let headline = page.selected_headline().unwrap_or_default();
    if headline.trim().is_empty() {
        report.errors.push("Headline is required".to_string());
    }
    if page.affiliate_link().is_empty() {
        report.errors.push("Affiliate link is required".to_string());
    }
    for role in ColorRole::ALL {
        if let Err(e) = rules::validate_color(page.color_scheme().get(role)) {
            report.errors.push(format!("{} colour: {}", role, e.user_message()));
        }
    }

    // Warnings
    if let Some(placeholder) = PLACEHOLDER.find(headline) {
        report.warnings.push(format!(
            "Headline still contains the placeholder {}",
            placeholder.as_str()
        ));
    }
    if !page.affiliate_link().is_empty() && !rules::is_https(page.affiliate_link()) {
        report
            .warnings
            .push("Affiliate link does not use https".to_string());
    }
    let video = page.video_url().trim();
    if !video.is_empty() && !rules::is_https(video) {
        report.warnings.push("Video URL does not use https".to_string());
    }
    let selected = page.selected_bonuses().count();
    if selected == 0 {
        report.warnings.push("No bonuses selected".to_string());
    } else if !RECOMMENDED_BONUSES.contains(&selected) {
        report.warnings.push(format!(
            "{} bonuses selected; 3-5 bonuses usually convert best",
            selected
        ));
    }
    let blank = page.benefits().iter().filter(|b| b.trim().is_empty()).count();
    if blank > 0 {
        report
            .warnings
            .push(format!("{} blank benefit(s) will be left out", blank));
    }
    if !page.path().is_empty() && page.path().chars().count() <= MIN_AVAILABLE_PATH_LEN {
        report.warnings.push(format!(
            "Path '{}' is {} characters or fewer and will be reported as taken",
            page.path(),
            MIN_AVAILABLE_PATH_LEN
        ));
    }

    // Info
    let benefits = page.benefits().len() - blank;
    report.info.push(format!("{} benefit(s)", benefits));
    report.info.push(format!(
        "{} of {} bonus(es) selected",
        selected,
        page.bonuses().len()
    ));
    report.info.push(if video.is_empty() {
        "No video".to_string()
    } else {
        format!("Video: {}", video)
    });

    report
}
