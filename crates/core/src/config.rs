use crate::error::{Error, Result};
use crate::types::*;
use crate::wizard::{WizardState, WizardStep};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw page.toml structure.
/// This matches the page.toml file layout exactly.
#[derive(Debug, Deserialize, Serialize)]
struct RawPage {
    #[serde(default)]
    sales_page_url: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    selected_headline: usize,
    headlines: Vec<String>,
    #[serde(default)]
    benefits: Vec<String>,
    #[serde(default)]
    video_url: String,
    #[serde(default)]
    affiliate_link: String,
    #[serde(default)]
    colors: ColorScheme,
    #[serde(default, rename = "bonus")]
    bonuses: Vec<Bonus>,
}

/// Parse page.toml from a file path
pub fn parse_page_toml<P: AsRef<Path>>(path: P) -> Result<WizardState> {
    let content = fs::read_to_string(path)?;
    parse_page_toml_str(&content)
}

/// Parse page.toml from a string (useful for testing).
///
/// A page file describes a finished wizard run, so the returned state sits
/// at the publish step.
pub fn parse_page_toml_str(content: &str) -> Result<WizardState> {
    let raw: RawPage = toml::from_str(content)?;

    if raw.headlines.is_empty() {
        return Err(Error::ConfigParse(
            "At least one headline is required".to_string(),
        ));
    }
    if raw.selected_headline >= raw.headlines.len() {
        return Err(Error::ConfigParse(format!(
            "selected_headline {} is out of range ({} headlines)",
            raw.selected_headline,
            raw.headlines.len()
        )));
    }

    let mut seen = std::collections::HashSet::new();
    if let Some(dup) = raw.bonuses.iter().find(|b| !seen.insert(b.id)) {
        return Err(Error::ConfigParse(format!("Duplicate bonus id {}", dup.id)));
    }

    Ok(WizardState {
        sales_page_url: raw.sales_page_url.trim().to_string(),
        path: raw.path.trim().to_string(),
        scraped: None,
        manual_input: false,
        color_scheme: raw.colors,
        headlines: raw.headlines,
        selected_headline: raw.selected_headline,
        benefits: raw.benefits,
        bonuses: raw.bonuses,
        video_url: raw.video_url.trim().to_string(),
        affiliate_link: raw.affiliate_link.trim().to_string(),
        current_step: WizardStep::Publish,
    })
}

/// Serialize a wizard state into page.toml form
pub fn page_to_toml(state: &WizardState) -> Result<String> {
    let raw = RawPage {
        sales_page_url: state.sales_page_url.clone(),
        path: state.path.clone(),
        selected_headline: state.selected_headline,
        headlines: state.headlines.clone(),
        benefits: state.benefits.clone(),
        video_url: state.video_url.clone(),
        affiliate_link: state.affiliate_link.clone(),
        colors: state.color_scheme.clone(),
        bonuses: state.bonuses.clone(),
    };
    toml::to_string_pretty(&raw).map_err(|e| Error::ConfigParse(e.to_string()))
}

/// Write a wizard state to a page.toml file
pub fn save_page_toml<P: AsRef<Path>>(state: &WizardState, path: P) -> Result<()> {
    let contents = page_to_toml(state)?;
    fs::write(path, contents)?;
    Ok(())
}

// ============================================================================
// Global settings (~/.bridge-kit/config.toml)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Public host published pages are announced under
    pub base_url: String,
    /// Directory of the on-disk publish store. Defaults to `<home>/pages`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Chance that the simulated scraper succeeds
    pub scrape_success_rate: f64,
    pub preview: PreviewSettings,
    pub latency: LatencySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://clickhumble.com".to_string(),
            data_dir: None,
            scrape_success_rate: 0.7,
            preview: PreviewSettings::default(),
            latency: LatencySettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub port: u16,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

/// Artificial delays for the simulated collaborators, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencySettings {
    pub check_ms: u64,
    pub scrape_ms: u64,
    pub generate_ms: u64,
    pub publish_ms: u64,
    pub export_ms: u64,
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            check_ms: 1000,
            scrape_ms: 2000,
            generate_ms: 2000,
            publish_ms: 2000,
            export_ms: 2000,
        }
    }
}

impl LatencySettings {
    pub fn none() -> Self {
        Self {
            check_ms: 0,
            scrape_ms: 0,
            generate_ms: 0,
            publish_ms: 0,
            export_ms: 0,
        }
    }
}

impl Settings {
    /// Store directory, resolved against the bridge-kit home
    pub fn data_dir_in(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => home.join(dir),
            None => home.join("pages"),
        }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Load settings; a missing file yields defaults
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path)?;
    parse_settings_str(&content)
}

pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(content)?;

    if !(0.0..=1.0).contains(&settings.scrape_success_rate) {
        return Err(Error::ConfigParse(format!(
            "scrape_success_rate must be between 0.0 and 1.0, got {}",
            settings.scrape_success_rate
        )));
    }
    if settings.base_url.trim().is_empty() {
        return Err(Error::ConfigParse("base_url cannot be empty".to_string()));
    }

    Ok(settings)
}

pub fn save_settings<P: AsRef<Path>>(settings: &Settings, path: P) -> Result<()> {
    let contents =
        toml::to_string_pretty(settings).map_err(|e| Error::ConfigParse(e.to_string()))?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = r##"
sales_page_url = "https://warriorplus.com/o2/a/example"
path = "my-page"
selected_headline = 1
headlines = ["First headline", "Second headline"]
benefits = ["Save time", "Make money"]
video_url = ""
affiliate_link = "https://x.test/a"

[colors]
primary = "#000000"
secondary = "#111111"
accent = "#222222"
background = "#ffffff"
text = "#333333"

[[bonus]]
id = 1
title = "Cheat Sheet"
description = "Quick reference"
effort = 2
selected = true

[[bonus]]
id = 2
title = "Masterclass"
description = "Video series"
effort = 4
selected = false
"##;

    #[test]
    fn test_parse_page() {
        let state = parse_page_toml_str(PAGE).unwrap();
        assert_eq!(state.path(), "my-page");
        assert_eq!(state.selected_headline(), Some("Second headline"));
        assert_eq!(state.benefits().len(), 2);
        assert_eq!(state.bonuses().len(), 2);
        assert_eq!(state.selected_bonuses().count(), 1);
        assert_eq!(state.color_scheme().accent, "#222222");
        assert_eq!(state.current_step(), WizardStep::Publish);
    }

    #[test]
    fn test_parse_page_defaults_colors() {
        let state = parse_page_toml_str(r#"headlines = ["Only"]"#).unwrap();
        assert_eq!(state.color_scheme(), &ColorScheme::default());
        assert!(state.bonuses().is_empty());
    }

    #[test]
    fn test_parse_page_rejects_bad_headline_index() {
        let toml = r#"
headlines = ["Only"]
selected_headline = 1
"#;
        let err = parse_page_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        let err = parse_page_toml_str("headlines = []").unwrap_err();
        assert!(err.to_string().contains("At least one headline"));
    }

    #[test]
    fn test_parse_page_rejects_bad_effort() {
        let toml = r#"
headlines = ["Only"]

[[bonus]]
id = 1
title = "Too much"
description = "x"
effort = 7
selected = true
"#;
        let err = parse_page_toml_str(toml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
        assert!(err.to_string().contains("between 1 and 5"));
    }

    #[test]
    fn test_parse_page_rejects_duplicate_bonus_ids() {
        let toml = r#"
headlines = ["Only"]

[[bonus]]
id = 1
title = "A"
description = "x"
effort = 1
selected = true

[[bonus]]
id = 1
title = "B"
description = "y"
effort = 1
selected = true
"#;
        let err = parse_page_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("Duplicate bonus id 1"));
    }

    #[test]
    fn test_save_and_reload_page() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("page.toml");

        let state = parse_page_toml_str(PAGE).unwrap();
        save_page_toml(&state, &file).unwrap();
        let reloaded = parse_page_toml(&file).unwrap();

        assert_eq!(reloaded, state);
    }

    #[test]
    fn test_settings_defaults() {
        let settings = parse_settings_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.preview.port, 8080);
        assert_eq!(settings.latency.check_ms, 1000);
    }

    #[test]
    fn test_settings_partial_override() {
        let settings = parse_settings_str(
            r#"
base_url = "https://pages.example.com/"
scrape_success_rate = 1.0

[latency]
scrape_ms = 10
"#,
        )
        .unwrap();
        assert_eq!(settings.base_url(), "https://pages.example.com");
        assert_eq!(settings.latency.scrape_ms, 10);
        assert_eq!(settings.latency.publish_ms, 2000);
    }

    #[test]
    fn test_settings_rejects_bad_success_rate() {
        let err = parse_settings_str("scrape_success_rate = 1.5").unwrap_err();
        assert!(err.to_string().contains("scrape_success_rate"));
    }

    #[test]
    fn test_settings_data_dir_resolution() {
        let home = Path::new("/home/u/.bridge-kit");
        let mut settings = Settings::default();
        assert_eq!(settings.data_dir_in(home), home.join("pages"));

        settings.data_dir = Some(PathBuf::from("store"));
        assert_eq!(settings.data_dir_in(home), home.join("store"));

        settings.data_dir = Some(PathBuf::from("/srv/pages"));
        assert_eq!(settings.data_dir_in(home), PathBuf::from("/srv/pages"));
    }

    #[test]
    fn test_load_settings_missing_file() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings(dir.path().join("config.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        let mut settings = Settings::default();
        settings.preview.port = 9090;
        save_settings(&settings, &file).unwrap();
        assert_eq!(load_settings(&file).unwrap(), settings);
    }
}
