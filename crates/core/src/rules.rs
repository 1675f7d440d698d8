// Field rules checked by the wizard before any collaborator is called.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Paths up to this many characters are reported as taken by the
/// simulated availability check
pub const MIN_AVAILABLE_PATH_LEN: usize = 5;

/// Hosts a sales page may live on
pub const SUPPORTED_MARKETPLACES: &[&str] = &["warriorplus.com", "jvzoo.com"];

static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?$").expect("valid path regex")
});

static HEX_COLOR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid colour regex")
});

/// Sales page must be an http(s) URL on a supported marketplace.
pub fn validate_sales_page_url(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::validation(
            "sales_page_url",
            "Sales page URL is required",
        ));
    }

    let url = Url::parse(input)
        .map_err(|_| Error::validation("sales_page_url", "Please enter a valid URL"))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::validation(
            "sales_page_url",
            "Please enter a valid URL",
        ));
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let on_marketplace = SUPPORTED_MARKETPLACES
        .iter()
        .any(|market| host == *market || host.ends_with(&format!(".{}", market)));
    if !on_marketplace {
        return Err(Error::validation(
            "sales_page_url",
            "URL must be from WarriorPlus or JVZoo",
        ));
    }

    Ok(url)
}

/// Path segment: letters, digits and inner hyphens, 1-63 characters.
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::validation("path", "Path is required"));
    }
    if !PATH_PATTERN.is_match(path) {
        return Err(Error::validation(
            "path",
            "Path can only contain letters, numbers, and hyphens, and cannot start or end with a hyphen",
        ));
    }
    Ok(())
}

pub fn validate_color(value: &str) -> Result<()> {
    if HEX_COLOR_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(Error::validation(
            "color_scheme",
            format!("'{}' is not a hex colour like #1f2937", value),
        ))
    }
}

pub fn is_https(link: &str) -> bool {
    Url::parse(link.trim()).is_ok_and(|url| url.scheme() == "https")
}
