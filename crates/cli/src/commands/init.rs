use anyhow::{Context, Result};
use bridge_kit_core::rules::{is_https, validate_path};
use bridge_kit_core::wizard::{default_benefits, default_bonuses, default_headlines};
use bridge_kit_core::{ColorRole, ColorScheme};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use super::PAGE_FILE;

const FALLBACK_SLUG: &str = "my-bridge-page";

/// Escape a string for safe inclusion in a TOML basic string.
///
/// The template is written by hand so it can carry comments, which the toml
/// crate's serializer would drop.
///
/// See: https://toml.io/en/v1.0.0#string
fn toml_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\x08', "\\b")
        .replace('\x0C', "\\f")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Lowercase URL slug: ASCII alphanumerics joined by single hyphens.
/// Example: "My Bonus Page!" -> "my-bonus-page"
fn slugify(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug derived from the page directory's name
fn default_slug(dir: &Path) -> String {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let slug = slugify(&name);
    if validate_path(&slug).is_ok() {
        slug
    } else {
        FALLBACK_SLUG.to_string()
    }
}

/// Create a page directory containing a commented page.toml.
pub async fn run(
    path: PathBuf,
    slug: Option<String>,
    affiliate_link: Option<String>,
) -> Result<()> {
    println!("Initializing bridge page: {}", path.display());

    let page_toml_path = path.join(PAGE_FILE);
    if page_toml_path.exists() {
        anyhow::bail!(
            "page.toml already exists at {}\nHint: Delete it first or use a different directory",
            page_toml_path.display()
        );
    }

    let slug = match slug {
        Some(s) => {
            validate_path(&s)?;
            s
        }
        None => default_slug(&path),
    };

    if let Some(link) = &affiliate_link
        && !is_https(link)
    {
        println!("⚠ Affiliate link does not use https: {}", link);
    }

    fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let toml = generate_page_toml(&slug, affiliate_link.as_deref());
    fs::write(&page_toml_path, toml).context("Failed to write page.toml")?;

    println!("\n✓ Initialization complete!");
    println!("\nGenerated structure:");
    println!("  {}/", path.display());
    println!("  └── page.toml           ← Edit headlines, benefits and bonuses here");

    println!("\nNext steps:");
    println!("  1. Edit page.toml (sales page URL, affiliate link, headline)");
    println!("  2. Check it: bridge-kit validate {}", path.display());
    println!("  3. Publish: bridge-kit publish {}", path.display());

    Ok(())
}

fn generate_page_toml(slug: &str, affiliate_link: Option<&str>) -> String {
    let today = Local::now().format("%Y-%m-%d").to_string();

    let affiliate = toml_escape_string(affiliate_link.unwrap_or(""));
    let affiliate_comment = if affiliate_link.is_some() {
        ""
    } else {
        "  # TODO: Paste your affiliate link"
    };

    let mut toml = format!(
        "# Generated by bridge-kit init on {today}\n\
# Edit this file to customize your bridge page\n\
\n\
sales_page_url = \"https://warriorplus.com/o2/a/example\"  # TODO: WarriorPlus or JVZoo sales page\n\
path = \"{slug}\"\n\
affiliate_link = \"{affiliate}\"{affiliate_comment}\n\
video_url = \"\"  # Optional: YouTube link or embed URL\n\
\n\
# Replace the [bracketed] placeholders; selected_headline is 0-based\n\
selected_headline = 0\n\
headlines = [\n",
        slug = toml_escape_string(slug),
    );

    for headline in default_headlines() {
        toml.push_str(&format!("    \"{}\",\n", toml_escape_string(&headline)));
    }
    toml.push_str("]\n\nbenefits = [\n");
    for benefit in default_benefits() {
        toml.push_str(&format!("    \"{}\",\n", toml_escape_string(&benefit)));
    }
    toml.push_str("]\n\n[colors]\n");

    let colors = ColorScheme::default();
    for role in ColorRole::ALL {
        toml.push_str(&format!("{} = \"{}\"\n", role, colors.get(role)));
    }

    toml.push_str("\n# Effort runs from 1 (quick to make) to 5 (a lot of work)\n");
    for bonus in default_bonuses() {
        toml.push_str(&format!(
            "\n[[bonus]]\n\
id = {}\n\
title = \"{}\"\n\
description = \"{}\"\n\
effort = {}\n\
selected = {}\n",
            bonus.id,
            toml_escape_string(&bonus.title),
            toml_escape_string(&bonus.description),
            bonus.effort.get(),
            bonus.selected,
        ));
    }

    toml
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_kit_core::config::parse_page_toml_str;
    use tempfile::TempDir;

    #[test]
    fn test_toml_escape_string() {
        assert_eq!(toml_escape_string(r#"Test "Quote""#), r#"Test \"Quote\""#);
        assert_eq!(toml_escape_string(r"Test\Back"), r"Test\\Back");
        assert_eq!(toml_escape_string("Test\nNewline"), r"Test\nNewline");
        assert_eq!(toml_escape_string("Normal String"), "Normal String");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Bonus Page"), "my-bonus-page");
        assert_eq!(slugify("DJ K!ool  Offer"), "dj-kool-offer");
        assert_eq!(slugify("Café Deal"), "caf-deal");
        assert_eq!(slugify("--already-slugged--"), "already-slugged");
    }

    #[test]
    fn test_default_slug() {
        assert_eq!(default_slug(Path::new("/tmp/Summer Promo")), "summer-promo");
        assert_eq!(default_slug(Path::new("/tmp/!!!")), FALLBACK_SLUG);
    }

    #[test]
    fn test_generated_template_parses() {
        let toml = generate_page_toml("my-page", None);
        let page = parse_page_toml_str(&toml).unwrap();

        assert_eq!(page.path(), "my-page");
        assert_eq!(page.affiliate_link(), "");
        assert_eq!(page.headlines(), default_headlines().as_slice());
        assert_eq!(page.benefits().len(), 5);
        assert_eq!(page.bonuses(), default_bonuses().as_slice());
        assert_eq!(page.color_scheme(), &ColorScheme::default());
        assert!(toml.contains("# TODO: Paste your affiliate link"));
    }

    #[test]
    fn test_generated_template_escapes_input() {
        let toml = generate_page_toml("my-page", Some("https://x.test/a?q=\"1\""));
        let page = parse_page_toml_str(&toml).unwrap();
        assert_eq!(page.affiliate_link(), "https://x.test/a?q=\"1\"");
        assert!(!toml.contains("TODO: Paste"));
    }

    #[tokio::test]
    async fn test_run_creates_page_directory() {
        let dir = TempDir::new().unwrap();
        let page_dir = dir.path().join("spring-offer");

        run(page_dir.clone(), None, Some("https://x.test/a".to_string()))
            .await
            .unwrap();

        let content = fs::read_to_string(page_dir.join(PAGE_FILE)).unwrap();
        let page = parse_page_toml_str(&content).unwrap();
        assert_eq!(page.path(), "spring-offer");
        assert_eq!(page.affiliate_link(), "https://x.test/a");

        // A second init must not clobber the file
        let err = run(page_dir, None, None).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_slug() {
        let dir = TempDir::new().unwrap();
        let result = run(dir.path().join("p"), Some("-bad-".to_string()), None).await;
        assert!(result.is_err());
        assert!(!dir.path().join("p").exists());
    }
}
