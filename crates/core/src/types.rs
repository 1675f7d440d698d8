use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Five-colour theme embedded into the generated page as CSS custom properties
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            primary: "#4f46e5".to_string(),
            secondary: "#10b981".to_string(),
            accent: "#f59e0b".to_string(),
            background: "#ffffff".to_string(),
            text: "#1f2937".to_string(),
        }
    }
}

impl ColorScheme {
    /// Same colour for every role
    pub fn uniform(color: &str) -> Self {
        Self {
            primary: color.to_string(),
            secondary: color.to_string(),
            accent: color.to_string(),
            background: color.to_string(),
            text: color.to_string(),
        }
    }

    pub fn get(&self, role: ColorRole) -> &str {
        match role {
            ColorRole::Primary => &self.primary,
            ColorRole::Secondary => &self.secondary,
            ColorRole::Accent => &self.accent,
            ColorRole::Background => &self.background,
            ColorRole::Text => &self.text,
        }
    }

    pub fn set(&mut self, role: ColorRole, value: impl Into<String>) {
        let slot = match role {
            ColorRole::Primary => &mut self.primary,
            ColorRole::Secondary => &mut self.secondary,
            ColorRole::Accent => &mut self.accent,
            ColorRole::Background => &mut self.background,
            ColorRole::Text => &mut self.text,
        };
        *slot = value.into();
    }

    /// Iterate roles in CSS declaration order
    pub fn entries(&self) -> impl Iterator<Item = (ColorRole, &str)> {
        ColorRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Primary,
    Secondary,
    Accent,
    Background,
    Text,
}

impl ColorRole {
    pub const ALL: [ColorRole; 5] = [
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Accent,
        ColorRole::Background,
        ColorRole::Text,
    ];

    /// CSS custom property name without the leading dashes
    pub fn name(self) -> &'static str {
        match self {
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Accent => "accent",
            ColorRole::Background => "background",
            ColorRole::Text => "text",
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ColorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRole::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown colour role '{}'", s))
    }
}

/// How much work a bonus takes to deliver, 1 (trivial) to 5 (major)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EffortLevel(u8);

impl EffortLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Self(level))
    }

    /// Nearest valid level
    pub const fn clamped(level: u8) -> Self {
        if level < Self::MIN {
            Self(Self::MIN)
        } else if level > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(level)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Five-star meter, filled up to the level (e.g. level 2 -> "★★☆☆☆")
    pub fn meter(self) -> String {
        (Self::MIN..=Self::MAX)
            .map(|i| if i <= self.0 { '★' } else { '☆' })
            .collect()
    }
}

impl TryFrom<u8> for EffortLevel {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        EffortLevel::new(level).ok_or_else(|| {
            format!(
                "effort level must be between {} and {}, got {}",
                EffortLevel::MIN,
                EffortLevel::MAX,
                level
            )
        })
    }
}

impl From<EffortLevel> for u8 {
    fn from(level: EffortLevel) -> Self {
        level.0
    }
}

impl fmt::Display for EffortLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Effort filter offered on the bonus step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EffortFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl EffortFilter {
    pub fn max_effort(self) -> Option<u8> {
        match self {
            EffortFilter::All => None,
            EffortFilter::Low => Some(1),
            EffortFilter::Medium => Some(2),
            EffortFilter::High => Some(3),
        }
    }

    pub fn allows(self, effort: EffortLevel) -> bool {
        self.max_effort().is_none_or(|max| effort.get() <= max)
    }
}

/// Incentive item offered alongside the affiliate product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub effort: EffortLevel,
    pub selected: bool,
}

/// Bonus suggestion returned by a content generator, before ids are assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusIdea {
    pub title: String,
    pub description: String,
    pub effort: EffortLevel,
}

/// Data pulled from a sales page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub colors: ColorScheme,
}

/// Everything the page renderer needs. Produced from a wizard state once
/// the publish-step checks have passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRenderInput {
    pub headline: String,
    pub color_scheme: ColorScheme,
    pub benefits: Vec<String>,
    pub selected_bonuses: Vec<Bonus>,
    pub video_url: Option<String>,
    pub affiliate_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub path: String,
    pub page: PageRenderInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub path: String,
    pub url: String,
    pub preview_url: String,
    pub message: String,
    pub published_at: DateTime<Utc>,
    /// A page was already stored under this path and has been overwritten
    pub replaced: bool,
}

/// Answer from the path availability collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAvailability {
    pub available: bool,
    pub reason: Option<String>,
}

impl PathAvailability {
    pub fn available() -> Self {
        Self {
            available: true,
            reason: None,
        }
    }

    pub fn taken(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
        }
    }
}

/// Payload handed to a WordPress exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPressExport {
    pub title: String,
    pub content: String,
    pub affiliate_link: String,
    pub color_scheme: ColorScheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub message: String,
}
