pub mod config;
pub mod error;
pub mod rules;
pub mod services;
pub mod types;
pub mod wizard;

pub use config::{Settings, parse_page_toml};
pub use error::{Error, Result};
pub use types::*;
pub use wizard::{PathOutcome, ScrapeOutcome, WizardState, WizardStep};
