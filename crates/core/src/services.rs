// Collaborators the wizard calls out to.
//
// Every implementation shipped with bridge-kit is simulated (see the
// deployer crate); the traits exist so a real backend can be slotted in
// without touching the wizard flow.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    BonusIdea, ExportReceipt, PathAvailability, PublishReceipt, PublishRequest, ScrapedPage,
    WordPressExport,
};

/// Checks whether a candidate path is free to publish under
#[async_trait]
pub trait PathChecker: Send + Sync {
    async fn check_available(&self, candidate: &str) -> Result<PathAvailability>;
}

/// Extracts title, keywords and colours from a sales page.
///
/// Returns `Error::SimulatedFailure` when the page could not be analysed;
/// the wizard then falls back to manual colour entry.
#[async_trait]
pub trait SalesPageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;
}

/// Produces copy for the studio and bonus steps
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn headlines(&self, scraped: Option<&ScrapedPage>) -> Result<Vec<String>>;

    async fn benefits(&self, scraped: Option<&ScrapedPage>) -> Result<Vec<String>>;

    async fn bonuses(&self, scraped: Option<&ScrapedPage>) -> Result<Vec<BonusIdea>>;
}

/// Renders and hosts a page
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt>;
}

#[async_trait]
pub trait WordPressExporter: Send + Sync {
    async fn export(&self, export: &WordPressExport) -> Result<ExportReceipt>;
}
