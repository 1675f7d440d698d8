// Stand-in collaborators.
//
// None of these talk to a network. Each waits for its configured latency
// and then answers with canned or randomized data:
//
// - availability: a path is free when it is longer than five characters;
// - scraping: succeeds with a configurable probability (0.7 by default);
// - content: fixed headline, benefit and bonus lists;
// - publishing: renders the page and writes it to a `PublishStore`;
// - WordPress export: always succeeds.
//
// These rules are placeholders, not business logic.

use async_trait::async_trait;
use bridge_kit_core::config::Settings;
use bridge_kit_core::rules::MIN_AVAILABLE_PATH_LEN;
use bridge_kit_core::services::{
    ContentGenerator, PathChecker, Publisher, SalesPageScraper, WordPressExporter,
};
use bridge_kit_core::types::*;
use bridge_kit_core::{Error, Result};
use bridge_kit_generator::render_page;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::publish::PublishStore;

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedPathChecker {
    delay: Duration,
}

impl SimulatedPathChecker {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PathChecker for SimulatedPathChecker {
    async fn check_available(&self, candidate: &str) -> Result<PathAvailability> {
        simulate_latency(self.delay).await;
        let available = candidate.chars().count() > MIN_AVAILABLE_PATH_LEN;
        debug!(candidate, available, "path availability checked");
        if available {
            Ok(PathAvailability::available())
        } else {
            Ok(PathAvailability::taken("This path is already taken."))
        }
    }
}

/// Data every successful scrape returns
pub fn canned_scrape() -> ScrapedPage {
    ScrapedPage {
        title: "Ultimate Affiliate Marketing System".to_string(),
        description: "The most powerful affiliate marketing system ever created".to_string(),
        keywords: vec![
            "affiliate marketing".to_string(),
            "passive income".to_string(),
            "online business".to_string(),
        ],
        colors: ColorScheme {
            primary: "#3b82f6".to_string(),
            secondary: "#10b981".to_string(),
            accent: "#f59e0b".to_string(),
            background: "#ffffff".to_string(),
            text: "#1f2937".to_string(),
        },
    }
}

pub struct SimulatedScraper {
    delay: Duration,
    success_rate: f64,
    rng: Mutex<StdRng>,
}

impl SimulatedScraper {
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        Self::from_rng(delay, success_rate, StdRng::from_entropy())
    }

    /// Reproducible outcomes for a given seed
    pub fn with_seed(delay: Duration, success_rate: f64, seed: u64) -> Self {
        Self::from_rng(delay, success_rate, StdRng::seed_from_u64(seed))
    }

    fn from_rng(delay: Duration, success_rate: f64, rng: StdRng) -> Self {
        Self {
            delay,
            success_rate: success_rate.clamp(0.0, 1.0),
            rng: Mutex::new(rng),
        }
    }
}

#[async_trait]
impl SalesPageScraper for SimulatedScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        simulate_latency(self.delay).await;
        let succeeded = self.rng.lock().await.gen_bool(self.success_rate);
        debug!(url, succeeded, "sales page scrape simulated");
        if succeeded {
            Ok(canned_scrape())
        } else {
            Err(Error::SimulatedFailure(
                "Failed to scrape sales page".to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CannedContentGenerator {
    delay: Duration,
}

impl CannedContentGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ContentGenerator for CannedContentGenerator {
    async fn headlines(&self, scraped: Option<&ScrapedPage>) -> Result<Vec<String>> {
        simulate_latency(self.delay).await;
        let title = scraped.map(|s| s.title.as_str());
        Ok(vec![
            format!(
                "Stop Struggling With Affiliate Marketing - {} Changes Everything",
                title.unwrap_or("This System")
            ),
            "The Fastest Way To Generate Affiliate Commissions Without Technical Skills"
                .to_string(),
            format!(
                "How This Revolutionary {} Is Helping Ordinary People Make Extraordinary Commissions",
                title.unwrap_or("System")
            ),
        ])
    }

    async fn benefits(&self, _scraped: Option<&ScrapedPage>) -> Result<Vec<String>> {
        simulate_latency(self.delay).await;
        Ok([
            "Get started in under 10 minutes with our step-by-step setup wizard",
            "Increase your conversion rates by up to 300% with our proven templates",
            "No technical skills required - our system does all the heavy lifting",
            "Works with any affiliate network including WarriorPlus, JVZoo, and ClickBank",
            "Full 24/7 support and regular updates included at no extra cost",
        ]
        .into_iter()
        .map(String::from)
        .collect())
    }

    async fn bonuses(&self, _scraped: Option<&ScrapedPage>) -> Result<Vec<BonusIdea>> {
        simulate_latency(self.delay).await;
        let idea = |title: &str, description: &str, effort: u8| BonusIdea {
            title: title.to_string(),
            description: description.to_string(),
            effort: EffortLevel::clamped(effort),
        };
        Ok(vec![
            idea(
                "Affiliate Marketing Quickstart Guide",
                "A comprehensive PDF guide to help you get started with affiliate marketing in just 24 hours.",
                2,
            ),
            idea(
                "50 High-Converting Email Templates",
                "Copy-paste email templates specifically designed for affiliate promotions.",
                1,
            ),
            idea(
                "Traffic Generation Masterclass",
                "A 5-part video series showing you how to drive targeted traffic to your affiliate offers.",
                4,
            ),
            idea(
                "Affiliate Disclaimer Generator",
                "Create legally compliant affiliate disclaimers with just a few clicks.",
                1,
            ),
            idea(
                "Conversion Rate Optimization Checklist",
                "27-point checklist to maximize your affiliate page conversions.",
                2,
            ),
        ])
    }
}

/// Renders pages and keeps them in a `PublishStore`, standing in for hosting
#[derive(Clone)]
pub struct LocalPublisher {
    store: PublishStore,
    base_url: String,
    delay: Duration,
}

impl LocalPublisher {
    pub fn new(store: PublishStore, base_url: &str, delay: Duration) -> Self {
        Self {
            store,
            base_url: base_url.trim_end_matches('/').to_string(),
            delay,
        }
    }

    pub fn store(&self) -> &PublishStore {
        &self.store
    }
}

#[async_trait]
impl Publisher for LocalPublisher {
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
        simulate_latency(self.delay).await;

        let html = render_page(&request.page);
        let replaced = self.store.contains(&request.path).await?;
        self.store.put(&request.path, &html).await?;

        let url = format!("{}/{}", self.base_url, request.path);
        info!(path = %request.path, %url, replaced, "publish simulated");

        Ok(PublishReceipt {
            path: request.path.clone(),
            url,
            preview_url: format!("/preview/{}", request.path),
            message: "Bridge page published successfully".to_string(),
            published_at: Utc::now(),
            replaced,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimulatedWordPressExporter {
    delay: Duration,
}

impl SimulatedWordPressExporter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl WordPressExporter for SimulatedWordPressExporter {
    async fn export(&self, export: &WordPressExport) -> Result<ExportReceipt> {
        simulate_latency(self.delay).await;
        debug!(title = %export.title, bytes = export.content.len(), "WordPress export simulated");
        Ok(ExportReceipt {
            message: "Successfully exported to WordPress".to_string(),
        })
    }
}

/// The full set of collaborators a wizard run needs
#[derive(Clone)]
pub struct Collaborators {
    pub paths: Arc<dyn PathChecker>,
    pub scraper: Arc<dyn SalesPageScraper>,
    pub content: Arc<dyn ContentGenerator>,
    pub publisher: Arc<dyn Publisher>,
    pub exporter: Arc<dyn WordPressExporter>,
}

impl Collaborators {
    /// Simulated collaborators configured from settings, publishing into `store`
    pub fn simulated(settings: &Settings, store: PublishStore) -> Self {
        let latency = &settings.latency;
        let ms = Duration::from_millis;
        Self {
            paths: Arc::new(SimulatedPathChecker::new(ms(latency.check_ms))),
            scraper: Arc::new(SimulatedScraper::new(
                ms(latency.scrape_ms),
                settings.scrape_success_rate,
            )),
            content: Arc::new(CannedContentGenerator::new(ms(latency.generate_ms))),
            publisher: Arc::new(LocalPublisher::new(
                store,
                settings.base_url(),
                ms(latency.publish_ms),
            )),
            exporter: Arc::new(SimulatedWordPressExporter::new(ms(latency.export_ms))),
        }
    }
}
