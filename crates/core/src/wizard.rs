// Wizard state and step handlers.
//
// `WizardState` is the single context object threaded through the five
// steps. Fields are only written by the handler that owns them:
//
// | step | writes |
// |---|---|
// | 1 sales page | `sales_page_url`, `scraped`, `manual_input`, `color_scheme` |
// | 2 path | `path`, `color_scheme` |
// | 3 studio | `headlines`, `selected_headline`, `benefits`, `video_url`, `affiliate_link` |
// | 4 bonuses | `bonuses` |
// | 5 publish | nothing (reads only) |
//
// Handlers take `&mut self`, so a step cannot be re-entered while one of
// its collaborator calls is still in flight.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::rules;
use crate::services::{
    ContentGenerator, PathChecker, Publisher, SalesPageScraper, WordPressExporter,
};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    SalesPage = 1,
    Path = 2,
    Studio = 3,
    Bonuses = 4,
    Publish = 5,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::SalesPage => "Sales Page",
            WizardStep::Path => "Path",
            WizardStep::Studio => "AI Studio",
            WizardStep::Bonuses => "Bonuses",
            WizardStep::Publish => "Publish",
        }
    }

    pub fn next(self) -> WizardStep {
        match self {
            WizardStep::SalesPage => WizardStep::Path,
            WizardStep::Path => WizardStep::Studio,
            WizardStep::Studio => WizardStep::Bonuses,
            WizardStep::Bonuses | WizardStep::Publish => WizardStep::Publish,
        }
    }

    pub fn previous(self) -> WizardStep {
        match self {
            WizardStep::SalesPage | WizardStep::Path => WizardStep::SalesPage,
            WizardStep::Studio => WizardStep::Path,
            WizardStep::Bonuses => WizardStep::Studio,
            WizardStep::Publish => WizardStep::Bonuses,
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}

/// Result of step 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Colours were taken from the sales page
    Scraped,
    /// Scraping failed; colours must be chosen by hand
    Manual { reason: String },
}

/// Result of step 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    Available,
    Taken { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub(crate) sales_page_url: String,
    pub(crate) path: String,
    pub(crate) scraped: Option<ScrapedPage>,
    pub(crate) manual_input: bool,
    pub(crate) color_scheme: ColorScheme,
    pub(crate) headlines: Vec<String>,
    pub(crate) selected_headline: usize,
    pub(crate) benefits: Vec<String>,
    pub(crate) bonuses: Vec<Bonus>,
    pub(crate) video_url: String,
    pub(crate) affiliate_link: String,
    pub(crate) current_step: WizardStep,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            sales_page_url: String::new(),
            path: String::new(),
            scraped: None,
            manual_input: false,
            color_scheme: ColorScheme::default(),
            headlines: default_headlines(),
            selected_headline: 0,
            benefits: default_benefits(),
            bonuses: default_bonuses(),
            video_url: String::new(),
            affiliate_link: String::new(),
            current_step: WizardStep::SalesPage,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn sales_page_url(&self) -> &str {
        &self.sales_page_url
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn scraped(&self) -> Option<&ScrapedPage> {
        self.scraped.as_ref()
    }

    pub fn manual_input(&self) -> bool {
        self.manual_input
    }

    pub fn color_scheme(&self) -> &ColorScheme {
        &self.color_scheme
    }

    pub fn headlines(&self) -> &[String] {
        &self.headlines
    }

    pub fn selected_headline_index(&self) -> usize {
        self.selected_headline
    }

    pub fn selected_headline(&self) -> Option<&str> {
        self.headlines
            .get(self.selected_headline)
            .map(String::as_str)
    }

    pub fn benefits(&self) -> &[String] {
        &self.benefits
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn selected_bonuses(&self) -> impl Iterator<Item = &Bonus> {
        self.bonuses.iter().filter(|b| b.selected)
    }

    pub fn bonuses_for(&self, filter: EffortFilter) -> impl Iterator<Item = &Bonus> {
        self.bonuses.iter().filter(move |b| filter.allows(b.effort))
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn affiliate_link(&self) -> &str {
        &self.affiliate_link
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn ensure_step(&self, expected: WizardStep) -> Result<()> {
        if self.current_step != expected {
            return Err(Error::StepOrder {
                expected,
                actual: self.current_step,
            });
        }
        Ok(())
    }

    fn advance_from(&mut self, step: WizardStep) {
        self.current_step = step.next();
        debug!(step = %self.current_step, "wizard advanced");
    }

    /// Step back one screen. Entered data is kept.
    pub fn go_back(&mut self) -> WizardStep {
        self.current_step = self.current_step.previous();
        self.current_step
    }

    /// Discard everything and start a new page
    pub fn restart(&mut self) {
        *self = Self::default();
        debug!("wizard restarted");
    }

    // ------------------------------------------------------------------
    // Step 1: sales page
    // ------------------------------------------------------------------

    pub async fn submit_sales_page(
        &mut self,
        url: &str,
        scraper: &dyn SalesPageScraper,
    ) -> Result<ScrapeOutcome> {
        self.ensure_step(WizardStep::SalesPage)?;
        let url = rules::validate_sales_page_url(url)?;
        self.sales_page_url = url.to_string();

        match scraper.scrape(url.as_str()).await {
            Ok(page) => {
                info!(title = %page.title, "sales page scraped");
                self.color_scheme = page.colors.clone();
                self.scraped = Some(page);
                self.manual_input = false;
                self.advance_from(WizardStep::SalesPage);
                Ok(ScrapeOutcome::Scraped)
            }
            Err(Error::SimulatedFailure(reason)) => {
                warn!(%reason, "sales page scrape failed, switching to manual input");
                self.scraped = None;
                self.manual_input = true;
                self.advance_from(WizardStep::SalesPage);
                Ok(ScrapeOutcome::Manual { reason })
            }
            Err(err) => {
                self.manual_input = true;
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Step 2: path and colours
    // ------------------------------------------------------------------

    pub async fn choose_path(
        &mut self,
        candidate: &str,
        checker: &dyn PathChecker,
    ) -> Result<PathOutcome> {
        self.ensure_step(WizardStep::Path)?;
        let candidate = candidate.trim();
        rules::validate_path(candidate)?;

        let availability = checker.check_available(candidate).await?;
        if !availability.available {
            let reason = availability
                .reason
                .unwrap_or_else(|| "This path is already taken.".to_string());
            debug!(path = candidate, %reason, "path unavailable");
            return Ok(PathOutcome::Taken { reason });
        }

        self.path = candidate.to_string();
        self.advance_from(WizardStep::Path);
        Ok(PathOutcome::Available)
    }

    pub fn set_color(&mut self, role: ColorRole, value: &str) -> Result<()> {
        let value = value.trim();
        rules::validate_color(value)?;
        self.color_scheme.set(role, value);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Step 3: studio
    // ------------------------------------------------------------------

    pub async fn regenerate_headlines(&mut self, generator: &dyn ContentGenerator) -> Result<()> {
        let headlines = generator.headlines(self.scraped.as_ref()).await?;
        if headlines.is_empty() {
            return Err(Error::SimulatedFailure(
                "Content generator returned no headlines".to_string(),
            ));
        }
        self.headlines = headlines;
        self.selected_headline = 0;
        Ok(())
    }

    pub fn select_headline(&mut self, index: usize) -> Result<()> {
        if index >= self.headlines.len() {
            return Err(Error::validation(
                "selected_headline",
                format!(
                    "Headline {} does not exist ({} available)",
                    index + 1,
                    self.headlines.len()
                ),
            ));
        }
        self.selected_headline = index;
        Ok(())
    }

    pub async fn regenerate_benefits(&mut self, generator: &dyn ContentGenerator) -> Result<()> {
        let benefits = generator.benefits(self.scraped.as_ref()).await?;
        if benefits.is_empty() {
            return Err(Error::SimulatedFailure(
                "Content generator returned no benefits".to_string(),
            ));
        }
        self.benefits = benefits;
        Ok(())
    }

    /// Append an empty benefit for the user to fill in; returns its index
    pub fn add_benefit(&mut self) -> usize {
        self.benefits.push(String::new());
        self.benefits.len() - 1
    }

    pub fn update_benefit(&mut self, index: usize, text: &str) -> Result<()> {
        let slot = self.benefits.get_mut(index).ok_or_else(|| {
            Error::validation("benefits", format!("Benefit {} does not exist", index + 1))
        })?;
        *slot = text.to_string();
        Ok(())
    }

    pub fn remove_benefit(&mut self, index: usize) -> Result<()> {
        if index >= self.benefits.len() {
            return Err(Error::validation(
                "benefits",
                format!("Benefit {} does not exist", index + 1),
            ));
        }
        if self.benefits.len() <= 1 {
            return Err(Error::validation(
                "benefits",
                "At least one benefit is required",
            ));
        }
        self.benefits.remove(index);
        Ok(())
    }

    pub fn set_video_url(&mut self, url: &str) {
        self.video_url = url.trim().to_string();
    }

    pub fn set_affiliate_link(&mut self, link: &str) {
        self.affiliate_link = link.trim().to_string();
    }

    pub fn finish_studio(&mut self) -> Result<()> {
        self.ensure_step(WizardStep::Studio)?;
        if self.affiliate_link.is_empty() {
            return Err(Error::validation(
                "affiliate_link",
                "Please enter your affiliate link before continuing.",
            ));
        }
        self.advance_from(WizardStep::Studio);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Step 4: bonuses
    // ------------------------------------------------------------------

    /// Replace the bonus list with fresh ideas. Low-effort ideas (2 or
    /// less) start out selected.
    pub async fn regenerate_bonuses(&mut self, generator: &dyn ContentGenerator) -> Result<()> {
        let ideas = generator.bonuses(self.scraped.as_ref()).await?;
        self.bonuses = ideas
            .into_iter()
            .zip(1u32..)
            .map(|(idea, id)| Bonus {
                id,
                selected: idea.effort.get() <= 2,
                title: idea.title,
                description: idea.description,
                effort: idea.effort,
            })
            .collect();
        Ok(())
    }

    /// Flip selection of a bonus; returns the new selection state
    pub fn toggle_bonus(&mut self, id: u32) -> Result<bool> {
        let bonus = self
            .bonuses
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| Error::validation("bonuses", format!("No bonus with id {}", id)))?;
        bonus.selected = !bonus.selected;
        Ok(bonus.selected)
    }

    pub fn finish_bonuses(&mut self) -> Result<()> {
        self.ensure_step(WizardStep::Bonuses)?;
        self.advance_from(WizardStep::Bonuses);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Step 5: publish
    // ------------------------------------------------------------------

    /// Checks required fields and assembles what the renderer needs
    pub fn publish_request(&self) -> Result<PublishRequest> {
        if self.path.is_empty() {
            return Err(Error::validation(
                "path",
                "Path URL is required. Please go back and set a valid path.",
            ));
        }
        rules::validate_path(&self.path)?;

        let headline = self
            .selected_headline()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| {
                Error::validation(
                    "headline",
                    "Headline is required. Please go back and select a headline.",
                )
            })?;

        if self.affiliate_link.is_empty() {
            return Err(Error::validation(
                "affiliate_link",
                "Affiliate link is required. Please go back and set your affiliate link.",
            ));
        }

        let video_url = Some(self.video_url.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(PublishRequest {
            path: self.path.clone(),
            page: PageRenderInput {
                headline: headline.to_string(),
                color_scheme: self.color_scheme.clone(),
                benefits: self
                    .benefits
                    .iter()
                    .filter(|b| !b.trim().is_empty())
                    .cloned()
                    .collect(),
                selected_bonuses: self.selected_bonuses().cloned().collect(),
                video_url,
                affiliate_link: self.affiliate_link.clone(),
            },
        })
    }

    pub async fn publish(&self, publisher: &dyn Publisher) -> Result<PublishReceipt> {
        self.ensure_step(WizardStep::Publish)?;
        let request = self.publish_request()?;
        let receipt = publisher.publish(&request).await?;
        info!(path = %receipt.path, url = %receipt.url, "bridge page published");
        Ok(receipt)
    }

    /// Package the page for WordPress. `render` turns the page input into
    /// the HTML document that becomes the post content.
    pub async fn export_wordpress(
        &self,
        exporter: &dyn WordPressExporter,
        render: impl Fn(&PageRenderInput) -> String,
    ) -> Result<ExportReceipt> {
        let request = self.publish_request()?;
        let export = WordPressExport {
            title: request.page.headline.clone(),
            content: render(&request.page),
            affiliate_link: request.page.affiliate_link.clone(),
            color_scheme: request.page.color_scheme.clone(),
        };
        exporter.export(&export).await
    }
}

pub fn default_headlines() -> Vec<String> {
    [
        "Transform Your [Niche] Results With This Groundbreaking [Product]",
        "Stop Struggling With [Pain Point] - [Product] Changes Everything",
        "The [Adjective] Way To [Benefit] Without [Pain Point]",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn default_benefits() -> Vec<String> {
    [
        "Save hours of time with our automated system",
        "Increase your conversion rates by up to 300%",
        "No technical skills required - easy to use interface",
        "Get results in as little as 24 hours",
        "Full support and training included",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

pub fn default_bonuses() -> Vec<Bonus> {
    let bonus = |id: u32, title: &str, description: &str, effort: u8, selected: bool| Bonus {
        id,
        title: title.to_string(),
        description: description.to_string(),
        effort: EffortLevel::clamped(effort),
        selected,
    };

    vec![
        bonus(
            1,
            "Ultimate Affiliate Marketing Cheat Sheet",
            "A quick reference guide with all the best practices for affiliate marketing success.",
            2,
            true,
        ),
        bonus(
            2,
            "Email Swipe File Collection",
            "25 proven email templates you can use to promote any affiliate product.",
            1,
            true,
        ),
        bonus(
            3,
            "Conversion Rate Optimization Guide",
            "Learn how to double your conversion rates with these simple tweaks.",
            3,
            false,
        ),
        bonus(
            4,
            "Traffic Generation Masterclass",
            "5-part video series showing you how to drive targeted traffic to your offers.",
            4,
            false,
        ),
        bonus(
            5,
            "Affiliate Disclaimer Templates",
            "Legal templates to keep your affiliate business compliant and protected.",
            1,
            true,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    struct FixedScraper(std::result::Result<ScrapedPage, String>);

    #[async_trait]
    impl SalesPageScraper for FixedScraper {
        async fn scrape(&self, _url: &str) -> Result<ScrapedPage> {
            self.0.clone().map_err(Error::SimulatedFailure)
        }
    }

    struct BrokenScraper;

    #[async_trait]
    impl SalesPageScraper for BrokenScraper {
        async fn scrape(&self, _url: &str) -> Result<ScrapedPage> {
            Err(Error::Storage("disk full".to_string()))
        }
    }

    struct LengthChecker;

    #[async_trait]
    impl PathChecker for LengthChecker {
        async fn check_available(&self, candidate: &str) -> Result<PathAvailability> {
            if candidate.len() > 5 {
                Ok(PathAvailability::available())
            } else {
                Ok(PathAvailability::taken("This path is already taken."))
            }
        }
    }

    struct CannedGenerator;

    #[async_trait]
    impl ContentGenerator for CannedGenerator {
        async fn headlines(&self, scraped: Option<&ScrapedPage>) -> Result<Vec<String>> {
            let title = scraped.map(|s| s.title.as_str()).unwrap_or("This System");
            Ok(vec![format!("{} Changes Everything", title), "Second".into()])
        }

        async fn benefits(&self, _scraped: Option<&ScrapedPage>) -> Result<Vec<String>> {
            Ok(vec!["Fast".into(), "Simple".into()])
        }

        async fn bonuses(&self, _scraped: Option<&ScrapedPage>) -> Result<Vec<BonusIdea>> {
            Ok([2u8, 1, 4]
                .into_iter()
                .map(|effort| BonusIdea {
                    title: format!("Bonus effort {}", effort),
                    description: "desc".into(),
                    effort: EffortLevel::clamped(effort),
                })
                .collect())
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        requests: Mutex<Vec<PublishRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl Publisher for RecordingPublisher {
        async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
            if self.fail {
                return Err(Error::SimulatedFailure("Failed to publish".into()));
            }
            self.requests.lock().unwrap().push(request.clone());
            Ok(PublishReceipt {
                path: request.path.clone(),
                url: format!("https://clickhumble.com/{}", request.path),
                preview_url: format!("/preview/{}", request.path),
                message: "Bridge page published successfully".into(),
                published_at: Utc::now(),
                replaced: false,
            })
        }
    }

    struct EchoExporter;

    #[async_trait]
    impl WordPressExporter for EchoExporter {
        async fn export(&self, export: &WordPressExport) -> Result<ExportReceipt> {
            Ok(ExportReceipt {
                message: format!("{}|{}", export.title, export.content),
            })
        }
    }

    fn scraped_page() -> ScrapedPage {
        ScrapedPage {
            title: "Ultimate System".into(),
            description: "desc".into(),
            keywords: vec![],
            colors: ColorScheme::uniform("#3b82f6"),
        }
    }

    /// State advanced to the publish step with everything filled in
    async fn ready_to_publish() -> WizardState {
        let mut state = WizardState::new();
        state
            .submit_sales_page(
                "https://warriorplus.com/o2/a/x",
                &FixedScraper(Ok(scraped_page())),
            )
            .await
            .unwrap();
        state.choose_path("my-page", &LengthChecker).await.unwrap();
        state.set_affiliate_link("https://x.test/a");
        state.finish_studio().unwrap();
        state.finish_bonuses().unwrap();
        state
    }

    #[test]
    fn test_initial_state() {
        let state = WizardState::new();
        assert_eq!(state.current_step(), WizardStep::SalesPage);
        assert_eq!(state.headlines().len(), 3);
        assert_eq!(state.selected_headline_index(), 0);
        assert_eq!(state.benefits().len(), 5);
        assert_eq!(state.bonuses().len(), 5);
        assert_eq!(state.selected_bonuses().count(), 3);
        assert_eq!(state.color_scheme(), &ColorScheme::default());
    }

    #[test]
    fn test_step_display() {
        assert_eq!(WizardStep::Studio.to_string(), "3 (AI Studio)");
        assert_eq!(WizardStep::Publish.next(), WizardStep::Publish);
        assert_eq!(WizardStep::SalesPage.previous(), WizardStep::SalesPage);
    }

    #[tokio::test]
    async fn test_scrape_success_adopts_colors() {
        let mut state = WizardState::new();
        let outcome = state
            .submit_sales_page(
                "https://warriorplus.com/o2/a/x",
                &FixedScraper(Ok(scraped_page())),
            )
            .await
            .unwrap();

        assert_eq!(outcome, ScrapeOutcome::Scraped);
        assert_eq!(state.current_step(), WizardStep::Path);
        assert_eq!(state.color_scheme().primary, "#3b82f6");
        assert!(!state.manual_input());
        assert_eq!(state.scraped().unwrap().title, "Ultimate System");
    }

    #[tokio::test]
    async fn test_scrape_failure_falls_back_to_manual() {
        let mut state = WizardState::new();
        let outcome = state
            .submit_sales_page(
                "https://jvzoo.com/c/1/2",
                &FixedScraper(Err("Failed to scrape sales page".into())),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ScrapeOutcome::Manual {
                reason: "Failed to scrape sales page".into()
            }
        );
        assert_eq!(state.current_step(), WizardStep::Path);
        assert!(state.manual_input());
        assert!(state.scraped().is_none());
        assert_eq!(state.color_scheme(), &ColorScheme::default());
    }

    #[tokio::test]
    async fn test_scrape_unexpected_error_does_not_advance() {
        let mut state = WizardState::new();
        let err = state
            .submit_sales_page("https://jvzoo.com/c/1/2", &BrokenScraper)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(state.current_step(), WizardStep::SalesPage);
        assert!(state.manual_input());
    }

    #[tokio::test]
    async fn test_invalid_sales_url_rejected_before_scraping() {
        let mut state = WizardState::new();
        let err = state
            .submit_sales_page("https://example.com", &BrokenScraper)
            .await
            .unwrap_err();

        // BrokenScraper would have produced a Storage error
        assert!(matches!(err, Error::Validation { field: "sales_page_url", .. }));
        assert_eq!(state.sales_page_url(), "");
        assert_eq!(state.current_step(), WizardStep::SalesPage);
    }

    #[tokio::test]
    async fn test_choose_path_available_and_taken() {
        let mut state = WizardState::new();
        state
            .submit_sales_page(
                "https://warriorplus.com/o2/a/x",
                &FixedScraper(Ok(scraped_page())),
            )
            .await
            .unwrap();

        let outcome = state.choose_path("abc", &LengthChecker).await.unwrap();
        assert_eq!(
            outcome,
            PathOutcome::Taken {
                reason: "This path is already taken.".into()
            }
        );
        assert_eq!(state.path(), "");
        assert_eq!(state.current_step(), WizardStep::Path);

        let outcome = state.choose_path("abcdef", &LengthChecker).await.unwrap();
        assert_eq!(outcome, PathOutcome::Available);
        assert_eq!(state.path(), "abcdef");
        assert_eq!(state.current_step(), WizardStep::Studio);
    }

    #[tokio::test]
    async fn test_choose_path_rejects_bad_format() {
        let mut state = WizardState::new();
        state.current_step = WizardStep::Path;
        let err = state
            .choose_path("-bad-path", &LengthChecker)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation { field: "path", .. }));
    }

    #[tokio::test]
    async fn test_step_order_enforced() {
        let mut state = WizardState::new();
        let err = state
            .choose_path("my-page", &LengthChecker)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::StepOrder {
                expected: WizardStep::Path,
                actual: WizardStep::SalesPage
            }
        ));
        assert!(state.finish_studio().is_err());
        assert!(state.finish_bonuses().is_err());
    }

    #[tokio::test]
    async fn test_forward_navigation_is_monotonic() {
        let mut state = WizardState::new();
        let mut seen = vec![state.current_step()];

        state
            .submit_sales_page(
                "https://warriorplus.com/o2/a/x",
                &FixedScraper(Ok(scraped_page())),
            )
            .await
            .unwrap();
        seen.push(state.current_step());
        state.choose_path("my-page", &LengthChecker).await.unwrap();
        seen.push(state.current_step());
        state.set_affiliate_link("https://x.test/a");
        state.finish_studio().unwrap();
        seen.push(state.current_step());
        state.finish_bonuses().unwrap();
        seen.push(state.current_step());

        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&WizardStep::Publish));
    }

    #[tokio::test]
    async fn test_go_back_keeps_data() {
        let mut state = ready_to_publish().await;
        assert_eq!(state.go_back(), WizardStep::Bonuses);
        assert_eq!(state.go_back(), WizardStep::Studio);
        assert_eq!(state.path(), "my-page");
        assert_eq!(state.affiliate_link(), "https://x.test/a");

        // Resubmitting moves forward again
        state.finish_studio().unwrap();
        assert_eq!(state.current_step(), WizardStep::Bonuses);
    }

    #[test]
    fn test_set_color() {
        let mut state = WizardState::new();
        state.set_color(ColorRole::Primary, " #112233 ").unwrap();
        assert_eq!(state.color_scheme().primary, "#112233");

        let err = state.set_color(ColorRole::Text, "blue").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(state.color_scheme().text, "#1f2937");
    }

    #[tokio::test]
    async fn test_regenerate_headlines_resets_selection() {
        let mut state = WizardState::new();
        state.select_headline(2).unwrap();
        state.scraped = Some(scraped_page());

        state.regenerate_headlines(&CannedGenerator).await.unwrap();
        assert_eq!(state.selected_headline_index(), 0);
        assert_eq!(
            state.selected_headline(),
            Some("Ultimate System Changes Everything")
        );
    }

    #[test]
    fn test_select_headline_out_of_range() {
        let mut state = WizardState::new();
        let err = state.select_headline(3).unwrap_err();
        assert!(err.to_string().contains("Headline 4 does not exist"));
        assert_eq!(state.selected_headline_index(), 0);
    }

    #[tokio::test]
    async fn test_benefit_editing() {
        let mut state = WizardState::new();
        state.regenerate_benefits(&CannedGenerator).await.unwrap();
        assert_eq!(state.benefits(), ["Fast", "Simple"]);

        let idx = state.add_benefit();
        assert_eq!(idx, 2);
        state.update_benefit(idx, "Cheap").unwrap();
        assert_eq!(state.benefits()[2], "Cheap");

        state.remove_benefit(0).unwrap();
        state.remove_benefit(0).unwrap();
        assert_eq!(state.benefits(), ["Cheap"]);

        // The last benefit cannot be removed
        assert!(state.remove_benefit(0).is_err());
        assert!(state.update_benefit(5, "x").is_err());
    }

    #[tokio::test]
    async fn test_finish_studio_requires_affiliate_link() {
        let mut state = WizardState::new();
        state.current_step = WizardStep::Studio;
        let err = state.finish_studio().unwrap_err();
        assert!(err.to_string().contains("affiliate link"));
        assert_eq!(state.current_step(), WizardStep::Studio);

        state.set_affiliate_link("  https://x.test/a  ");
        state.finish_studio().unwrap();
        assert_eq!(state.affiliate_link(), "https://x.test/a");
    }

    #[tokio::test]
    async fn test_regenerate_bonuses_assigns_ids_and_selection() {
        let mut state = WizardState::new();
        state.regenerate_bonuses(&CannedGenerator).await.unwrap();

        let ids: Vec<u32> = state.bonuses().iter().map(|b| b.id).collect();
        assert_eq!(ids, [1, 2, 3]);
        let selected: Vec<bool> = state.bonuses().iter().map(|b| b.selected).collect();
        assert_eq!(selected, [true, true, false]);
    }

    #[test]
    fn test_toggle_and_filter_bonuses() {
        let mut state = WizardState::new();
        assert!(state.toggle_bonus(3).unwrap());
        assert!(!state.toggle_bonus(3).unwrap());
        assert!(state.toggle_bonus(99).is_err());

        assert_eq!(state.bonuses_for(EffortFilter::All).count(), 5);
        assert_eq!(state.bonuses_for(EffortFilter::Low).count(), 2);
        assert_eq!(state.bonuses_for(EffortFilter::Medium).count(), 3);
        assert_eq!(state.bonuses_for(EffortFilter::High).count(), 4);
    }

    #[tokio::test]
    async fn test_publish_request_contents() {
        let mut state = ready_to_publish().await;
        state.add_benefit();
        state.set_video_url("   ");

        let request = state.publish_request().unwrap();
        assert_eq!(request.path, "my-page");
        assert_eq!(request.page.headline, state.headlines()[0]);
        assert_eq!(request.page.benefits.len(), 5, "blank benefit is dropped");
        assert_eq!(request.page.selected_bonuses.len(), 3);
        assert!(request.page.selected_bonuses.iter().all(|b| b.selected));
        assert_eq!(request.page.video_url, None);
        assert_eq!(request.page.color_scheme.primary, "#3b82f6");
    }

    #[test]
    fn test_publish_request_required_fields() {
        let mut state = WizardState::new();
        let err = state.publish_request().unwrap_err();
        assert!(err.to_string().contains("Path URL is required"));

        state.path = "my-page".into();
        state.headlines = vec!["".into()];
        let err = state.publish_request().unwrap_err();
        assert!(err.to_string().contains("Headline is required"));

        state.headlines = vec!["Headline".into()];
        let err = state.publish_request().unwrap_err();
        assert!(err.to_string().contains("Affiliate link is required"));

        state.affiliate_link = "https://x.test/a".into();
        assert!(state.publish_request().is_ok());
    }

    #[tokio::test]
    async fn test_publish_success() {
        let state = ready_to_publish().await;
        let publisher = RecordingPublisher::default();
        let receipt = state.publish(&publisher).await.unwrap();

        assert_eq!(receipt.url, "https://clickhumble.com/my-page");
        assert_eq!(receipt.preview_url, "/preview/my-page");
        assert_eq!(publisher.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_state_untouched() {
        let state = ready_to_publish().await;
        let before = state.clone();
        let publisher = RecordingPublisher {
            fail: true,
            ..Default::default()
        };

        let err = state.publish(&publisher).await.unwrap_err();
        assert!(err.is_simulated_failure());
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_export_wordpress_uses_rendered_content() {
        let state = ready_to_publish().await;
        let receipt = state
            .export_wordpress(&EchoExporter, |page| format!("<h1>{}</h1>", page.headline))
            .await
            .unwrap();

        let headline = state.selected_headline().unwrap();
        assert_eq!(receipt.message, format!("{}|<h1>{}</h1>", headline, headline));
    }

    #[tokio::test]
    async fn test_restart() {
        let mut state = ready_to_publish().await;
        state.restart();
        assert_eq!(state, WizardState::new());
    }
}
