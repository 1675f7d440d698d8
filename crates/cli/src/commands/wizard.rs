// Interactive, five-step page builder.
//
// Every prompt also understands `back` (previous step) and `restart`
// (discard the page and start over), except the very first URL prompt
// where there is nothing to go back to.

use anyhow::{Context, Result};
use bridge_kit_core::config::save_page_toml;
use bridge_kit_core::{
    ColorRole, EffortFilter, Error, PathOutcome, PublishReceipt, ScrapeOutcome, WizardState,
    WizardStep,
};
use bridge_kit_deployer::Collaborators;
use bridge_kit_generator::render_page;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::debug;

use super::build::write_page;
use super::{PAGE_FILE, Workspace};

pub async fn run(save: Option<PathBuf>, no_delay: bool) -> Result<()> {
    let ws = Workspace::load(no_delay)?;
    let collaborators = ws.collaborators(ws.store().await?);

    println!("🪄 Bridge page wizard");
    println!("   Type 'back' to return to the previous step, 'restart' to start over.\n");

    let stdin = io::stdin();
    let finished = Session::new(stdin.lock(), io::stdout(), &collaborators)
        .site(ws.settings.base_url(), ws.settings.preview.port)
        .run()
        .await?;

    if let Some(dir) = save {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        save_page_toml(&finished.state, dir.join(PAGE_FILE)).context("Failed to save page.toml")?;
        let html = write_page(&finished.state, &dir)?;
        println!("💾 Saved {} and {}", dir.join(PAGE_FILE).display(), html.display());
    }

    Ok(())
}

/// What a completed wizard run produced
#[derive(Debug)]
pub struct Finished {
    pub state: WizardState,
    pub receipt: Option<PublishReceipt>,
}

enum Nav {
    Back,
    Restart,
}

fn navigation(input: &str) -> Option<Nav> {
    match input.to_ascii_lowercase().as_str() {
        "back" => Some(Nav::Back),
        "restart" => Some(Nav::Restart),
        _ => None,
    }
}

/// One wizard run over a line-oriented terminal
pub struct Session<'a, R, W> {
    input: R,
    output: W,
    services: &'a Collaborators,
    state: WizardState,
    receipt: Option<PublishReceipt>,
    host: String,
    preview_port: u16,
    studio_generated: bool,
    bonuses_generated: bool,
    filter: EffortFilter,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(input: R, output: W, services: &'a Collaborators) -> Self {
        Self {
            input,
            output,
            services,
            state: WizardState::new(),
            receipt: None,
            host: "clickhumble.com".to_string(),
            preview_port: 8080,
            studio_generated: false,
            bonuses_generated: false,
            filter: EffortFilter::All,
        }
    }

    /// Where pages are announced and previewed
    pub fn site(mut self, base_url: &str, preview_port: u16) -> Self {
        self.host = base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string();
        self.preview_port = preview_port;
        self
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(line.trim().to_string())
    }

    /// Report a recoverable problem, or pass anything else up
    fn recover(&mut self, err: Error) -> Result<()> {
        if err.is_validation() || err.is_simulated_failure() {
            self.say(&format!("   ✗ {}", err.user_message()))
        } else {
            Err(err.into())
        }
    }

    /// Act on `back` / `restart`; returns whether the input was one of them
    fn navigate(&mut self, input: &str) -> bool {
        match navigation(input) {
            Some(Nav::Back) => {
                let step = self.state.go_back();
                debug!(%step, "wizard stepped back");
                true
            }
            Some(Nav::Restart) => {
                self.state.restart();
                self.receipt = None;
                self.studio_generated = false;
                self.bonuses_generated = false;
                self.filter = EffortFilter::All;
                true
            }
            None => false,
        }
    }

    fn header(&mut self, step: WizardStep) -> Result<()> {
        self.say(&format!("\n── Step {} of 5: {} ──", step.number(), step.title()))
    }

    pub async fn run(mut self) -> Result<Finished> {
        loop {
            match self.state.current_step() {
                WizardStep::SalesPage => self.sales_page_step().await?,
                WizardStep::Path => self.path_step().await?,
                WizardStep::Studio => self.studio_step().await?,
                WizardStep::Bonuses => self.bonuses_step().await?,
                WizardStep::Publish => {
                    if self.publish_step().await? {
                        return Ok(Finished {
                            state: self.state,
                            receipt: self.receipt,
                        });
                    }
                }
            }
        }
    }

    async fn sales_page_step(&mut self) -> Result<()> {
        self.header(WizardStep::SalesPage)?;
        loop {
            let url = self.ask("Sales page URL (WarriorPlus or JVZoo): ")?;
            self.say("⏳ Analyzing sales page...")?;
            match self
                .state
                .submit_sales_page(&url, self.services.scraper.as_ref())
                .await
            {
                Ok(ScrapeOutcome::Scraped) => {
                    let title = self
                        .state
                        .scraped()
                        .map(|s| s.title.clone())
                        .unwrap_or_default();
                    return self.say(&format!("   ✓ Found: {}", title));
                }
                Ok(ScrapeOutcome::Manual { reason }) => {
                    return self.say(&format!(
                        "   ⚠ {}. Continuing with manual input; pick your colours in the studio.",
                        reason
                    ));
                }
                Err(e) if e.is_validation() => self.recover(e)?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn path_step(&mut self) -> Result<()> {
        self.header(WizardStep::Path)?;
        loop {
            let candidate = self.ask(&format!("Page path ({}/<path>): ", self.host))?;
            if self.navigate(&candidate) {
                return Ok(());
            }
            self.say("⏳ Checking availability...")?;
            match self
                .state
                .choose_path(&candidate, self.services.paths.as_ref())
                .await
            {
                Ok(PathOutcome::Available) => return self.say("   ✓ Path is available"),
                Ok(PathOutcome::Taken { reason }) => self.say(&format!("   ✗ {}", reason))?,
                Err(e) => self.recover(e)?,
            }
        }
    }

    async fn studio_step(&mut self) -> Result<()> {
        self.header(WizardStep::Studio)?;

        if !self.studio_generated {
            self.say("⏳ Generating headlines and benefits...")?;
            if let Err(e) = self
                .state
                .regenerate_headlines(self.services.content.as_ref())
                .await
            {
                self.recover(e)?;
            }
            if let Err(e) = self
                .state
                .regenerate_benefits(self.services.content.as_ref())
                .await
            {
                self.recover(e)?;
            }
            self.studio_generated = true;
        }

        // Colours
        loop {
            let scheme: Vec<String> = self
                .state
                .color_scheme()
                .entries()
                .map(|(role, value)| format!("{}={}", role, value))
                .collect();
            self.say(&format!("Colours: {}", scheme.join(" ")))?;
            let input = self.ask("Change a colour ('<role> <#hex>'), Enter to keep: ")?;
            if input.is_empty() {
                break;
            }
            if self.navigate(&input) {
                return Ok(());
            }
            let mut parts = input.splitn(2, [' ', '=']);
            let role = parts.next().unwrap_or_default();
            let value = parts.next().unwrap_or_default();
            match role.parse::<ColorRole>() {
                Ok(role) => {
                    if let Err(e) = self.state.set_color(role, value) {
                        self.recover(e)?;
                    }
                }
                Err(msg) => self.say(&format!("   ✗ {}", msg))?,
            }
        }

        // Headline
        loop {
            let headlines: Vec<String> = self.state.headlines().to_vec();
            for (i, headline) in headlines.iter().enumerate() {
                let marker = if i == self.state.selected_headline_index() { "▶" } else { " " };
                self.say(&format!(" {} {}. {}", marker, i + 1, headline))?;
            }
            let input = self.ask("Headline number, 'regen' for new ideas, Enter to keep: ")?;
            if input.is_empty() {
                break;
            }
            if self.navigate(&input) {
                return Ok(());
            }
            if input.eq_ignore_ascii_case("regen") {
                if let Err(e) = self
                    .state
                    .regenerate_headlines(self.services.content.as_ref())
                    .await
                {
                    self.recover(e)?;
                }
                continue;
            }
            match input.parse::<usize>() {
                Ok(n) if n >= 1 => match self.state.select_headline(n - 1) {
                    Ok(()) => break,
                    Err(e) => self.recover(e)?,
                },
                _ => self.say("   ✗ Enter a headline number")?,
            }
        }

        // Benefits
        loop {
            let benefits: Vec<String> = self.state.benefits().to_vec();
            for (i, benefit) in benefits.iter().enumerate() {
                self.say(&format!("   {}. {}", i + 1, benefit))?;
            }
            let input = self.ask(
                "Benefits: 'add <text>', 'edit <n> <text>', 'remove <n>', 'regen', Enter to keep: ",
            )?;
            if input.is_empty() {
                break;
            }
            if self.navigate(&input) {
                return Ok(());
            }
            if let Err(e) = self.edit_benefits(&input).await {
                self.recover(e)?;
            }
        }

        let video = self.ask("Video URL (optional, Enter to skip): ")?;
        if self.navigate(&video) {
            return Ok(());
        }
        self.state.set_video_url(&video);

        loop {
            let link = self.ask("Affiliate link: ")?;
            if self.navigate(&link) {
                return Ok(());
            }
            self.state.set_affiliate_link(&link);
            match self.state.finish_studio() {
                Ok(()) => return Ok(()),
                Err(e) => self.recover(e)?,
            }
        }
    }

    async fn edit_benefits(&mut self, input: &str) -> bridge_kit_core::Result<()> {
        let (command, rest) = input.split_once(' ').unwrap_or((input, ""));
        let index = |s: &str| -> bridge_kit_core::Result<usize> {
            s.trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .map(|n| n - 1)
                .ok_or_else(|| Error::validation("benefits", "Enter a benefit number"))
        };
        match command.to_ascii_lowercase().as_str() {
            "add" => {
                let i = self.state.add_benefit();
                self.state.update_benefit(i, rest.trim())
            }
            "edit" => {
                let (n, text) = rest.split_once(' ').unwrap_or((rest, ""));
                self.state.update_benefit(index(n)?, text.trim())
            }
            "remove" => self.state.remove_benefit(index(rest)?),
            "regen" => {
                self.state
                    .regenerate_benefits(self.services.content.as_ref())
                    .await
            }
            _ => Err(Error::validation("benefits", "Unknown benefits command")),
        }
    }

    async fn bonuses_step(&mut self) -> Result<()> {
        self.header(WizardStep::Bonuses)?;

        if !self.bonuses_generated {
            self.say("⏳ Generating bonus ideas...")?;
            if let Err(e) = self
                .state
                .regenerate_bonuses(self.services.content.as_ref())
                .await
            {
                self.recover(e)?;
            }
            self.bonuses_generated = true;
        }

        loop {
            let shown: Vec<String> = self
                .state
                .bonuses_for(self.filter)
                .map(|b| {
                    format!(
                        "   [{}] {}. {} {}\n         {}",
                        if b.selected { "x" } else { " " },
                        b.id,
                        b.title,
                        b.effort.meter(),
                        b.description
                    )
                })
                .collect();
            self.say(&format!("Bonuses (filter: {:?}):", self.filter))?;
            if shown.is_empty() {
                self.say("   No bonuses at this effort level")?;
            }
            for line in shown {
                self.say(&line)?;
            }

            let input =
                self.ask("Toggle a bonus by id, filter with all/low/medium/high, 'regen', Enter to continue: ")?;
            if input.is_empty() {
                self.state.finish_bonuses()?;
                return Ok(());
            }
            if self.navigate(&input) {
                return Ok(());
            }
            match input.to_ascii_lowercase().as_str() {
                "all" => self.filter = EffortFilter::All,
                "low" => self.filter = EffortFilter::Low,
                "medium" => self.filter = EffortFilter::Medium,
                "high" => self.filter = EffortFilter::High,
                "regen" => {
                    if let Err(e) = self
                        .state
                        .regenerate_bonuses(self.services.content.as_ref())
                        .await
                    {
                        self.recover(e)?;
                    }
                }
                other => match other.parse::<u32>() {
                    Ok(id) => {
                        if let Err(e) = self.state.toggle_bonus(id) {
                            self.recover(e)?;
                        }
                    }
                    Err(_) => self.say("   ✗ Enter a bonus id or a filter")?,
                },
            }
        }
    }

    /// Returns whether the run is complete; `false` after navigating away
    async fn publish_step(&mut self) -> Result<bool> {
        self.header(WizardStep::Publish)?;
        self.say(&format!("   Path: {}", self.state.path()))?;
        let headline = self.state.selected_headline().unwrap_or_default().to_string();
        self.say(&format!("   Headline: {}", headline))?;
        self.say(&format!("   Benefits: {}", self.state.benefits().len()))?;
        let selected = self.state.selected_bonuses().count();
        self.say(&format!("   Bonuses selected: {}", selected))?;
        if !self.state.video_url().is_empty() {
            let video = self.state.video_url().to_string();
            self.say(&format!("   Video: {}", video))?;
        }

        loop {
            let input = self.ask("Publish now? (Y/n): ")?;
            if self.navigate(&input) {
                return Ok(false);
            }
            if input.eq_ignore_ascii_case("n") {
                self.say("   Not published")?;
                return Ok(true);
            }

            self.say("⏳ Publishing...")?;
            let receipt = match self.state.publish(self.services.publisher.as_ref()).await {
                Ok(receipt) => receipt,
                Err(e) => {
                    self.recover(e)?;
                    continue;
                }
            };
            self.say(&format!("✅ {}", receipt.message))?;
            self.say(&format!("   Live URL: {}", receipt.url))?;
            self.say(&format!(
                "   Preview: http://localhost:{}{}",
                self.preview_port, receipt.preview_url
            ))?;

            self.receipt = Some(receipt);

            let export = self.ask("Export to WordPress too? (y/N): ")?;
            if self.navigate(&export) {
                return Ok(false);
            }
            if export.eq_ignore_ascii_case("y") {
                self.say("⏳ Exporting...")?;
                match self
                    .state
                    .export_wordpress(self.services.exporter.as_ref(), render_page)
                    .await
                {
                    Ok(done) => self.say(&format!("   ✓ {}", done.message))?,
                    Err(e) => self.recover(e)?,
                }
            }
            return Ok(true);
        }
    }
}
