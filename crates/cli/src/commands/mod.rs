pub mod build;
pub mod deploy;
pub mod export;
pub mod init;
pub mod preview;
pub mod validate;
pub mod wizard;

use anyhow::{Context, Result};
use bridge_kit_core::WizardState;
use bridge_kit_core::config::{LatencySettings, Settings, load_settings, parse_page_toml};
use bridge_kit_deployer::{Collaborators, FileStore, PublishStore};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Page description inside a page directory
pub const PAGE_FILE: &str = "page.toml";

const HOME_ENV: &str = "BRIDGE_KIT_HOME";

/// `$BRIDGE_KIT_HOME`, or `~/.bridge-kit`
pub fn home_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".bridge-kit"))
}

/// Global settings plus the location of bridge-kit's own files
pub struct Workspace {
    pub home: PathBuf,
    pub settings: Settings,
}

impl Workspace {
    pub fn load(no_delay: bool) -> Result<Self> {
        Self::load_from(home_dir()?, no_delay)
    }

    pub fn load_from(home: PathBuf, no_delay: bool) -> Result<Self> {
        let config = home.join("config.toml");
        let mut settings = load_settings(&config)
            .with_context(|| format!("Failed to load {}", config.display()))?;
        if no_delay {
            settings.latency = LatencySettings::none();
        }
        Ok(Self { home, settings })
    }

    pub fn data_dir(&self) -> PathBuf {
        self.settings.data_dir_in(&self.home)
    }

    pub async fn file_store(&self) -> Result<FileStore> {
        let dir = self.data_dir();
        FileStore::open(&dir)
            .await
            .with_context(|| format!("Failed to open page store at {}", dir.display()))
    }

    pub async fn store(&self) -> Result<PublishStore> {
        Ok(PublishStore::new(Arc::new(self.file_store().await?)))
    }

    pub fn collaborators(&self, store: PublishStore) -> Collaborators {
        Collaborators::simulated(&self.settings, store)
    }
}

/// Load `<dir>/page.toml`
pub fn load_page(dir: &Path) -> Result<WizardState> {
    let file = dir.join(PAGE_FILE);
    if !file.exists() {
        anyhow::bail!(
            "page.toml not found in {}\nRun 'bridge-kit init {}' first",
            dir.display(),
            dir.display()
        );
    }
    parse_page_toml(&file).context("Failed to parse page.toml")
}

/// Helper to read user input
pub fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
