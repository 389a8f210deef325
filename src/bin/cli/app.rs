use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pauker_lib::config::AppConfig;
use pauker_lib::story::ChatCompletionsGenerator;
use pauker_lib::CardStore;

/// Shared state for CLI commands
pub struct App {
    pub config: AppConfig,
}

impl App {
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load(config_path).context("Failed to load configuration")?;
        Ok(Self { config })
    }

    /// Open an existing card database
    pub fn open_store(&self, db_path: &Path) -> Result<CardStore> {
        if !db_path.exists() {
            anyhow::bail!(
                "Card database '{}' not found. Run `pauker-cli import` first.",
                db_path.display()
            );
        }
        CardStore::open(db_path)
            .with_context(|| format!("Failed to open card database '{}'", db_path.display()))
    }

    pub fn generator(&self) -> Result<ChatCompletionsGenerator> {
        ChatCompletionsGenerator::from_config(&self.config.story)
            .context("Failed to set up dialog generator")
    }

    /// Where the cloze page for an example is written
    pub fn page_path(&self, out_dir: Option<&Path>, example_id: &str) -> PathBuf {
        out_dir
            .unwrap_or(&self.config.story.out_dir)
            .join(format!("{}.html", example_id))
    }
}
