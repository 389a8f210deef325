//! Configuration for imports and dialog generation.
//!
//! Everything has a default; a TOML file only needs the keys it overrides:
//! ```toml
//! [import]
//! batch_number_base = 1
//!
//! [story]
//! provider = "gemini"
//! sample_size = 20
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default SQLite file written next to the caller
pub const DEFAULT_DATABASE: &str = "pauker_cards.sqlite";

/// Number given to the first batch of a lesson
pub const DEFAULT_BATCH_NUMBER_BASE: i64 = 1;

/// Pauker keeps the unlearned pile in the first batch, so the reserved
/// batch follows `import.batch_number_base` unless set explicitly
pub const DEFAULT_RESERVED_BATCH: i64 = DEFAULT_BATCH_NUMBER_BASE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub import: ImportConfig,
    pub story: StoryConfig,
}

impl AppConfig {
    /// Load from a TOML file, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };
        config.resolve()
    }

    /// Fill derived defaults and validate
    pub fn resolve(mut self) -> Result<Self> {
        if self.story.reserved_batch.is_none() {
            self.story.reserved_batch = Some(self.import.batch_number_base);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.import.batch_number_base;
        if base < 0 {
            return Err(ConfigError::Invalid {
                key: "import.batch_number_base",
                message: format!("must not be negative, got {}", base),
            });
        }
        if let Some(reserved) = self.story.reserved_batch.filter(|&r| r < base) {
            return Err(ConfigError::Invalid {
                key: "story.reserved_batch",
                message: format!("{} is below the first batch number {}", reserved, base),
            });
        }
        if self.story.sample_size == 0 {
            return Err(ConfigError::Invalid {
                key: "story.sample_size",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Settings for the lesson import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Batch number assigned to the first batch in document order
    pub batch_number_base: i64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_number_base: DEFAULT_BATCH_NUMBER_BASE,
        }
    }
}

/// Which OpenAI-compatible endpoint generates dialogs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1/",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta/openai/",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o",
            Self::Gemini => "gemini-1.5-pro",
        }
    }
}

/// Settings for practice dialog generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub provider: Provider,
    /// Overrides the provider's default model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Overrides the provider's default endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Cards from this batch are never used as vocabulary. Unset means the
    /// first batch of the import numbering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_batch: Option<i64>,
    /// How many cards are sampled per dialog
    pub sample_size: usize,
    pub temperature: Option<f64>,
    /// Directory for rendered cloze pages
    pub out_dir: PathBuf,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            base_url: None,
            reserved_batch: None,
            sample_size: 15,
            temperature: None,
            out_dir: PathBuf::from("out"),
        }
    }
}

impl StoryConfig {
    pub fn reserved_batch(&self) -> i64 {
        self.reserved_batch.unwrap_or(DEFAULT_RESERVED_BATCH)
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}
