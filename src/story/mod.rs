//! Practice dialog generation
//!
//! Samples learned vocabulary from the card store, asks a text generator for
//! a German/Polish dialog and stores the result as cloze markup in `examples`.

mod dialog;
mod generator;
mod prompt;

use thiserror::Error;

pub use dialog::{Dialog, DialogLine};
pub use generator::{ChatCompletionsGenerator, GenerationRequest, TextGenerator};
pub use prompt::{build_prompt, format_vocabulary, SYSTEM_PROMPT};

use crate::cards::{CardStore, CardStoreError, Example};
use crate::config::StoryConfig;

#[derive(Error, Debug)]
pub enum StoryError {
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("No vocabulary outside the reserved batch")]
    NoVocabulary,

    #[error("{0}")]
    Request(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(#[from] CardStoreError),
}

pub type Result<T> = std::result::Result<T, StoryError>;

/// Generate a dialog from sampled vocabulary and store it.
pub fn generate_story(store: &CardStore, generator: &dyn TextGenerator, config: &StoryConfig) -> Result<Example> {
    let vocabulary = store.sample_vocabulary(config.reserved_batch(), config.sample_size)?;
    if vocabulary.is_empty() {
        return Err(StoryError::NoVocabulary);
    }
    log::debug!("Sampled {} vocabulary items", vocabulary.len());

    let request = GenerationRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt: build_prompt(&vocabulary),
        response_schema: Some(Dialog::schema()),
    };
    let output = generator.generate(&request)?;
    let dialog = Dialog::parse(&output)?;

    let example = store.insert_example(&dialog.to_markup())?;
    log::info!("Stored example {} ({} lines)", example.id, dialog.lines.len());
    Ok(example)
}
