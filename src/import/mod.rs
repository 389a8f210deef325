//! Pauker lesson import
//!
//! Turns a `.pau.gz` lesson into `cards` rows:
//! - Batch number from the batch's position in the lesson
//! - Fresh UUID per card
//! - Idempotent on (front text, back text, batch number)
//! - All-or-nothing per run

mod error;
mod loader;

use std::fs;
use std::path::Path;

pub use error::{ImportError, ImportStage, Result};
pub use loader::{import_lesson, load, normalize, ImportSummary};

use crate::cards::CardStore;
use crate::config::ImportConfig;
use crate::lesson::read_lesson;

/// Import raw lesson bytes into an open store.
pub fn import_bytes(bytes: &[u8], store: &mut CardStore, config: &ImportConfig) -> Result<ImportSummary> {
    let lesson = read_lesson(bytes)?;
    import_lesson(&lesson, store, config)
}

/// Import a lesson file into the store at `db_path`.
///
/// The source is fully parsed before the store is opened, so a bad input
/// file never creates or touches the database.
pub fn import_file(input: &Path, db_path: &Path, config: &ImportConfig) -> Result<ImportSummary> {
    log::debug!("Reading lesson {}", input.display());
    let bytes = fs::read(input).map_err(|source| ImportError::SourceRead {
        path: input.to_path_buf(),
        source,
    })?;
    log::debug!("Lesson file size: {} bytes", bytes.len());

    let lesson = read_lesson(&bytes)?;
    if let Some(description) = lesson.description.as_deref().filter(|d| !d.trim().is_empty()) {
        log::info!("Lesson: {}", description.trim());
    }

    let mut store = CardStore::open(db_path)?;
    import_lesson(&lesson, &mut store, config)
}
