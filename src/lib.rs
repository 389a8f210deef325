//! Pauker lesson importer
//!
//! Loads `.pau.gz` flashcard lessons into SQLite and builds cloze practice
//! dialogs from the stored vocabulary.

pub mod cards;
pub mod cloze;
pub mod config;
pub mod import;
pub mod lesson;
pub mod story;

pub use cards::{Card, CardStore};
pub use config::AppConfig;
pub use import::{import_bytes, import_file, ImportError, ImportSummary};
