//! Row models for the card store

use serde::Serialize;
use uuid::Uuid;

/// A flashcard row. Created by the importer, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub front_text: String,
    pub back_text: String,
    /// Copied verbatim from the lesson; `None` means never learned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learned_timestamp: Option<String>,
    pub batch_number: i64,
}

impl Card {
    pub fn new(front_text: String, back_text: String, learned_timestamp: Option<String>, batch_number: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            front_text,
            back_text,
            learned_timestamp,
            batch_number,
        }
    }
}

/// A front/back pair handed to the dialog prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub front_text: String,
    pub back_text: String,
}

/// A generated practice dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub id: String,
    /// Cloze markup, one `A:`/`B:` line per dialog turn
    pub body: String,
    pub date: Option<String>,
}

/// Number of cards stored for one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCount {
    pub batch_number: i64,
    pub card_count: u64,
}
