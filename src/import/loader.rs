//! Flatten a lesson into card rows and write them in one transaction.

use serde::Serialize;

use super::error::Result;
use crate::cards::{card_exists, insert_card, Card, CardStore};
use crate::config::ImportConfig;
use crate::lesson::Lesson;

/// Outcome of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub batches: usize,
    pub inserted: usize,
    /// Cards whose (front, back, batch) key was already stored
    pub skipped: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.skipped
    }
}

/// Assign identities and batch numbers in document order.
pub fn normalize(lesson: &Lesson, config: &ImportConfig) -> Vec<Card> {
    lesson
        .batches
        .iter()
        .enumerate()
        .flat_map(|(index, batch)| {
            let batch_number = config.batch_number_base + index as i64;
            batch.cards.iter().map(move |raw| {
                Card::new(
                    raw.front_text.clone(),
                    raw.back_text.clone(),
                    raw.learned_timestamp.clone(),
                    batch_number,
                )
            })
        })
        .collect()
}

/// Insert cards not already present. First write wins: an existing row keeps
/// its id and timestamp. Nothing is written unless every insert succeeds.
pub fn load(store: &mut CardStore, cards: &[Card]) -> Result<ImportSummary> {
    let tx = store.transaction()?;
    let mut summary = ImportSummary::default();

    for card in cards {
        if card_exists(&tx, &card.front_text, &card.back_text, card.batch_number)? {
            log::debug!(
                "Skipping duplicate card in batch {}: {:?}",
                card.batch_number,
                truncate(&card.front_text, 50)
            );
            summary.skipped += 1;
            continue;
        }

        insert_card(&tx, card)?;
        summary.inserted += 1;
    }

    tx.commit()?;
    Ok(summary)
}

/// Normalize and load a parsed lesson.
pub fn import_lesson(lesson: &Lesson, store: &mut CardStore, config: &ImportConfig) -> Result<ImportSummary> {
    for (index, batch) in lesson.batches.iter().enumerate() {
        log::debug!(
            "Batch {}: {} cards",
            config.batch_number_base + index as i64,
            batch.cards.len()
        );
    }

    let cards = normalize(lesson, config);
    let mut summary = load(store, &cards)?;
    summary.batches = lesson.batches.len();

    log::info!(
        "Imported {} batches: {} cards inserted, {} duplicates skipped",
        summary.batches,
        summary.inserted,
        summary.skipped
    );
    Ok(summary)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportError;
    use crate::lesson::{Batch, RawCard};

    fn lesson(batches: Vec<Vec<RawCard>>) -> Lesson {
        Lesson {
            description: None,
            batches: batches.into_iter().map(|cards| Batch { cards }).collect(),
        }
    }

    #[test]
    fn test_normalize_assigns_batch_numbers() {
        let lesson = lesson(vec![
            vec![RawCard::new("a", "1"), RawCard::new("b", "2")],
            vec![],
            vec![RawCard::new("c", "3").with_timestamp("1672531200000")],
        ]);

        let cards = normalize(&lesson, &ImportConfig::default());
        let numbers: Vec<_> = cards.iter().map(|c| c.batch_number).collect();
        assert_eq!(numbers, vec![1, 1, 3]);
        assert_eq!(cards[2].learned_timestamp.as_deref(), Some("1672531200000"));
        assert_ne!(cards[0].id, cards[1].id);
    }

    #[test]
    fn test_normalize_with_zero_base() {
        let lesson = lesson(vec![vec![RawCard::new("a", "1")], vec![RawCard::new("b", "2")]]);
        let config = ImportConfig { batch_number_base: 0 };

        let numbers: Vec<_> = normalize(&lesson, &config).iter().map(|c| c.batch_number).collect();
        assert_eq!(numbers, vec![0, 1]);
    }

    #[test]
    fn test_import_twice_is_noop() {
        let mut store = CardStore::open_in_memory().unwrap();
        let lesson = lesson(vec![
            vec![RawCard::new("cat", "chat")],
            vec![RawCard::new("dog", "chien").with_timestamp("2023-01-01T00:00:00")],
        ]);
        let config = ImportConfig::default();

        let first = import_lesson(&lesson, &mut store, &config).unwrap();
        assert_eq!(first, ImportSummary { batches: 2, inserted: 2, skipped: 0 });
        let ids: Vec<_> = store.list_cards(None).unwrap().into_iter().map(|c| c.id).collect();

        let second = import_lesson(&lesson, &mut store, &config).unwrap();
        assert_eq!(second, ImportSummary { batches: 2, inserted: 0, skipped: 2 });

        let after: Vec<_> = store.list_cards(None).unwrap().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, after);
    }

    #[test]
    fn test_first_write_wins_for_timestamp() {
        let mut store = CardStore::open_in_memory().unwrap();
        let config = ImportConfig::default();

        import_lesson(&lesson(vec![vec![RawCard::new("cat", "chat")]]), &mut store, &config).unwrap();
        let relearned = lesson(vec![vec![RawCard::new("cat", "chat").with_timestamp("1700000000000")]]);
        let summary = import_lesson(&relearned, &mut store, &config).unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(store.list_cards(None).unwrap()[0].learned_timestamp, None);
    }

    #[test]
    fn test_same_card_in_another_batch_is_new() {
        let mut store = CardStore::open_in_memory().unwrap();
        let lesson = lesson(vec![vec![RawCard::new("cat", "chat")], vec![RawCard::new("cat", "chat")]]);

        let summary = import_lesson(&lesson, &mut store, &ImportConfig::default()).unwrap();
        assert_eq!(summary.inserted, 2);
    }

    #[test]
    fn test_duplicate_within_one_batch_is_skipped() {
        let mut store = CardStore::open_in_memory().unwrap();
        let lesson = lesson(vec![vec![RawCard::new("", ""), RawCard::new("", "")]]);

        let summary = import_lesson(&lesson, &mut store, &ImportConfig::default()).unwrap();
        assert_eq!(summary, ImportSummary { batches: 1, inserted: 1, skipped: 1 });
        assert_eq!(summary.total(), lesson.card_count());

        let cards = store.list_cards(None).unwrap();
        assert_eq!(cards[0].front_text, "");
        assert_eq!(cards[0].back_text, "");
    }

    #[test]
    fn test_store_error_rolls_back() {
        let mut store = CardStore::open_in_memory().unwrap();
        let mut cards = normalize(
            &lesson(vec![vec![RawCard::new("a", "1"), RawCard::new("b", "2")]]),
            &ImportConfig::default(),
        );
        // Reused primary key makes the second insert fail
        cards[1].id = cards[0].id;

        let err = load(&mut store, &cards).unwrap_err();
        assert!(matches!(err, ImportError::StoreWrite(_)));
        assert_eq!(store.count_cards().unwrap(), 0);
    }

    #[test]
    fn test_summary_json() {
        let summary = ImportSummary { batches: 2, inserted: 3, skipped: 1 };
        assert_eq!(
            serde_json::to_value(summary).unwrap(),
            serde_json::json!({ "batches": 2, "inserted": 3, "skipped": 1 })
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("źdźbło", 2), "źd");
        assert_eq!(truncate("kot", 10), "kot");
    }
}
