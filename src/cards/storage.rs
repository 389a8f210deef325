//! SQLite card store.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use thiserror::Error;
use uuid::Uuid;

use super::models::{BatchCount, Card, Example, VocabularyItem};

#[derive(Error, Debug)]
pub enum CardStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid card id {0}: {1}")]
    InvalidId(String, uuid::Error),
}

pub type Result<T> = std::result::Result<T, CardStoreError>;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cards (
        id TEXT PRIMARY KEY,
        front_text TEXT,
        back_text TEXT,
        learned_timestamp TEXT NULL,
        batch_number INTEGER
    );

    -- Written by dialog generation only
    CREATE TABLE IF NOT EXISTS examples (
        id TEXT PRIMARY KEY,
        body TEXT,
        date TEXT
    );

    -- Identity probe used by the importer
    CREATE INDEX IF NOT EXISTS idx_cards_identity
        ON cards(front_text, back_text, batch_number);
"#;

/// Handle to the card database. One handle per import run or query session.
pub struct CardStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl CardStore {
    /// Open (or create) the store at the given path.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&db_path)?;
        conn.execute_batch(SCHEMA)?;
        log::debug!("Opened card store at {}", db_path.display());

        Ok(Self {
            conn,
            db_path: Some(db_path),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, db_path: None })
    }

    /// Begin the write transaction of an import run. The write lock is held
    /// from the start; dropping it without `commit()` rolls back.
    pub(crate) fn transaction(&mut self) -> Result<Transaction<'_>> {
        Ok(self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?)
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn count_cards(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// List cards in import order, optionally limited to one batch.
    pub fn list_cards(&self, batch_number: Option<i64>) -> Result<Vec<Card>> {
        let row_mapper = |row: &rusqlite::Row| -> rusqlite::Result<(String, Option<String>, Option<String>, Option<String>, i64)> {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
            ))
        };

        let rows: Vec<_> = match batch_number {
            Some(batch) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, front_text, back_text, learned_timestamp, batch_number
                     FROM cards WHERE batch_number = ?1 ORDER BY rowid",
                )?;
                let rows = stmt
                    .query_map(params![batch], row_mapper)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, front_text, back_text, learned_timestamp, batch_number
                     FROM cards ORDER BY batch_number, rowid",
                )?;
                let rows = stmt
                    .query_map([], row_mapper)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };

        rows.into_iter()
            .map(|(id, front_text, back_text, learned_timestamp, batch_number)| -> Result<Card> {
                let parsed = Uuid::parse_str(&id).map_err(|e| CardStoreError::InvalidId(id.clone(), e))?;
                Ok(Card {
                    id: parsed,
                    front_text: front_text.unwrap_or_default(),
                    back_text: back_text.unwrap_or_default(),
                    learned_timestamp,
                    batch_number,
                })
            })
            .collect()
    }

    /// Card counts per batch, in batch order.
    pub fn batch_counts(&self) -> Result<Vec<BatchCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT batch_number, COUNT(*) FROM cards GROUP BY batch_number ORDER BY batch_number",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(BatchCount {
                    batch_number: row.get(0)?,
                    card_count: row.get::<_, i64>(1)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    /// Random sample of cards outside `excluded_batch`. Cards with both
    /// sides empty carry no vocabulary and are left out.
    pub fn sample_vocabulary(&self, excluded_batch: i64, limit: usize) -> Result<Vec<VocabularyItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT front_text, back_text FROM cards
             WHERE batch_number != ?1
             ORDER BY random()
             LIMIT ?2",
        )?;
        let items = stmt
            .query_map(params![excluded_batch, limit as i64], |row| {
                Ok(VocabularyItem {
                    front_text: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    back_text: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(items
            .into_iter()
            .filter(|item| !item.front_text.is_empty() || !item.back_text.is_empty())
            .collect())
    }

    // ==================== Example Operations ====================

    pub fn insert_example(&self, body: &str) -> Result<Example> {
        let example = Example {
            id: Uuid::new_v4().to_string(),
            body: body.to_string(),
            date: Some(Utc::now().to_rfc3339()),
        };
        self.conn.execute(
            "INSERT INTO examples (id, body, date) VALUES (?1, ?2, ?3)",
            params![example.id, example.body, example.date],
        )?;
        Ok(example)
    }

    pub fn get_example(&self, id: &str) -> Result<Option<Example>> {
        let example = self
            .conn
            .query_row(
                "SELECT id, body, date FROM examples WHERE id = ?1",
                params![id],
                example_from_row,
            )
            .optional()?;
        Ok(example)
    }

    /// Most recently generated example
    pub fn latest_example(&self) -> Result<Option<Example>> {
        let example = self
            .conn
            .query_row(
                "SELECT id, body, date FROM examples ORDER BY date DESC, rowid DESC LIMIT 1",
                [],
                example_from_row,
            )
            .optional()?;
        Ok(example)
    }
}

fn example_from_row(row: &rusqlite::Row) -> rusqlite::Result<Example> {
    Ok(Example {
        id: row.get(0)?,
        body: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        date: row.get(2)?,
    })
}

/// Whether a card with this identity key is already stored
pub(crate) fn card_exists(conn: &Connection, front_text: &str, back_text: &str, batch_number: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM cards
            WHERE front_text = ?1 AND back_text = ?2 AND batch_number = ?3
        )",
        params![front_text, back_text, batch_number],
        |row| row.get(0),
    )
}

pub(crate) fn insert_card(conn: &Connection, card: &Card) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO cards (id, front_text, back_text, learned_timestamp, batch_number)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            card.id.to_string(),
            card.front_text,
            card.back_text,
            card.learned_timestamp,
            card.batch_number,
        ],
    )?;
    Ok(())
}
