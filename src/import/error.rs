//! Import error types

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::cards::CardStoreError;

/// Errors that abort an import run. None of them leave partial rows behind.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    SourceRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Input is not a valid gzip stream: {0}")]
    Decompression(String),

    #[error("Malformed lesson document: {0}")]
    MalformedDocument(String),

    #[error("Store write failed: {0}")]
    StoreWrite(#[from] CardStoreError),
}

impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        Self::StoreWrite(CardStoreError::Sqlite(err))
    }
}

impl ImportError {
    /// Pipeline stage that failed, for reporting
    pub fn stage(&self) -> ImportStage {
        match self {
            Self::SourceRead { .. } => ImportStage::Read,
            Self::Decompression(_) => ImportStage::Decompress,
            Self::MalformedDocument(_) => ImportStage::Parse,
            Self::StoreWrite(_) => ImportStage::Store,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Read,
    Decompress,
    Parse,
    Store,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Read => "read",
            Self::Decompress => "decompress",
            Self::Parse => "parse",
            Self::Store => "store",
        };
        f.write_str(name)
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
