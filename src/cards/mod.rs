//! Relational card store
//!
//! This module provides:
//! - The SQLite schema (`cards`, `examples`)
//! - Row models for imported cards and generated examples
//! - Read queries used by the practice dialog surface

mod models;
mod storage;

pub use models::*;
pub use storage::{CardStore, CardStoreError};
pub(crate) use storage::{card_exists, insert_card};
