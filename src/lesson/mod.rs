//! Pauker lesson reader
//!
//! Reads `.pau.gz` lesson files (gzip-compressed XML) into an ordered tree:
//! - Batches in document order
//! - Cards in document order within their batch
//! - Front/back text and the front side's learned timestamp

mod models;
mod reader;

pub use models::*;
pub use reader::{decompress, parse_lesson, read_lesson};
