//! Storage Module
//!
//! The joke collection lives in memory and is mirrored to a single JSON file.
//!
//! - `JokeStore`: owns the collection and the backing file path
//! - `writer`: background task that rewrites the backing file in order
//!
//! The in-memory collection is the source of truth for the running process.
//! Disk failures are logged and never fail a request.

mod joke_store;
mod writer;

pub use joke_store::{next_id, JokeStore, Mutation, StoreOptions};
pub use writer::PersistTicket;

use std::path::PathBuf;

use crate::types::JokeId;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("backing file {} is not a JSON array of jokes: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("backing file {} record #{index} does not fit the joke schema: {source}", path.display())]
    InvalidRow {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("record does not fit the joke schema: {0}")]
    InvalidRecord(#[source] serde_json::Error),
    #[error("no id left above {0}")]
    IdsExhausted(JokeId),
    #[error("joke {0} not found")]
    NotFound(JokeId),
    #[error("backing file writer is not running")]
    WriterClosed,
}
