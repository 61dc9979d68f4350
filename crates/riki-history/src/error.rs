//! Error types for history operations.

use riki_types::{EditTimestamp, PageSlug};
use thiserror::Error;

/// Errors that can occur while recording or reading page history.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// No entry exists at this timestamp (or the page has no history).
    #[error("no edit of {page} at {timestamp}")]
    NotFound {
        page: PageSlug,
        timestamp: EditTimestamp,
    },

    /// An entry already exists at this timestamp.
    #[error("an edit of {page} already exists at {timestamp}")]
    DuplicateTimestamp {
        page: PageSlug,
        timestamp: EditTimestamp,
    },

    /// A history lock was poisoned by a panicking writer.
    #[error("history lock poisoned: {0}")]
    LockPoisoned(String),

    /// Snapshot encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error while reading or writing snapshots.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Convenience type alias for history operations.
pub type HistoryResult<T> = std::result::Result<T, HistoryError>;
