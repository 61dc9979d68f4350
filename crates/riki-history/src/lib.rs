//! Page edit history for Riki.
//!
//! Every save of a wiki page records an immutable [`Entry`] holding the full
//! page text, the editor, and the edit timestamp. A page's [`History`] is an
//! append-only, timestamp-ordered collection of those entries that can answer
//! "which entry came right before this one?" in `O(log n)`.
//!
//! # Architecture
//!
//! - **Entries** are self-contained snapshots, never deltas, and never change
//!   once recorded.
//! - **Histories** key entries by [`riki_types::EditTimestamp`]; a timestamp
//!   can be used only once per page.
//! - **Stores** hold one history per page and serialize writers per page
//!   while letting other pages proceed.
//!
//! # Modules
//!
//! - [`error`] -- Error types for history operations
//! - [`entry`] -- The [`Entry`] type
//! - [`history`] -- Single-page [`History`]
//! - [`traits`] -- The [`HistoryStore`] trait defining the storage interface
//! - [`memory`] -- In-memory [`InMemoryHistoryStore`]
//! - [`snapshot`] -- JSON snapshot files for durable storage

pub mod entry;
pub mod error;
pub mod history;
pub mod memory;
pub mod snapshot;
pub mod traits;

pub use entry::Entry;
pub use error::{HistoryError, HistoryResult};
pub use history::History;
pub use memory::InMemoryHistoryStore;
pub use snapshot::{load_dir, save_all, save_page, HistorySnapshot};
pub use traits::HistoryStore;
