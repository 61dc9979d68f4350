//! The [`HistoryStore`] trait defining the history storage interface.

use riki_types::{EditTimestamp, EditorId, PageSlug};

use crate::entry::Entry;
use crate::error::HistoryResult;
use crate::history::History;

/// Storage backend for page histories.
///
/// Implementations must be thread-safe (`Send + Sync`). Writes to one page
/// are serialized; writes to different pages must not block each other.
/// Every read observes a state in which each recorded entry is either fully
/// present or absent.
pub trait HistoryStore: Send + Sync {
    /// Record a new edit of `page`. Creates the page's history on first use.
    ///
    /// Fails with `DuplicateTimestamp` if `page` already has an entry at
    /// `timestamp`; the existing entry is left untouched.
    fn record(
        &self,
        page: &PageSlug,
        content: String,
        editor: EditorId,
        timestamp: EditTimestamp,
    ) -> HistoryResult<Entry>;

    /// Read the entry at `timestamp`.
    fn get(&self, page: &PageSlug, timestamp: EditTimestamp) -> HistoryResult<Entry>;

    /// Read the entry immediately older than the one at `timestamp`.
    ///
    /// Returns `Ok(None)` for the oldest entry and `NotFound` if there is no
    /// entry at `timestamp`.
    fn predecessor_of(
        &self,
        page: &PageSlug,
        timestamp: EditTimestamp,
    ) -> HistoryResult<Option<Entry>>;

    /// Read an entry together with its predecessor.
    ///
    /// Backends that can should answer from a single consistent view so a
    /// concurrent out-of-order insert cannot slip in between the two reads.
    fn entry_with_predecessor(
        &self,
        page: &PageSlug,
        timestamp: EditTimestamp,
    ) -> HistoryResult<(Entry, Option<Entry>)> {
        let entry = self.get(page, timestamp)?;
        let predecessor = self.predecessor_of(page, timestamp)?;
        Ok((entry, predecessor))
    }

    /// All entries of `page`, newest first. Empty if the page has no history.
    fn entries(&self, page: &PageSlug) -> HistoryResult<Vec<Entry>>;

    /// The most recent entry of `page`.
    fn latest(&self, page: &PageSlug) -> HistoryResult<Option<Entry>> {
        Ok(self.entries(page)?.into_iter().next())
    }

    /// A copy of the full history of `page`, if it has one.
    fn history(&self, page: &PageSlug) -> HistoryResult<Option<History>>;

    /// All pages with recorded history, sorted.
    fn pages(&self) -> HistoryResult<Vec<PageSlug>>;
}
