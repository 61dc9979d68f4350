//! In-memory history store.
//!
//! [`InMemoryHistoryStore`] keeps one [`History`] per page, each behind its
//! own `RwLock`. The outer page map is locked only long enough to find or
//! create a page's handle, so edits to different pages proceed in parallel
//! while edits to the same page are serialized by that page's write lock.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use riki_types::{EditTimestamp, EditorId, PageSlug};
use tracing::{debug, warn};

use crate::entry::Entry;
use crate::error::{HistoryError, HistoryResult};
use crate::history::History;
use crate::traits::HistoryStore;

type PageHandle = Arc<RwLock<History>>;

fn poisoned<T>(err: PoisonError<T>) -> HistoryError {
    HistoryError::LockPoisoned(err.to_string())
}

/// An in-memory implementation of [`HistoryStore`].
///
/// Data is lost when the store is dropped; see [`crate::snapshot`] for
/// writing histories to disk.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    pages: RwLock<HashMap<PageSlug, PageHandle>>,
}

impl InMemoryHistoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing histories, one per page.
    ///
    /// A later history for the same page replaces an earlier one.
    pub fn from_histories(histories: impl IntoIterator<Item = History>) -> Self {
        let pages = histories
            .into_iter()
            .map(|history| (history.page().clone(), Arc::new(RwLock::new(history))))
            .collect();
        Self {
            pages: RwLock::new(pages),
        }
    }

    fn page(&self, page: &PageSlug) -> HistoryResult<Option<PageHandle>> {
        let pages = self.pages.read().map_err(poisoned)?;
        Ok(pages.get(page).cloned())
    }

    fn page_or_create(&self, page: &PageSlug) -> HistoryResult<PageHandle> {
        if let Some(handle) = self.page(page)? {
            return Ok(handle);
        }
        let mut pages = self.pages.write().map_err(poisoned)?;
        let handle = pages
            .entry(page.clone())
            .or_insert_with(|| Arc::new(RwLock::new(History::new(page.clone()))));
        Ok(Arc::clone(handle))
    }

    fn not_found(page: &PageSlug, timestamp: EditTimestamp) -> HistoryError {
        HistoryError::NotFound {
            page: page.clone(),
            timestamp,
        }
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn record(
        &self,
        page: &PageSlug,
        content: String,
        editor: EditorId,
        timestamp: EditTimestamp,
    ) -> HistoryResult<Entry> {
        let handle = self.page_or_create(page)?;
        let mut history = handle.write().map_err(poisoned)?;

        match history.record(content, editor, timestamp) {
            Ok(entry) => {
                debug!(%page, %timestamp, editor = %entry.editor(), "edit recorded");
                Ok(entry)
            }
            Err(err) => {
                warn!(%page, %timestamp, "edit rejected: {err}");
                Err(err)
            }
        }
    }

    fn get(&self, page: &PageSlug, timestamp: EditTimestamp) -> HistoryResult<Entry> {
        let handle = self
            .page(page)?
            .ok_or_else(|| Self::not_found(page, timestamp))?;
        let history = handle.read().map_err(poisoned)?;
        history.get(timestamp).cloned()
    }

    fn predecessor_of(
        &self,
        page: &PageSlug,
        timestamp: EditTimestamp,
    ) -> HistoryResult<Option<Entry>> {
        let handle = self
            .page(page)?
            .ok_or_else(|| Self::not_found(page, timestamp))?;
        let history = handle.read().map_err(poisoned)?;
        Ok(history.predecessor_of(timestamp)?.cloned())
    }

    fn entry_with_predecessor(
        &self,
        page: &PageSlug,
        timestamp: EditTimestamp,
    ) -> HistoryResult<(Entry, Option<Entry>)> {
        let handle = self
            .page(page)?
            .ok_or_else(|| Self::not_found(page, timestamp))?;
        let history = handle.read().map_err(poisoned)?;
        let entry = history.get(timestamp)?.clone();
        let predecessor = history.predecessor_of(timestamp)?.cloned();
        Ok((entry, predecessor))
    }

    fn entries(&self, page: &PageSlug) -> HistoryResult<Vec<Entry>> {
        let Some(handle) = self.page(page)? else {
            return Ok(Vec::new());
        };
        let history = handle.read().map_err(poisoned)?;
        Ok(history.newest_first().cloned().collect())
    }

    fn latest(&self, page: &PageSlug) -> HistoryResult<Option<Entry>> {
        let Some(handle) = self.page(page)? else {
            return Ok(None);
        };
        let history = handle.read().map_err(poisoned)?;
        Ok(history.latest().cloned())
    }

    fn history(&self, page: &PageSlug) -> HistoryResult<Option<History>> {
        let Some(handle) = self.page(page)? else {
            return Ok(None);
        };
        let history = handle.read().map_err(poisoned)?;
        Ok(Some(history.clone()))
    }

    fn pages(&self) -> HistoryResult<Vec<PageSlug>> {
        let pages = self.pages.read().map_err(poisoned)?;
        let mut slugs: Vec<PageSlug> = pages.keys().cloned().collect();
        slugs.sort();
        Ok(slugs)
    }
}
