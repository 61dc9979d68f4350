use std::collections::BTreeMap;

use riki_types::{EditTimestamp, EditorId, PageSlug};

use crate::entry::Entry;
use crate::error::{HistoryError, HistoryResult};

/// The ordered edit history of a single page.
///
/// Entries live in a map keyed by timestamp. The map's key order is the
/// chronological order, so the "newest first" view and the entry lookup can
/// never disagree, and finding the entry just before a timestamp is a range
/// query rather than a scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct History {
    page: PageSlug,
    entries: BTreeMap<EditTimestamp, Entry>,
}

impl History {
    /// Create an empty history for `page`.
    pub fn new(page: PageSlug) -> Self {
        Self {
            page,
            entries: BTreeMap::new(),
        }
    }

    /// Rebuild a history from previously recorded entries, in any order.
    ///
    /// Fails with [`HistoryError::DuplicateTimestamp`] if two entries share a
    /// timestamp.
    pub fn from_entries(
        page: PageSlug,
        entries: impl IntoIterator<Item = Entry>,
    ) -> HistoryResult<Self> {
        let mut history = Self::new(page);
        for entry in entries {
            history.insert(entry)?;
        }
        Ok(history)
    }

    pub fn page(&self) -> &PageSlug {
        &self.page
    }

    /// Record a new edit at `timestamp`.
    ///
    /// Existing entries are never overwritten: a second edit at the same
    /// timestamp fails with [`HistoryError::DuplicateTimestamp`].
    pub fn record(
        &mut self,
        content: impl Into<String>,
        editor: EditorId,
        timestamp: EditTimestamp,
    ) -> HistoryResult<Entry> {
        let entry = Entry::new(timestamp, content, editor);
        self.insert(entry.clone())?;
        Ok(entry)
    }

    fn insert(&mut self, entry: Entry) -> HistoryResult<()> {
        let timestamp = entry.timestamp();
        if self.entries.contains_key(&timestamp) {
            return Err(HistoryError::DuplicateTimestamp {
                page: self.page.clone(),
                timestamp,
            });
        }
        self.entries.insert(timestamp, entry);
        Ok(())
    }

    /// Look up the entry recorded at `timestamp`.
    pub fn get(&self, timestamp: EditTimestamp) -> HistoryResult<&Entry> {
        self.entries
            .get(&timestamp)
            .ok_or_else(|| self.not_found(timestamp))
    }

    /// The entry immediately older than the one at `timestamp`.
    ///
    /// Returns `Ok(None)` when `timestamp` is the oldest entry, and
    /// [`HistoryError::NotFound`] when there is no entry at `timestamp`.
    pub fn predecessor_of(&self, timestamp: EditTimestamp) -> HistoryResult<Option<&Entry>> {
        if !self.entries.contains_key(&timestamp) {
            return Err(self.not_found(timestamp));
        }
        Ok(self
            .entries
            .range(..timestamp)
            .next_back()
            .map(|(_, entry)| entry))
    }

    pub fn contains(&self, timestamp: EditTimestamp) -> bool {
        self.entries.contains_key(&timestamp)
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&Entry> {
        self.entries.values().next_back()
    }

    /// The first recorded entry.
    pub fn oldest(&self) -> Option<&Entry> {
        self.entries.values().next()
    }

    /// Entries in reverse-chronological order.
    pub fn newest_first(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values().rev()
    }

    /// Entries in chronological order.
    pub fn oldest_first(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn not_found(&self, timestamp: EditTimestamp) -> HistoryError {
        HistoryError::NotFound {
            page: self.page.clone(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page() -> PageSlug {
        PageSlug::parse("home").unwrap()
    }

    fn editor(name: &str) -> EditorId {
        EditorId::new(name).unwrap()
    }

    fn ts(millis: u64) -> EditTimestamp {
        EditTimestamp::new(millis, 0)
    }

    #[test]
    fn empty_history() {
        let history = History::new(page());
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert!(matches!(
            history.get(ts(1)),
            Err(HistoryError::NotFound { .. })
        ));
    }

    #[test]
    fn record_and_get() {
        let mut history = History::new(page());
        let entry = history.record("hello", editor("alice"), ts(10)).unwrap();
        assert_eq!(entry.content(), "hello");
        assert_eq!(history.get(ts(10)).unwrap(), &entry);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn predecessor_chain_with_out_of_order_inserts() {
        let mut history = History::new(page());
        history.record("three", editor("c"), ts(30)).unwrap();
        history.record("one", editor("a"), ts(10)).unwrap();
        history.record("two", editor("b"), ts(20)).unwrap();

        assert_eq!(history.predecessor_of(ts(30)).unwrap().unwrap().content(), "two");
        assert_eq!(history.predecessor_of(ts(20)).unwrap().unwrap().content(), "one");
        assert!(history.predecessor_of(ts(10)).unwrap().is_none());
    }

    #[test]
    fn predecessor_of_unknown_timestamp_is_not_found() {
        let mut history = History::new(page());
        history.record("one", editor("a"), ts(10)).unwrap();
        let err = history.predecessor_of(ts(15)).unwrap_err();
        assert!(matches!(err, HistoryError::NotFound { timestamp, .. } if timestamp == ts(15)));
    }

    #[test]
    fn duplicate_timestamp_rejected_and_original_kept() {
        let mut history = History::new(page());
        history.record("first", editor("alice"), ts(10)).unwrap();
        let err = history.record("second", editor("bob"), ts(10)).unwrap_err();
        assert!(matches!(err, HistoryError::DuplicateTimestamp { .. }));

        let kept = history.get(ts(10)).unwrap();
        assert_eq!(kept.content(), "first");
        assert_eq!(kept.editor().as_str(), "alice");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn sequence_distinguishes_same_millisecond() {
        let mut history = History::new(page());
        history
            .record("a", editor("x"), EditTimestamp::new(5, 0))
            .unwrap();
        history
            .record("b", editor("x"), EditTimestamp::new(5, 1))
            .unwrap();
        assert_eq!(history.latest().unwrap().content(), "b");
        assert_eq!(history.oldest().unwrap().content(), "a");
    }

    #[test]
    fn newest_first_ordering() {
        let mut history = History::new(page());
        for millis in [20, 40, 10, 30] {
            history
                .record(format!("v{millis}"), editor("x"), ts(millis))
                .unwrap();
        }
        let order: Vec<u64> = history.newest_first().map(|e| e.timestamp().millis).collect();
        assert_eq!(order, vec![40, 30, 20, 10]);
        let order: Vec<u64> = history.oldest_first().map(|e| e.timestamp().millis).collect();
        assert_eq!(order, vec![10, 20, 30, 40]);
    }

    #[test]
    fn from_entries_rejects_duplicates() {
        let entries = vec![
            Entry::new(ts(1), "a", editor("x")),
            Entry::new(ts(1), "b", editor("y")),
        ];
        assert!(matches!(
            History::from_entries(page(), entries),
            Err(HistoryError::DuplicateTimestamp { .. })
        ));
    }

    proptest! {
        #[test]
        fn predecessor_is_next_older(stamps in proptest::collection::btree_set(0u64..1_000, 1..20)
            .prop_map(|s| s.into_iter().collect::<Vec<_>>())
            .prop_shuffle())
        {
            let mut history = History::new(page());
            for &millis in &stamps {
                history.record(format!("v{millis}"), editor("x"), ts(millis)).unwrap();
            }
            let mut stamps = stamps;
            stamps.sort_unstable();
            prop_assert!(history.predecessor_of(ts(stamps[0])).unwrap().is_none());
            for pair in stamps.windows(2) {
                let pred = history.predecessor_of(ts(pair[1])).unwrap().unwrap();
                prop_assert_eq!(pred.timestamp(), ts(pair[0]));
            }
        }
    }
}
