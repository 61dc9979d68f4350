use std::sync::Arc;

use riki_diff::{ChangeRenderer, DiffConfig, DiffEngine, RenderedChange, SpanStyle};
use riki_history::{Entry, HistoryError, HistoryStore};
use riki_types::{EditTimestamp, EditorId, PageSlug};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{QueryError, QueryResult};

/// Attempts made by [`HistoryQuery::record_edit`] when it picks the timestamp.
const AUTO_TIMESTAMP_ATTEMPTS: usize = 3;

/// What the first recorded edit of a page is compared against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstEditPolicy {
    /// Diff the entry against itself: nothing is highlighted.
    #[default]
    CompareWithSelf,
    /// Diff against an empty page: the whole content is one addition.
    WholeContentAdded,
}

/// Settings for a [`HistoryQuery`].
#[derive(Clone, Debug, Default)]
pub struct QueryConfig {
    pub first_edit: FirstEditPolicy,
    pub diff: DiffConfig,
    pub style: SpanStyle,
}

/// What one edit changed, ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeView {
    pub page: PageSlug,
    pub timestamp: EditTimestamp,
    pub editor: EditorId,
    /// Timestamp of the edit this one was compared against.
    pub previous: Option<EditTimestamp>,
    #[serde(flatten)]
    pub rendered: RenderedChange,
}

/// One line of a page's history listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub timestamp: EditTimestamp,
    pub editor: EditorId,
    /// RFC 3339 wall-clock time of the edit.
    pub edited_at: Option<String>,
    /// Page length in characters after the edit.
    pub content_len: usize,
}

impl From<&Entry> for HistorySummary {
    fn from(entry: &Entry) -> Self {
        Self {
            timestamp: entry.timestamp(),
            editor: entry.editor().clone(),
            edited_at: entry.timestamp().to_datetime().map(|dt| dt.to_rfc3339()),
            content_len: entry.content_len(),
        }
    }
}

/// Resolves edits in a [`HistoryStore`] and renders what they changed.
pub struct HistoryQuery<S: HistoryStore + ?Sized> {
    store: Arc<S>,
    engine: DiffEngine,
    renderer: ChangeRenderer,
    first_edit: FirstEditPolicy,
}

impl<S: HistoryStore + ?Sized> HistoryQuery<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, QueryConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: QueryConfig) -> Self {
        Self {
            store,
            engine: DiffEngine::new(config.diff),
            renderer: ChangeRenderer::new(config.style),
            first_edit: config.first_edit,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Render the change made by the edit of `page` at `timestamp`.
    ///
    /// The edit is compared with the one immediately before it. The first
    /// edit of a page has no predecessor and is handled per
    /// [`FirstEditPolicy`]. Fails with `NotFound` if there is no edit at
    /// `timestamp`.
    pub fn changes_between(
        &self,
        page: &PageSlug,
        timestamp: EditTimestamp,
    ) -> QueryResult<ChangeView> {
        let (entry, predecessor) = self.store.entry_with_predecessor(page, timestamp)?;

        let baseline = match (&predecessor, self.first_edit) {
            (Some(previous), _) => previous.content(),
            (None, FirstEditPolicy::CompareWithSelf) => entry.content(),
            (None, FirstEditPolicy::WholeContentAdded) => "",
        };
        let script = self.engine.diff(baseline, entry.content());
        let rendered = self.renderer.render(&script);

        debug!(
            %page,
            %timestamp,
            inserted = script.inserted(),
            deleted = script.deleted(),
            "change rendered"
        );

        Ok(ChangeView {
            page: page.clone(),
            timestamp,
            editor: entry.editor().clone(),
            previous: predecessor.map(|p| p.timestamp()),
            rendered,
        })
    }

    /// The history listing of `page`, newest first.
    ///
    /// Fails with `PageNotFound` if the page has never been edited.
    pub fn history(&self, page: &PageSlug) -> QueryResult<Vec<HistorySummary>> {
        let entries = self.store.entries(page)?;
        if entries.is_empty() {
            return Err(QueryError::PageNotFound { page: page.clone() });
        }
        Ok(entries.iter().map(HistorySummary::from).collect())
    }

    /// Record an edit of `page`.
    ///
    /// With an explicit `timestamp` a collision fails with
    /// `DuplicateTimestamp`. Without one, a timestamp after the page's latest
    /// edit is chosen, and a collision with a concurrent writer is retried
    /// with a fresh timestamp. If the latest edit sits at
    /// [`EditTimestamp::MAX`] this fails with `TimestampExhausted`.
    pub fn record_edit(
        &self,
        page: &PageSlug,
        content: String,
        editor: EditorId,
        timestamp: Option<EditTimestamp>,
    ) -> QueryResult<Entry> {
        if let Some(timestamp) = timestamp {
            return Ok(self.store.record(page, content, editor, timestamp)?);
        }

        let mut attempt = 1;
        loop {
            let latest = self.store.latest(page)?.map(|e| e.timestamp());
            let Some(timestamp) = EditTimestamp::next_after(latest.as_ref()) else {
                return Err(QueryError::TimestampExhausted {
                    page: page.clone(),
                    latest: latest.unwrap_or(EditTimestamp::MAX),
                });
            };
            match self
                .store
                .record(page, content.clone(), editor.clone(), timestamp)
            {
                Err(HistoryError::DuplicateTimestamp { .. })
                    if attempt < AUTO_TIMESTAMP_ATTEMPTS =>
                {
                    warn!(%page, %timestamp, attempt, "timestamp collision; retrying");
                    attempt += 1;
                }
                result => return Ok(result?),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riki_history::InMemoryHistoryStore;

    fn page(name: &str) -> PageSlug {
        PageSlug::parse(name).unwrap()
    }

    fn editor(name: &str) -> EditorId {
        EditorId::new(name).unwrap()
    }

    fn ts(millis: u64) -> EditTimestamp {
        EditTimestamp::new(millis, 0)
    }

    fn seeded() -> HistoryQuery<InMemoryHistoryStore> {
        let store = Arc::new(InMemoryHistoryStore::new());
        let home = page("home");
        store
            .record(&home, "hello world".into(), editor("alice"), ts(1))
            .unwrap();
        store
            .record(&home, "hello brave world".into(), editor("bob"), ts(2))
            .unwrap();
        HistoryQuery::new(store)
    }

    #[test]
    fn end_to_end_addition() {
        let query = seeded();
        let view = query.changes_between(&page("home"), ts(2)).unwrap();

        assert_eq!(view.editor.as_str(), "bob");
        assert_eq!(view.timestamp, ts(2));
        assert_eq!(view.previous, Some(ts(1)));
        assert_eq!(
            view.rendered.markup,
            r#"hello <span class="addition">brave </span>world"#
        );
        assert_eq!(view.rendered.additions, 1);
        assert_eq!(view.rendered.subtractions, 0);
    }

    #[test]
    fn first_edit_compares_with_itself() {
        let query = seeded();
        let view = query.changes_between(&page("home"), ts(1)).unwrap();
        assert_eq!(view.editor.as_str(), "alice");
        assert_eq!(view.previous, None);
        assert_eq!(view.rendered.markup, "hello world");
        assert!(view.rendered.is_unchanged());
    }

    #[test]
    fn first_edit_whole_content_policy() {
        let store = Arc::clone(seeded().store());
        let query = HistoryQuery::with_config(
            store,
            QueryConfig {
                first_edit: FirstEditPolicy::WholeContentAdded,
                style: SpanStyle::plain(),
                ..Default::default()
            },
        );
        let view = query.changes_between(&page("home"), ts(1)).unwrap();
        assert_eq!(view.rendered.markup, "{+hello world+}");
    }

    #[test]
    fn subtraction_rendered() {
        let query = seeded();
        let home = page("home");
        query
            .record_edit(&home, "hello world".into(), editor("carol"), Some(ts(3)))
            .unwrap();
        let view = query.changes_between(&home, ts(3)).unwrap();
        assert_eq!(
            view.rendered.markup,
            r#"hello <span class="subtraction">brave </span>world"#
        );
        assert_eq!(view.editor.as_str(), "carol");
    }

    #[test]
    fn unknown_timestamp_propagates_not_found() {
        let query = seeded();
        let err = query.changes_between(&page("home"), ts(99)).unwrap_err();
        assert!(err.is_not_found());
        let err = query.changes_between(&page("missing"), ts(1)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn explicit_duplicate_timestamp_is_an_error() {
        let query = seeded();
        let err = query
            .record_edit(&page("home"), "x".into(), editor("eve"), Some(ts(2)))
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::History(HistoryError::DuplicateTimestamp { .. })
        ));
        assert!(!err.is_not_found());
    }

    #[test]
    fn auto_timestamps_are_strictly_increasing() {
        let query = HistoryQuery::new(Arc::new(InMemoryHistoryStore::new()));
        let home = page("home");
        let mut previous: Option<EditTimestamp> = None;
        for n in 0..20 {
            let entry = query
                .record_edit(&home, format!("v{n}"), editor("x"), None)
                .unwrap();
            if let Some(prev) = previous {
                assert!(entry.timestamp() > prev);
            }
            previous = Some(entry.timestamp());
        }
        assert_eq!(query.history(&home).unwrap().len(), 20);
    }

    #[test]
    fn history_listing_newest_first() {
        let query = seeded();
        let listing = query.history(&page("home")).unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].timestamp, ts(2));
        assert_eq!(listing[0].editor.as_str(), "bob");
        assert_eq!(listing[0].content_len, "hello brave world".len());
        assert_eq!(listing[1].timestamp, ts(1));
        assert_eq!(
            listing[1].edited_at.as_deref(),
            Some("1970-01-01T00:00:00.001+00:00")
        );
    }

    #[test]
    fn works_with_trait_objects() {
        let store: Arc<dyn HistoryStore> = Arc::new(InMemoryHistoryStore::new());
        let query = HistoryQuery::new(store);
        query
            .record_edit(&page("home"), "hi".into(), editor("x"), Some(ts(1)))
            .unwrap();
        assert_eq!(query.history(&page("home")).unwrap().len(), 1);
    }

    #[test]
    fn history_of_unknown_page_is_not_found() {
        let query = seeded();
        let err = query.history(&page("missing")).unwrap_err();
        assert!(matches!(
            err,
            QueryError::PageNotFound { page: ref missing } if missing.as_str() == "missing"
        ));
        assert!(err.is_not_found());
    }

    #[test]
    fn auto_timestamp_after_max_is_exhausted() {
        let query = seeded();
        let home = page("home");
        query
            .record_edit(&home, "last".into(), editor("eve"), Some(EditTimestamp::MAX))
            .unwrap();

        let err = query
            .record_edit(&home, "after".into(), editor("eve"), None)
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::TimestampExhausted { latest, .. } if latest == EditTimestamp::MAX
        ));
        assert_eq!(query.history(&home).unwrap().len(), 3);
    }

    #[test]
    fn change_view_json_shape() {
        let query = seeded();
        let view = query.changes_between(&page("home"), ts(2)).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["editor"], "bob");
        assert_eq!(json["timestamp"], "2.0");
        assert_eq!(json["previous"], "1.0");
        assert_eq!(json["additions"], 1);
        assert!(json["markup"].as_str().unwrap().contains("brave"));
    }
}
