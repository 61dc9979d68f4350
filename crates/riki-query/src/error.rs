use riki_types::{EditTimestamp, PageSlug};
use thiserror::Error;

/// Errors returned by [`crate::HistoryQuery`].
#[derive(Debug, Error)]
pub enum QueryError {
    /// A history lookup or write failed; passed through unchanged.
    #[error(transparent)]
    History(#[from] riki_history::HistoryError),

    /// The page has never been edited.
    #[error("page {page} has no history")]
    PageNotFound { page: PageSlug },

    /// The page's latest edit is at the largest timestamp, so no later one
    /// can be chosen.
    #[error("no timestamp after {latest} is available for {page}")]
    TimestampExhausted {
        page: PageSlug,
        latest: EditTimestamp,
    },
}

impl QueryError {
    /// Returns `true` if the requested page or edit does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::History(riki_history::HistoryError::NotFound { .. }) | Self::PageNotFound { .. }
        )
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
