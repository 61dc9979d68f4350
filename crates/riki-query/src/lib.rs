//! History queries for Riki.
//!
//! [`HistoryQuery`] is the single entry point the wiki uses to show what an
//! edit changed: it looks up the edit and the one before it, diffs the two
//! page versions, and renders the result as addition/subtraction markup
//! together with who made the edit and when.

pub mod error;
pub mod query;

pub use error::{QueryError, QueryResult};
pub use query::{ChangeView, FirstEditPolicy, HistoryQuery, HistorySummary, QueryConfig};
