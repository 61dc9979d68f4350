//! Foundation types for Riki page history.
//!
//! Every other Riki crate depends on `riki-types`. The types here are small,
//! validated at construction, and serialize as plain strings so they can be
//! used directly in URLs, JSON bodies, and snapshot files.
//!
//! # Key Types
//!
//! - [`EditTimestamp`] -- Totally ordered edit time (wall-clock millis + sequence)
//! - [`EditorId`] -- Identity of the user who made an edit
//! - [`PageSlug`] -- Normalized page address (e.g. `docs/getting_started`)

pub mod editor;
pub mod error;
pub mod page;
pub mod timestamp;

pub use editor::EditorId;
pub use error::TypeError;
pub use page::PageSlug;
pub use timestamp::EditTimestamp;
