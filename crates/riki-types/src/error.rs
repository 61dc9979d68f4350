use thiserror::Error;

/// Errors produced while parsing or validating foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid timestamp {input:?}: {reason}")]
    InvalidTimestamp { input: String, reason: String },

    #[error("invalid editor id {input:?}: {reason}")]
    InvalidEditor { input: String, reason: String },

    #[error("invalid page slug {input:?}: {reason}")]
    InvalidPageSlug { input: String, reason: String },
}
