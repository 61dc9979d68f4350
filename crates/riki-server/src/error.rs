use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use riki_history::HistoryError;
use riki_query::QueryError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("invalid request: {0}")]
    InvalidInput(#[from] riki_types::TypeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    fn classify(&self) -> (StatusCode, &'static str) {
        let history = match self {
            Self::Query(QueryError::History(err)) | Self::History(err) => Some(err),
            _ => None,
        };
        match (self, history) {
            (_, Some(HistoryError::NotFound { .. }))
            | (Self::Query(QueryError::PageNotFound { .. }), _) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            (_, Some(HistoryError::DuplicateTimestamp { .. })) => {
                (StatusCode::CONFLICT, "DUPLICATE_TIMESTAMP")
            }
            (Self::Query(QueryError::TimestampExhausted { .. }), _) => {
                (StatusCode::CONFLICT, "TIMESTAMP_EXHAUSTED")
            }
            (Self::InvalidInput(_), _) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.classify();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
