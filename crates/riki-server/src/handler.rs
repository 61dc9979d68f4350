use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use riki_history::HistoryStore;
use riki_query::{ChangeView, HistorySummary};
use riki_types::{EditTimestamp, EditorId, PageSlug};
use serde::{Deserialize, Serialize};
use tokio::task;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Body of `POST /v1/pages/:page/edits`.
#[derive(Debug, Deserialize)]
pub struct RecordEditRequest {
    pub content: String,
    pub editor: String,
    /// Explicit edit timestamp (`millis` or `millis.seq`). Chosen by the
    /// server when absent.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Run blocking history work off the async executor.
async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
}

pub async fn pages_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<PageSlug>>> {
    Ok(Json(state.query().store().pages()?))
}

pub async fn history_handler(
    State(state): State<AppState>,
    Path(page): Path<String>,
) -> ServerResult<Json<Vec<HistorySummary>>> {
    let page = PageSlug::parse(&page)?;
    Ok(Json(state.query().history(&page)?))
}

pub async fn changes_handler(
    State(state): State<AppState>,
    Path((page, timestamp)): Path<(String, String)>,
) -> ServerResult<Json<ChangeView>> {
    let page = PageSlug::parse(&page)?;
    let timestamp: EditTimestamp = timestamp.parse()?;
    let view = blocking(move || Ok(state.query().changes_between(&page, timestamp)?)).await?;
    Ok(Json(view))
}

pub async fn record_handler(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Json(request): Json<RecordEditRequest>,
) -> ServerResult<(StatusCode, Json<HistorySummary>)> {
    let page = PageSlug::parse(&page)?;
    let editor = EditorId::new(request.editor)?;
    let timestamp = request
        .timestamp
        .as_deref()
        .map(str::parse::<EditTimestamp>)
        .transpose()?;
    let content = request.content;

    let entry = blocking(move || {
        let entry = state
            .query()
            .record_edit(&page, content, editor, timestamp)?;
        // Committed edits are reported as created even if the snapshot fails.
        if let Err(err) = state.persist(&page) {
            tracing::error!(
                %page,
                timestamp = %entry.timestamp(),
                error = %err,
                "history snapshot failed"
            );
        }
        Ok(entry)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(HistorySummary::from(&entry))))
}
