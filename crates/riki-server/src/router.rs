use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::state::AppState;

/// Build the axum router with all endpoints.
///
/// Page names containing `/` must be percent-encoded in the path
/// (`docs%2Fintro`).
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/pages", get(handler::pages_handler))
        .route("/v1/pages/:page/history", get(handler::history_handler))
        .route(
            "/v1/pages/:page/history/:timestamp",
            get(handler::changes_handler),
        )
        .route("/v1/pages/:page/edits", post(handler::record_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
