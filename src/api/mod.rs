pub mod ask;
pub mod documents;
pub mod quiz;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::Router;
use uuid::Uuid;

use crate::state::{AppState, SharedSession};

/// Build the HTTP router over the given state.
pub fn router(state: AppState) -> Router {
    // Multipart framing needs a little room above the file itself
    let body_limit = state.config.max_upload_bytes().saturating_add(64 * 1024);

    Router::new()
        .route("/health", get(health))
        .route("/api/documents", post(documents::upload_document))
        .route(
            "/api/documents/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
        .route("/api/documents/{id}/ask", post(ask::ask))
        .route("/api/documents/{id}/history", delete(ask::clear_history))
        .route(
            "/api/documents/{id}/quiz",
            post(quiz::generate_quiz)
                .get(quiz::get_quiz)
                .delete(quiz::clear_quiz),
        )
        .route("/api/documents/{id}/quiz/{index}/check", post(quiz::check_answer))
        .route("/api/documents/{id}/quiz/evaluate", post(quiz::evaluate))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

/// Look up a live session or answer `404`.
pub(crate) fn session_or_404(
    state: &AppState,
    id: &Uuid,
) -> Result<SharedSession, (StatusCode, String)> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Document not found".to_string()))
}

/// LLM and embedding failures surface as `502`.
pub(crate) fn upstream_error(e: anyhow::Error) -> (StatusCode, String) {
    tracing::error!("Model request failed: {e:#}");
    (StatusCode::BAD_GATEWAY, format!("{e:#}"))
}
