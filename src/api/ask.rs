use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{session_or_404, upstream_error};
use crate::models::{AskRequest, AskResponse};
use crate::state::AppState;

const MAX_QUESTION_CHARS: usize = 2000;

/// POST /api/documents/:id/ask - Answer a question from the document's passages
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut req): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    req.question = validate_question(&req.question)?;

    let session = session_or_404(&state, &id)?;
    let mut session = session.lock().await;
    let response = session.ask(&state.llm, &req).await.map_err(upstream_error)?;
    Ok(Json(response))
}

/// Trimmed question text; empty or overlong questions are rejected.
fn validate_question(raw: &str) -> Result<String, (StatusCode, String)> {
    let question = raw.trim();
    if question.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Question is required".to_string()));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Question is too long (max {MAX_QUESTION_CHARS} characters)"),
        ));
    }
    Ok(question.to_string())
}

/// DELETE /api/documents/:id/history - Forget previous turns
pub async fn clear_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let session = session_or_404(&state, &id)?;
    session.lock().await.clear_history();
    Ok(StatusCode::NO_CONTENT)
}
