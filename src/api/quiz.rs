use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{session_or_404, upstream_error};
use crate::models::{
    CheckAnswerRequest, EvaluateRequest, EvaluateResponse, QuizAttempt, QuizResponse,
};
use crate::state::AppState;

/// POST /api/documents/:id/quiz - Generate a new quiz (always succeeds, possibly with fallback questions)
pub async fn generate_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizResponse>, (StatusCode, String)> {
    let session = session_or_404(&state, &id)?;
    let response = session.lock().await.generate_quiz(&state.llm).await;
    Ok(Json(response))
}

/// GET /api/documents/:id/quiz
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuizResponse>, (StatusCode, String)> {
    let session = session_or_404(&state, &id)?;
    let response = session.lock().await.quiz_response();
    response
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "No quiz has been generated".to_string()))
}

/// DELETE /api/documents/:id/quiz - Clear the quiz and its generation counter
pub async fn clear_quiz(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let session = session_or_404(&state, &id)?;
    session.lock().await.clear_quiz();
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/documents/:id/quiz/:index/check
pub async fn check_answer(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<CheckAnswerRequest>,
) -> Result<Json<QuizAttempt>, (StatusCode, String)> {
    let session = session_or_404(&state, &id)?;
    let attempt = session.lock().await.check_answer(index, &req.selected);
    attempt
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Quiz question {index} not found")))
}

/// POST /api/documents/:id/quiz/evaluate - Judge a free-form answer against the document
pub async fn evaluate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, (StatusCode, String)> {
    if req.question.trim().is_empty() || req.response.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Both question and response are required".to_string(),
        ));
    }

    let session = session_or_404(&state, &id)?;
    let session = session.lock().await;
    let evaluation = session
        .evaluate(&state.llm, &req.question, &req.response)
        .await
        .map_err(upstream_error)?;
    Ok(Json(EvaluateResponse { evaluation }))
}
