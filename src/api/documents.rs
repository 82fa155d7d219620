use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{session_or_404, upstream_error};
use crate::document::{extract_text, DocumentKind, ExtractError};
use crate::models::DocumentOverview;
use crate::session::DocumentSession;
use crate::state::AppState;

/// POST /api/documents - Upload a PDF or TXT file and open a session for it
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentOverview>), (StatusCode, String)> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document").to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read upload: {e}")))?;
        upload = Some((file_name, content_type, data));
        break;
    }

    let Some((file_name, content_type, data)) = upload else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart field 'file' is required".to_string(),
        ));
    };

    let kind = DocumentKind::detect(&file_name, content_type.as_deref())
        .ok_or_else(|| extract_error(ExtractError::Unsupported))?;

    // PDF parsing is CPU-bound
    let text = tokio::task::spawn_blocking(move || extract_text(kind, &data))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Extraction task failed: {e}")))?
        .map_err(extract_error)?;

    let session = DocumentSession::open(&state.llm, &state.config.retrieval, &file_name, text)
        .await
        .map_err(upstream_error)?;
    let overview = session.overview();
    state.sessions.insert(session);

    tracing::info!(
        "Opened session {} for {file_name} ({} live)",
        overview.id,
        state.sessions.len()
    );
    Ok((StatusCode::CREATED, Json(overview)))
}

/// GET /api/documents/:id
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentOverview>, (StatusCode, String)> {
    let session = session_or_404(&state, &id)?;
    let overview = session.lock().await.overview();
    Ok(Json(overview))
}

/// DELETE /api/documents/:id - Discard the session and everything derived from it
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !state.sessions.remove(&id) {
        return Err((StatusCode::NOT_FOUND, "Document not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn extract_error(e: ExtractError) -> (StatusCode, String) {
    let status = match e {
        ExtractError::Unsupported => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ExtractError::InvalidUtf8 => StatusCode::BAD_REQUEST,
        ExtractError::Pdf(_) | ExtractError::Empty => StatusCode::UNPROCESSABLE_ENTITY,
    };
    tracing::warn!("Rejected upload: {e}");
    (status, e.to_string())
}
