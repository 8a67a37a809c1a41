use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use super::ApiError;
use crate::{
    error::QuizError,
    extractors::{AppJson, AppPath},
    models::{CreateSessionRequest, QuestionDetail, QuizResult, SessionView, SubmitAnswerRequest},
    services::{quiz_service::QuizService, AppState},
};

/// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(
        "Creating session: topic={:?}, mode={:?}, count={:?}",
        req.topic,
        req.mode,
        req.count
    );

    let session = QuizService::new(&state).start(&req).await?;
    Ok((StatusCode::CREATED, Json(session.view())))
}

/// GET /api/sessions/{id}
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    AppPath(session_id): AppPath<String>,
) -> Result<Json<SessionView>, ApiError> {
    let session = state.sessions.get(&session_id).await?;
    Ok(Json(session.view()))
}

/// GET /api/sessions/{id}/questions/{index}
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    AppPath((session_id, index)): AppPath<(String, usize)>,
) -> Result<Json<QuestionDetail>, ApiError> {
    let session = state.sessions.get(&session_id).await?;
    let detail = session.question_detail(index).map_err(|err| match err {
        QuizError::InvalidQuestionIndex { .. } => ApiError::not_found(err.to_string()),
        other => other.into(),
    })?;
    Ok(Json(detail))
}

/// POST /api/sessions/{id}/answers
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    AppPath(session_id): AppPath<String>,
    AppJson(req): AppJson<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = QuizService::new(&state)
        .submit(&session_id, &req)
        .await
        .inspect_err(|e| tracing::warn!("Rejected answer for session {}: {}", session_id, e))?;
    Ok(Json(response))
}

/// POST /api/sessions/{id}/complete
pub async fn complete_session(
    State(state): State<Arc<AppState>>,
    AppPath(session_id): AppPath<String>,
) -> Result<Json<QuizResult>, ApiError> {
    tracing::info!("Completing session: {}", session_id);
    let result = QuizService::new(&state).complete(&session_id).await?;
    Ok(Json(result))
}

/// GET /api/sessions/{id}/result
pub async fn get_result(
    State(state): State<Arc<AppState>>,
    AppPath(session_id): AppPath<String>,
) -> Result<Json<QuizResult>, ApiError> {
    let result = QuizService::new(&state).result(&session_id).await?;
    Ok(Json(result))
}

/// DELETE /api/sessions/{id}
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    AppPath(session_id): AppPath<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(QuizError::SessionNotFound.into())
    }
}
