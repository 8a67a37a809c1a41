use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::error::QuizError;
use crate::metrics;
use crate::services::AppState;

pub mod docs;
pub mod pages;
pub mod sessions;
pub mod topics;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let topics = state.vocabulary.list_topics().len();
    let active_sessions = state.sessions.len().await;

    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "wlingo-api",
            "version": env!("CARGO_PKG_VERSION"),
            "topics": topics,
            "active_sessions": active_sessions
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        let message = err.to_string();
        match err {
            QuizError::TopicNotFound(_) | QuizError::SessionNotFound => ApiError::NotFound(message),
            QuizError::SessionCompleted => ApiError::Conflict(message),
            QuizError::InvalidQuestionIndex { .. }
            | QuizError::InvalidOption { .. }
            | QuizError::MissingAnswer
            | QuizError::MissingTopic
            | QuizError::EmptyTopic(_) => ApiError::BadRequest(message),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::BadRequest(message)
            | ApiError::NotFound(message)
            | ApiError::Conflict(message)
            | ApiError::Internal(message) => message,
        };
        if status.is_server_error() {
            tracing::error!("{}", message);
        }
        let json_response = json!({
            "message": message,
            "status": status.as_u16()
        });
        (status, Json(json_response)).into_response()
    }
}
