use axum::{extract::State, Json};
use std::sync::Arc;

use super::ApiError;
use crate::{
    extractors::AppPath,
    models::{TopicDetail, TopicSummary},
    services::AppState,
};

/// GET /api/topics
pub async fn list_topics(State(state): State<Arc<AppState>>) -> Json<Vec<TopicSummary>> {
    Json(state.vocabulary.list_topics())
}

/// GET /api/topics/{name}
pub async fn get_topic(
    State(state): State<Arc<AppState>>,
    AppPath(name): AppPath<String>,
) -> Result<Json<TopicDetail>, ApiError> {
    let topic = state.vocabulary.get_topic(&name)?;
    Ok(Json(TopicDetail::from_topic(topic)))
}
