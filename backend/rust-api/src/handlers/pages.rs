use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiError;
use crate::{
    config::Config,
    error::QuizError,
    models::{CreateSessionRequest, SessionStatus, SubmitAnswerRequest},
    services::{quiz_service::QuizService, AppState},
    views,
};

#[derive(Debug, Deserialize)]
pub struct StartForm {
    pub topic: String,
    #[serde(default)]
    pub count: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerForm {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub option: Option<String>,
}

fn session_cookie(config: &Config, session_id: String) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(
            config.quiz.session_timeout_minutes,
        ))
        .build()
}

fn expired_cookie(config: &Config) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

fn session_id(jar: &CookieJar, state: &AppState) -> Option<String> {
    jar.get(&state.config.session.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Blank or unparsable form counts fall back to the configured default.
fn parse_count(raw: Option<&str>) -> Option<usize> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<i64>().ok())
        .map(|value| value.max(0) as usize)
}

fn error_page(err: QuizError) -> Response {
    let status = ApiError::from(err.clone()).status();
    (status, Html(views::error_page(&err.to_string()))).into_response()
}

fn start_over(state: &AppState, jar: CookieJar) -> Response {
    (jar.add(expired_cookie(&state.config)), Redirect::to("/")).into_response()
}

/// GET /
pub async fn home(State(state): State<Arc<AppState>>) -> Html<String> {
    let topics = state.vocabulary.list_topics();
    Html(views::home(
        &topics,
        state.config.quiz.default_question_count,
    ))
}

/// POST /start
pub async fn start(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<StartForm>,
) -> Response {
    if let Some(previous) = session_id(&jar, &state) {
        state.sessions.remove(&previous).await;
    }

    let req = CreateSessionRequest {
        topic: Some(form.topic.trim().to_string()),
        mode: None,
        count: parse_count(form.count.as_deref()),
    };

    match QuizService::new(&state).start(&req).await {
        Ok(session) => {
            let jar = jar.add(session_cookie(&state.config, session.id));
            (jar, Redirect::to("/quiz/0")).into_response()
        }
        Err(err) => {
            tracing::warn!("Failed to start quiz for {:?}: {}", req.topic, err);
            error_page(err)
        }
    }
}

/// GET /quiz/{index}
pub async fn question(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(index): Path<usize>,
) -> Response {
    let Some(session_id) = session_id(&jar, &state) else {
        return Redirect::to("/").into_response();
    };
    let session = match state.sessions.get(&session_id).await {
        Ok(session) => session,
        Err(_) => return start_over(&state, jar),
    };

    if index >= session.total_questions() {
        return Redirect::to("/result").into_response();
    }
    Html(views::question(&session, index)).into_response()
}

/// POST /quiz/{index}
pub async fn answer(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Path(index): Path<usize>,
    Form(form): Form<AnswerForm>,
) -> Response {
    let Some(session_id) = session_id(&jar, &state) else {
        return Redirect::to("/").into_response();
    };

    let option = match form.option.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<usize>() {
            Ok(option) => Some(option),
            Err(_) => {
                let page = views::error_page(&format!("Invalid option: {}", raw));
                return (StatusCode::BAD_REQUEST, Html(page)).into_response();
            }
        },
    };
    let req = SubmitAnswerRequest {
        index,
        answer: form.answer.filter(|answer| !answer.trim().is_empty()),
        option,
    };

    match QuizService::new(&state).submit(&session_id, &req).await {
        Ok(response) => {
            let next = index + 1;
            if response.status == SessionStatus::Completed || next >= response.total_questions {
                Redirect::to("/result").into_response()
            } else {
                Redirect::to(&format!("/quiz/{}", next)).into_response()
            }
        }
        Err(QuizError::SessionNotFound) => start_over(&state, jar),
        Err(QuizError::SessionCompleted) => Redirect::to("/result").into_response(),
        Err(err) => error_page(err),
    }
}

/// POST /finish
pub async fn finish(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(session_id) = session_id(&jar, &state) else {
        return Redirect::to("/").into_response();
    };
    match QuizService::new(&state).complete(&session_id).await {
        Ok(_) => Redirect::to("/result").into_response(),
        Err(_) => start_over(&state, jar),
    }
}

/// GET /result
pub async fn result(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let Some(session_id) = session_id(&jar, &state) else {
        return Redirect::to("/").into_response();
    };
    let session = match state.sessions.get(&session_id).await {
        Ok(session) => session,
        Err(_) => return start_over(&state, jar),
    };

    if !session.is_completed() {
        let index = session.first_unanswered().unwrap_or(0);
        return Redirect::to(&format!("/quiz/{}", index)).into_response();
    }
    Html(views::result(&session, &session.result())).into_response()
}

/// POST /reset
pub async fn reset(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(session_id) = session_id(&jar, &state) {
        if state.sessions.remove(&session_id).await {
            tracing::info!("Session reset: {}", session_id);
        }
    }
    start_over(&state, jar)
}
