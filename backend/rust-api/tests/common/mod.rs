#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tower::ServiceExt;
use uuid::Uuid;
use wlingo_api::{config::Config, create_router, services::AppState};

pub const COOKIE_NAME: &str = "quiz_session_id";

/// Router backed by a throwaway vocabulary directory.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub vocab_dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.vocab_dir);
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(|_, _| {})
}

/// Like [`create_test_app`], but `customize` may add vocabulary files to the
/// directory and adjust the config before the state is built.
pub fn create_test_app_with(customize: impl FnOnce(&mut Config, &Path)) -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let vocab_dir = std::env::temp_dir().join(format!("wlingo-test-{}", Uuid::new_v4()));
    fs::create_dir_all(&vocab_dir).unwrap();
    fs::write(
        vocab_dir.join("spanish.csv"),
        "word,translation\nhola,hello\ngracias,thank you\n",
    )
    .unwrap();
    fs::write(
        vocab_dir.join("german_basics.csv"),
        "word,translation,notes\n\
         Hund,dog,\n\
         Katze,cat,\n\
         Baum,tree,\n\
         ,missing word,\n\
         Haus,house,\n\
         Buch,book,\n",
    )
    .unwrap();
    fs::write(vocab_dir.join("empty.csv"), "word,translation\n").unwrap();

    let mut config = Config::default();
    config.quiz.vocab_dir = vocab_dir.clone();
    customize(&mut config, &vocab_dir);

    let state = Arc::new(AppState::new(config));
    TestApp {
        router: create_router(state.clone()),
        state,
        vocab_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn get_with_cookie(&self, uri: &str, session_id: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(uri)
                .header(header::COOKIE, format!("{}={}", COOKIE_NAME, session_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        form: &str,
        session_id: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(session_id) = session_id {
            builder = builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, session_id));
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Value of the session cookie set by `response`, if any.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            let pair = value.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            (name.trim() == COOKIE_NAME).then(|| value.trim().to_string())
        })
}

/// Known answer for a fixture prompt.
pub fn translation_of(prompt: &str) -> &'static str {
    match prompt {
        "hola" => "hello",
        "gracias" => "thank you",
        "Hund" => "dog",
        "Katze" => "cat",
        "Baum" => "tree",
        "Haus" => "house",
        "Buch" => "book",
        "uno" => "one",
        _ => panic!("unknown fixture prompt {}", prompt),
    }
}
