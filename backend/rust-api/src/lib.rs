use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod views;

pub use config::Config;
pub use error::QuizError;
pub use services::AppState;

/// CSP middleware adds Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline' https://unpkg.com; \
             style-src 'self' 'unsafe-inline' https://unpkg.com; \
             img-src 'self' data: https:; \
             connect-src 'self'",
        ),
    );
    response
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The JSON API is meant to be callable from other origins.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        // Browser quiz flow
        .route("/", get(handlers::pages::home))
        .route("/start", post(handlers::pages::start))
        .route(
            "/quiz/{index}",
            get(handlers::pages::question).post(handlers::pages::answer),
        )
        .route("/finish", post(handlers::pages::finish))
        .route("/result", get(handlers::pages::result))
        .route("/reset", post(handlers::pages::reset))
        // JSON API
        .nest("/api", api_routes().layer(cors))
        .route("/openapi.json", get(handlers::docs::openapi_json))
        .route("/docs", get(handlers::docs::swagger_ui))
        // Operations
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(app_state)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/topics", get(handlers::topics::list_topics))
        .route("/topics/{name}", get(handlers::topics::get_topic))
        .route("/sessions", post(handlers::sessions::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        .route(
            "/sessions/{id}/questions/{index}",
            get(handlers::sessions::get_question),
        )
        .route("/sessions/{id}/answers", post(handlers::sessions::submit_answer))
        .route(
            "/sessions/{id}/complete",
            post(handlers::sessions::complete_session),
        )
        .route("/sessions/{id}/result", get(handlers::sessions::get_result))
}
