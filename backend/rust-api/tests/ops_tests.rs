use axum::{
    body::Body,
    http::{Request, StatusCode},
};

mod common;

#[tokio::test]
async fn test_health_check() {
    let app = common::create_test_app();

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "wlingo-api");
    assert_eq!(json["topics"], 3);
    assert_eq!(json["active_sessions"], 0);
}

#[tokio::test]
async fn test_metrics_after_traffic() {
    let app = common::create_test_app();
    app.get("/api/topics").await;
    app.get("/api/topics/spanish").await;
    app.get("/no/such/page").await;

    let response = app.get("/metrics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = common::body_text(response).await;
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("vocabulary_topics_loaded"));
    assert!(text.contains("path=\"/api/topics/{name}\""));
    assert!(text.contains("path=\"unmatched\""));
    assert!(!text.contains("path=\"/api/topics/spanish\""));
    assert!(!text.contains("path=\"/no/such/page\""));
}

#[tokio::test]
async fn test_openapi_document_and_docs_page() {
    let app = common::create_test_app();

    let response = app.get("/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = common::body_json(response).await;
    assert_eq!(json["openapi"], "3.0.3");
    assert!(json["paths"]["/api/sessions"]["post"].is_object());
    assert!(json["paths"]["/api/topics/{name}"]["get"].is_object());

    let response = app.get("/docs").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = common::body_text(response).await;
    assert!(html.contains("swagger-ui"));
    assert!(html.contains("/openapi.json"));
}

#[tokio::test]
async fn test_trace_id_is_propagated() {
    let app = common::create_test_app();

    let response = app
        .send(
            Request::builder()
                .uri("/health")
                .header("x-trace-id", "trace-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.headers()["x-trace-id"], "trace-123");

    let response = app.get("/health").await;
    let generated = response.headers()["x-trace-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_api_cors_preflight() {
    let app = common::create_test_app();

    let response = app
        .send(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/topics")
                .header("origin", "http://example.com")
                .header("access-control-request-method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}
