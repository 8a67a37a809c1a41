use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_list_topics_sorted_by_display_name() {
    let app = common::create_test_app();

    let response = app.get("/api/topics").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    let topics = json.as_array().unwrap();
    let names: Vec<&str> = topics
        .iter()
        .map(|topic| topic["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Empty", "German Basics", "Spanish"]);

    assert_eq!(topics[1]["id"], "german_basics");
    // The row with a blank word is skipped.
    assert_eq!(topics[1]["count"], 5);
    assert_eq!(topics[2]["count"], 2);
}

#[tokio::test]
async fn test_get_topic_returns_entries() {
    let app = common::create_test_app();

    let response = app.get("/api/topics/spanish").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = common::body_json(response).await;
    assert_eq!(json["id"], "spanish");
    assert_eq!(json["name"], "Spanish");
    assert_eq!(json["count"], 2);
    assert_eq!(json["entries"][0]["word"], "hola");
    assert_eq!(json["entries"][1]["translation"], "thank you");
}

#[tokio::test]
async fn test_get_unknown_topic_returns_404() {
    let app = common::create_test_app();

    let response = app.get("/api/topics/Klingon").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = common::body_json(response).await;
    assert_eq!(json["status"], 404);
    assert!(json["message"].as_str().unwrap().contains("Klingon"));
}

#[tokio::test]
async fn test_missing_vocabulary_directory_is_created() {
    let dir = std::env::temp_dir().join(format!("wlingo-missing-{}", uuid::Uuid::new_v4()));
    let mut config = wlingo_api::Config::default();
    config.quiz.vocab_dir = dir.clone();

    let state = wlingo_api::AppState::new(config);
    assert!(state.vocabulary.is_empty());
    assert!(dir.is_dir());

    let _ = std::fs::remove_dir_all(dir);
}
