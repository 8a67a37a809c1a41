use axum::{response::Html, Json};
use serde_json::{json, Map, Value};

use crate::views;

pub struct ApiRoute {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
    pub tag: &'static str,
    pub success: u16,
}

/// JSON endpoints published in `/openapi.json`.
pub const API_ROUTES: &[ApiRoute] = &[
    ApiRoute {
        method: "get",
        path: "/api/topics",
        summary: "List vocabulary topics sorted by display name",
        tag: "topics",
        success: 200,
    },
    ApiRoute {
        method: "get",
        path: "/api/topics/{name}",
        summary: "Get a topic with all of its entries",
        tag: "topics",
        success: 200,
    },
    ApiRoute {
        method: "post",
        path: "/api/sessions",
        summary: "Start a quiz session",
        tag: "sessions",
        success: 201,
    },
    ApiRoute {
        method: "get",
        path: "/api/sessions/{id}",
        summary: "Get a session without its answers",
        tag: "sessions",
        success: 200,
    },
    ApiRoute {
        method: "delete",
        path: "/api/sessions/{id}",
        summary: "Discard a session",
        tag: "sessions",
        success: 204,
    },
    ApiRoute {
        method: "get",
        path: "/api/sessions/{id}/questions/{index}",
        summary: "Get one question and its answer record",
        tag: "sessions",
        success: 200,
    },
    ApiRoute {
        method: "post",
        path: "/api/sessions/{id}/answers",
        summary: "Submit an answer by text or option index",
        tag: "sessions",
        success: 200,
    },
    ApiRoute {
        method: "post",
        path: "/api/sessions/{id}/complete",
        summary: "Finish a session and return its result",
        tag: "sessions",
        success: 200,
    },
    ApiRoute {
        method: "get",
        path: "/api/sessions/{id}/result",
        summary: "Get the current result of a session",
        tag: "sessions",
        success: 200,
    },
    ApiRoute {
        method: "get",
        path: "/health",
        summary: "Liveness check",
        tag: "ops",
        success: 200,
    },
    ApiRoute {
        method: "get",
        path: "/metrics",
        summary: "Prometheus metrics",
        tag: "ops",
        success: 200,
    },
];

fn path_parameters(path: &str) -> Vec<Value> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .map(|name| {
            let schema = if name == "index" {
                json!({ "type": "integer", "minimum": 0 })
            } else {
                json!({ "type": "string" })
            };
            json!({ "name": name, "in": "path", "required": true, "schema": schema })
        })
        .collect()
}

pub fn openapi_document() -> Value {
    let mut paths = Map::new();
    for route in API_ROUTES {
        let mut responses = Map::new();
        responses.insert(
            route.success.to_string(),
            json!({ "description": "Success" }),
        );
        responses.insert("400".into(), json!({ "description": "Invalid request" }));
        responses.insert(
            "404".into(),
            json!({ "description": "Unknown topic or session" }),
        );

        let mut operation = json!({
            "summary": route.summary,
            "tags": [route.tag],
            "responses": responses
        });
        let parameters = path_parameters(route.path);
        if !parameters.is_empty() {
            operation["parameters"] = Value::Array(parameters);
        }
        if route.method == "post" {
            operation["requestBody"] = json!({
                "required": route.path == "/api/sessions/{id}/answers",
                "content": { "application/json": { "schema": { "type": "object" } } }
            });
        }
        if route.path == "/api/sessions/{id}/answers" {
            operation["responses"]["409"] = json!({ "description": "Session already completed" });
        }

        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = entry {
            methods.insert(route.method.to_string(), operation);
        }
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "wlingo API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Vocabulary and arithmetic quizzes"
        },
        "paths": paths
    })
}

/// GET /openapi.json
pub async fn openapi_json() -> Json<Value> {
    Json(openapi_document())
}

/// GET /docs
pub async fn swagger_ui() -> Html<String> {
    Html(views::swagger_ui())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = openapi_document();
        for route in API_ROUTES {
            assert!(
                doc["paths"][route.path][route.method].is_object(),
                "missing {} {}",
                route.method,
                route.path
            );
        }
        assert_eq!(
            doc["paths"]["/api/sessions/{id}"]["delete"]["responses"]["204"]["description"],
            "Success"
        );
    }

    #[test]
    fn test_path_parameters() {
        let params = path_parameters("/api/sessions/{id}/questions/{index}");
        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["name"], "id");
        assert_eq!(params[1]["schema"]["type"], "integer");
        assert!(path_parameters("/api/topics").is_empty());
    }
}
