use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::Validate;

/// JSON extractor that validates the payload and reports failures as a
/// JSON 400 body instead of axum's plain-text rejection.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let value = match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => value,
            Err(rejection) => {
                let message = format!("Failed to parse JSON request body: {}", rejection);
                tracing::warn!("{}", message);
                return Err(bad_request(message));
            }
        };

        if let Err(errors) = value.validate() {
            let message = format!("Validation error: {}", errors);
            tracing::warn!("{}", message);
            return Err(bad_request(message));
        }

        Ok(AppJson(value))
    }
}

/// Path extractor whose rejections use the same JSON 400 body as [`AppJson`].
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(AppPath(value)),
            Err(rejection) => {
                let message = format!("Invalid path parameter: {}", rejection.body_text());
                tracing::warn!("{}", message);
                Err(bad_request(message))
            }
        }
    }
}

fn bad_request(message: String) -> Response {
    let error_response = json!({
        "message": message,
        "status": 400
    });
    (StatusCode::BAD_REQUEST, Json(error_response)).into_response()
}
