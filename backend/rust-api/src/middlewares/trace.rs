use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{field, Instrument};
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

const MAX_TRACE_ID_LEN: usize = 128;

/// Accepts a caller's trace id only if it is short, printable ASCII.
fn incoming_trace_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(TRACE_ID_HEADER)?.to_str().ok()?.trim();
    let acceptable = !raw.is_empty()
        && raw.len() <= MAX_TRACE_ID_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| raw.to_string())
}

/// Runs the request inside a `request` span keyed by trace id and echoes the
/// id back in `x-trace-id`.
pub async fn trace_context_middleware(request: Request, next: Next) -> Response {
    let trace_id =
        incoming_trace_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = tracing::info_span!(
        "request",
        trace_id = %trace_id,
        method = %request.method(),
        path = %request.uri().path(),
        status = field::Empty,
        latency_ms = field::Empty,
    );

    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;

    span.record("status", response.status().as_u16());
    span.record("latency_ms", started.elapsed().as_millis() as u64);
    span.in_scope(|| tracing::debug!("request finished"));

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(TRACE_ID_HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_incoming_trace_id() {
        assert_eq!(
            incoming_trace_id(&headers(" abc-123 ")).as_deref(),
            Some("abc-123")
        );
        assert_eq!(incoming_trace_id(&HeaderMap::new()), None);
        assert_eq!(incoming_trace_id(&headers("")), None);
        assert_eq!(incoming_trace_id(&headers("has space")), None);
        assert_eq!(incoming_trace_id(&headers(&"x".repeat(200))), None);
    }
}
