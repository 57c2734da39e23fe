//! # Request Logging Middleware
//!
//! Assigns every request an id, runs it inside a span carrying that id and
//! logs one line per request once the response is ready. The id is taken
//! from an incoming `x-request-id` header when it is well formed and echoed
//! back on the response.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use logging::{log_api_request, RequestId, REQUEST_ID_HEADER};
use tracing::Instrument;

/// Log method, path, status and latency of every request.
pub async fn request_logger_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_header_or_new(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
    );
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!("request", request_id = %request_id, method = %method, path = %path);
    let started = Instant::now();
    let mut response = next.run(request).instrument(span).await;
    let duration_ms = started.elapsed().as_millis();

    log_api_request!(request_id, method, path, response.status().as_u16(), duration_ms);

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use tower::ServiceExt as _;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route(
                "/echo",
                get(|Extension(id): Extension<RequestId>| async move { id.into_string() }),
            )
            .layer(middleware::from_fn(request_logger_middleware))
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let response = app()
            .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let header = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
        assert!(logging::request_id::try_from_header(header).is_some());
    }

    #[tokio::test]
    async fn test_propagates_incoming_request_id() {
        let incoming = "client-supplied-id-0001";
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, incoming)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], incoming);
    }

    #[tokio::test]
    async fn test_replaces_malformed_request_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/echo")
                    .header(REQUEST_ID_HEADER, "bad id!")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(response.headers()[REQUEST_ID_HEADER], "bad id!");
    }
}
