use crate::error::HttpAppError;
use axum::http::{header, StatusCode};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use scanvault_core::AppError;

/// Re-render the plain-text 413 that the request body limit sends for an oversized
/// `Content-Length` as the usual JSON error body.
///
/// The state is the configured file size cap, reported back to the client.
pub async fn payload_too_large_middleware(
    State(max_file_size_bytes): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json(&response) {
        return response;
    }

    HttpAppError(AppError::PayloadTooLarge(format!(
        "File too large (max {} bytes)",
        max_file_size_bytes
    )))
    .into_response()
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::post, Router};
    use tower::ServiceExt;

    fn app(handler_status: StatusCode) -> Router {
        Router::new()
            .route("/", post(move || async move { (handler_status, "length limit exceeded") }))
            .layer(axum::middleware::from_fn_with_state(
                16usize,
                payload_too_large_middleware,
            ))
    }

    #[tokio::test]
    async fn plain_413_becomes_json() {
        let response = app(StatusCode::PAYLOAD_TOO_LARGE)
            .oneshot(axum::http::Request::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(is_json(&response));
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        let response = app(StatusCode::OK)
            .oneshot(axum::http::Request::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!is_json(&response));
    }
}
