//! Request spans.

use axum::body::Body;
use axum::http::Request;
use tracing::Span;

use crate::http::server::X_REQUEST_ID;

/// Span for one request, tagged with the id set by the request-id layer.
pub fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
