//! Request ID middleware for log correlation.
//!
//! An `x-request-id` set by an upstream proxy is trusted when it is short and
//! printable; otherwise a UUID v4 is generated. The ID is recorded on the
//! request span opened by `TraceLayer`, tagged on the Sentry scope and echoed
//! back in the response headers.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header carrying the request ID.
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest upstream request ID that is passed through unchanged.
const MAX_UPSTREAM_ID_LEN: usize = 128;

fn upstream_request_id(request: &Request) -> Option<HeaderValue> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty() && value.len() <= MAX_UPSTREAM_ID_LEN)
        .filter(|value| value.to_str().is_ok())
        .cloned()
}

/// Middleware that gives every request an ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_request_id(&request).unwrap_or_else(|| {
        // A hyphenated UUID is always a valid header value
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
    });
    let id_str = request_id.to_str().unwrap_or_default().to_owned();

    Span::current().record("request_id", id_str.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &id_str));

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER.clone(), request_id);
    response
}
