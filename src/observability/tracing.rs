//! Per-request spans.

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::request_id;

/// Span wrapping one request/response cycle.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}
