//! Cross-origin response headers.
//!
//! # Responsibilities
//! - Stamp the fixed CORS headers on every response
//! - Answer preflight `OPTIONS` requests the router has no handler for
//!
//! # Design Decisions
//! - Headers are origin-independent and override anything set downstream
//! - The header layer sits outside the body and error stages so failures
//!   carry the headers too
//! - Preflight turns the router's 405 into 200, keeping its `Allow` header

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "OPTIONS, GET, POST, PUT, DELETE";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

pub type SetHeader = SetResponseHeaderLayer<HeaderValue>;

/// The three header layers, composed.
pub type CorsLayer = ServiceBuilder<Stack<SetHeader, Stack<SetHeader, Stack<SetHeader, Identity>>>>;

fn set(name: HeaderName, value: &'static str) -> SetHeader {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

pub fn layer() -> CorsLayer {
    ServiceBuilder::new()
        .layer(set(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .layer(set(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS))
        .layer(set(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
}

/// Preflight stage.
pub async fn preflight(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let response = next.run(request).await;

    if !is_options || response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let body = allow
        .as_ref()
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut reply = (StatusCode::OK, Body::from(body)).into_response();
    if let Some(allow) = allow {
        reply.headers_mut().insert(header::ALLOW, allow);
    }
    reply
}
