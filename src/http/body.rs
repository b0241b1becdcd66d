//! Request body deserialization.
//!
//! # Responsibilities
//! - Parse `application/json` bodies before dispatch
//! - Parse `application/x-www-form-urlencoded` bodies (only when enabled)
//! - Enforce body size limits
//! - Expose the parsed value to handlers through [`JsonBody`]
//!
//! # Design Decisions
//! - Other content types are left untouched; handlers see `{}`
//! - Only UTF-8 uncompressed bodies are parsed; anything else is 415
//! - Empty JSON bodies parse as `{}`
//! - Raw bytes are restored after parsing so handlers can still read them
//! - Every failure is an [`ApiError`], rendered by the error envelope

use axum::{
    body::{Body, Bytes},
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use http_body_util::LengthLimitError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::BodyConfig;
use crate::http::error::ApiError;

pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";

/// Limits shared by the body parsing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyLimits {
    pub json_limit: usize,
    pub strict: bool,
    pub urlencoded_limit: usize,
}

impl From<&BodyConfig> for BodyLimits {
    fn from(config: &BodyConfig) -> Self {
        Self {
            json_limit: config.json_limit_bytes,
            strict: config.strict,
            urlencoded_limit: config.urlencoded_limit_bytes,
        }
    }
}

impl Default for BodyLimits {
    fn default() -> Self {
        Self::from(&BodyConfig::default())
    }
}

/// Parsed request body, stored in request extensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBody(pub Value);

/// Returns true if the request's media type equals `expected`.
/// Parameters such as `charset` are ignored.
pub fn has_media_type(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

/// The `charset` parameter of the content type, lowercased.
fn charset(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    value.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
    })
}

/// Reject bodies the parsers cannot read as UTF-8 text.
fn check_readable(headers: &HeaderMap) -> Result<(), ApiError> {
    if let Some(charset) = charset(headers) {
        if charset != "utf-8" {
            return Err(ApiError::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("unsupported charset \"{}\"", charset.to_ascii_uppercase()),
            ));
        }
    }

    let encoding = headers
        .get(header::CONTENT_ENCODING)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).trim().to_ascii_lowercase());
    match encoding.as_deref() {
        None | Some("identity") => Ok(()),
        Some(other) => Err(ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("unsupported content encoding \"{other}\""),
        )),
    }
}

fn too_large() -> ApiError {
    ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "request entity too large")
}

async fn read_limited(body: Body, headers: &HeaderMap, limit: usize) -> Result<Bytes, ApiError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return Err(too_large());
    }

    axum::body::to_bytes(body, limit).await.map_err(|err| {
        let inner = err.into_inner();
        if inner.is::<LengthLimitError>() {
            too_large()
        } else {
            ApiError::bad_request("request aborted").with_source(inner)
        }
    })
}

fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Parse a JSON body. Empty input yields `{}`.
pub fn parse_json(bytes: &[u8], strict: bool) -> Result<Value, ApiError> {
    let Some(pos) = bytes.iter().position(|b| !is_json_whitespace(*b)) else {
        return Ok(Value::Object(Map::new()));
    };

    if strict && !matches!(bytes[pos], b'{' | b'[') {
        let token = std::str::from_utf8(&bytes[pos..])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Err(ApiError::bad_request(format!(
            "Unexpected token {token} in JSON at position {pos}"
        )));
    }

    serde_json::from_slice(bytes).map_err(|e| ApiError::bad_request(e.to_string()).with_source(e))
}

/// Parse a form body into a JSON object. Repeated keys collect into an array.
pub fn parse_form(bytes: &[u8]) -> Value {
    let mut map = Map::new();
    for (key, value) in url::form_urlencoded::parse(bytes) {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }
    Value::Object(map)
}

/// JSON body stage.
pub async fn json(
    State(limits): State<BodyLimits>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !has_media_type(request.headers(), APPLICATION_JSON) {
        return Ok(next.run(request).await);
    }
    check_readable(request.headers())?;

    let (mut parts, body) = request.into_parts();
    let bytes = read_limited(body, &parts.headers, limits.json_limit).await?;
    let value = parse_json(&bytes, limits.strict)?;

    tracing::trace!(bytes = bytes.len(), "Parsed JSON body");
    parts.extensions.insert(ParsedBody(value));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Form body stage. Dormant unless `body.urlencoded` is enabled.
pub async fn urlencoded(
    State(limits): State<BodyLimits>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !has_media_type(request.headers(), APPLICATION_FORM) {
        return Ok(next.run(request).await);
    }
    check_readable(request.headers())?;

    let (mut parts, body) = request.into_parts();
    let bytes = read_limited(body, &parts.headers, limits.urlencoded_limit).await?;
    parts.extensions.insert(ParsedBody(parse_form(&bytes)));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Extractor for the body parsed by the body stages.
///
/// Requests that no stage parsed yield an empty object.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequestParts<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .extensions
            .get::<ParsedBody>()
            .map(|b| b.0.clone())
            .unwrap_or_else(|| Value::Object(Map::new()));

        serde_json::from_value(value).map(JsonBody).map_err(|e| {
            ApiError::bad_request(format!("Invalid request body: {e}")).with_source(e)
        })
    }
}
