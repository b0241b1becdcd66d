//! Error envelope for every client-facing failure.
//!
//! # Responsibilities
//! - Carry an optional status code, message and data payload from any stage
//! - Render `{"message": ..., "data": ...}` with the chosen status
//! - Log the raw error before it leaves the process
//!
//! # Design Decisions
//! - Absent fields are omitted from the body, present ones pass through
//!   verbatim (empty strings and `null` included)
//! - Missing status code means 500
//! - Rendering never fails

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::db::DatabaseError;

type Source = Arc<dyn StdError + Send + Sync>;

/// An error raised by a pipeline stage or a mounted router.
#[derive(Clone, Default)]
pub struct ApiError {
    status_code: Option<StatusCode>,
    message: Option<String>,
    data: Option<Value>,
    source: Option<Source>,
}

/// Wire shape of [`ApiError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiError {
    /// An error with an explicit status code.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code: Some(status),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// An error without a status code; rendered as 500.
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Attach the underlying error for the operator log. Never sent to clients.
    pub fn with_source(mut self, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        self.source = Some(Arc::from(source.into()));
        self
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        self.status_code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Status the response is sent with.
    pub fn status(&self) -> StatusCode {
        self.status_code.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            message: self.message.clone(),
            data: self.data.clone(),
        }
    }

    /// Convert a caught panic payload into an unclassified error.
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "Unknown panic".to_string()
        };
        Self::unclassified(message)
    }
}

impl fmt::Debug for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ApiError");
        s.field("status_code", &self.status_code.map(|c| c.as_u16()))
            .field("message", &self.message)
            .field("data", &self.data);
        if let Some(source) = &self.source {
            s.field("source", &format_chain(source.as_ref()));
        }
        s.finish()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} {}", self.status().as_u16(), message),
            None => write!(f, "{}", self.status().as_u16()),
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn StdError + 'static))
    }
}

fn format_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        current = cause.source();
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = ?self, "Request failed");
        (self.status(), Json(self.envelope())).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        Self::unclassified(err.to_string()).with_source(err)
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::unclassified(err.to_string()).with_source(err)
    }
}
