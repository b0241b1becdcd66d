//! Auth route group.
//!
//! Handlers are provided by the deployment; this group only answers
//! unknown paths under the prefix with the error envelope.

use axum::{extract::OriginalUri, Router};

use crate::http::{ApiError, AppState};

pub fn router() -> Router<AppState> {
    Router::new().fallback(not_found)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("Cannot find {}", uri.path()))
}
