//! Route groups mounted by the service.
//!
//! # Design Decisions
//! - Each group is an externally supplied `Router<AppState>` nested
//!   under a fixed prefix
//! - Paths outside every prefix fall through to the framework 404

pub mod auth;

use axum::Router;

use crate::http::AppState;

pub const AUTH_PREFIX: &str = "/auth";

/// Nest the auth group under [`AUTH_PREFIX`].
pub fn mount(auth: Router<AppState>) -> Router<AppState> {
    Router::new().nest(AUTH_PREFIX, auth)
}
