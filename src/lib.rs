//! Auth API service bootstrap.
//!
//! Wires the request pipeline (JSON body parsing, CORS headers, the `/auth`
//! route group, JSON error envelope) and a best-effort document database
//! connection.

pub mod config;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routes;

pub use config::schema::AppConfig;
pub use http::{ApiError, AppState, HttpServer, JsonBody};
pub use lifecycle::Shutdown;
