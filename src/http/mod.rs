//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layer order)
//!     → request.rs (request ID)
//!     → cors.rs (response headers, preflight)
//!     → body.rs (JSON / form deserialization)
//!     → routes (mounted router groups)
//!     → error.rs (JSON error envelope on any failure)
//!     → Send to client
//! ```

pub mod body;
pub mod cors;
pub mod error;
pub mod request;
pub mod server;

pub use body::{JsonBody, ParsedBody};
pub use error::{ApiError, ErrorEnvelope};
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
