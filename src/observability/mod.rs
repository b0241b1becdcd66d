//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → tracing.rs (per-request spans with request IDs)
//!
//! Consumers:
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span
//! - `RUST_LOG` always wins over configured level

#[cfg(test)]
pub(crate) mod capture;
pub mod logging;
pub mod tracing;
