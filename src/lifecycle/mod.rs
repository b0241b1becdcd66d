//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → spawn database attempt → bind listener → serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → server drains → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - The database attempt never delays the listener
//! - Bind failure is fatal; database failure is not

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
