//! Document database bootstrap.
//!
//! # Data Flow
//! ```text
//! startup
//!     → spawn_connect (background task, single attempt)
//!         → ok:  DatabaseHandle filled, "Connection established" logged
//!         → err: error logged, handle stays empty
//! routers
//!     → DatabaseHandle::require_database() per request
//! ```
//!
//! # Design Decisions
//! - Startup and request handling never wait on the connection
//! - No retry, no reconnect policy; the driver's own pool handles
//!   transient socket loss once connected
//! - Consumers must tolerate an empty handle

pub mod connection;

pub use connection::{connect, spawn_connect, DatabaseError, DatabaseHandle};
