//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default body limit shared by the JSON and form parsers (100 KiB).
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration.
    pub server: ServerConfig,

    /// Request body parsing.
    pub body: BodyConfig,

    /// Document database connection.
    pub database: DatabaseConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Body parser configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Maximum accepted `application/json` body in bytes.
    pub json_limit_bytes: usize,

    /// Only accept objects and arrays at the top level of a JSON body.
    pub strict: bool,

    /// Wire the `application/x-www-form-urlencoded` parser into the pipeline.
    pub urlencoded: bool,

    /// Maximum accepted form body in bytes.
    pub urlencoded_limit_bytes: usize,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            json_limit_bytes: DEFAULT_BODY_LIMIT,
            strict: true,
            urlencoded: false,
            urlencoded_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Document database configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string, usually supplied through `DATABASE_URI`.
    pub uri: String,

    /// Legacy find-and-modify command path. Must stay disabled.
    pub use_find_and_modify: bool,

    /// Overrides the driver's server selection timeout.
    pub server_selection_timeout_ms: Option<u64>,

    /// Application name reported to the server.
    pub app_name: Option<String>,

    /// Database used when the connection string names none.
    pub default_database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://127.0.0.1:27017/".to_string(),
            use_find_and_modify: false,
            server_selection_timeout_ms: None,
            app_name: None,
            default_database: "test".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
