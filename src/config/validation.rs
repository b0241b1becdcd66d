//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, bind address is `host:port`)
//! - Keep fixed database options fixed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - The database URI is not checked here: a bad URI is a connection
//!   failure, logged at startup, and never stops the process

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.bind_address `{0}` is not a host:port address")]
    InvalidBindAddress(String),

    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("database.use_find_and_modify must remain disabled")]
    LegacyFindAndModify,
}

/// Accepts socket addresses and `host:port` pairs. Names are not resolved.
fn is_bind_address(addr: &str) -> bool {
    if addr.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.contains(|c: char| c.is_whitespace() || c == ':')
                && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !is_bind_address(&config.server.bind_address) {
        errors.push(ValidationError::InvalidBindAddress(
            config.server.bind_address.clone(),
        ));
    }

    if config.body.json_limit_bytes == 0 {
        errors.push(ValidationError::ZeroLimit("body.json_limit_bytes"));
    }

    if config.body.urlencoded_limit_bytes == 0 {
        errors.push(ValidationError::ZeroLimit("body.urlencoded_limit_bytes"));
    }

    if config.database.use_find_and_modify {
        errors.push(ValidationError::LegacyFindAndModify);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
