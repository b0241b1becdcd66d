//! Auth API service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ CORS headers ─▶ panic catcher
//!                                                                 │
//!                     ┌───────────────────────────────────────────┘
//!                     ▼
//!                 preflight ─▶ JSON body ─▶ /auth router ─▶ handler
//!                                                             │
//!     Client Response                                         │ ApiError
//!     ◀──────────────────── JSON error envelope ◀─────────────┘
//!
//!     Startup: spawn database attempt (logged only) ─▶ bind ─▶ serve
//! ```

use std::path::PathBuf;

use clap::Parser;

use auth_api::config::{resolve_config, AppConfig, ConfigError, Overrides};
use auth_api::lifecycle::{signals, startup, Shutdown};
use auth_api::observability::logging;
use auth_api::routes;

#[derive(Parser, Debug)]
#[command(name = "auth-api")]
#[command(about = "HTTP bootstrap for the auth API", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "AUTH_API_CONFIG")]
    config: Option<PathBuf>,

    /// Listener address, e.g. 127.0.0.1:8080.
    #[arg(long)]
    bind: Option<String>,

    /// Document database connection string.
    #[arg(long, env = "DATABASE_URI")]
    database_uri: Option<String>,

    /// Log level when RUST_LOG is unset.
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn load(self) -> Result<AppConfig, ConfigError> {
        let overrides = Overrides {
            bind_address: self.bind,
            database_uri: self.database_uri,
            log_level: self.log_level,
        };
        resolve_config(self.config.as_deref(), overrides)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().load()?;

    logging::init(&config.observability.log_level)?;

    tracing::info!("auth-api v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        json_limit_bytes = config.body.json_limit_bytes,
        urlencoded = config.body.urlencoded,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    startup::run(config, routes::auth::router(), shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
