//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the one-shot database connection attempt
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - The connection attempt runs in the background; requests are served
//!   whether or not it succeeds
//! - Any listener error is fatal

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::AppConfig;
use crate::db::{self, DatabaseHandle};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;

/// Build the shared state and start the database attempt in the background.
///
/// The returned task only logs; awaiting it is optional.
pub fn bootstrap(config: &AppConfig) -> (AppState, JoinHandle<()>) {
    let handle = DatabaseHandle::new(config.database.default_database.clone());
    let attempt = db::spawn_connect(config.database.clone(), handle.clone());
    (AppState::new(handle), attempt)
}

/// Run the service until `shutdown` fires.
pub async fn run(
    config: AppConfig,
    auth: Router<AppState>,
    shutdown: Shutdown,
) -> Result<(), std::io::Error> {
    let (state, _attempt) = bootstrap(&config);
    let listener = TcpListener::bind(&config.server.bind_address).await?;
    serve(listener, config, state, auth, shutdown).await
}

/// Serve on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    config: AppConfig,
    state: AppState,
    auth: Router<AppState>,
    shutdown: Shutdown,
) -> Result<(), std::io::Error> {
    let signal = shutdown.subscribe();
    HttpServer::new(&config, state, auth).run(listener, signal).await
}
