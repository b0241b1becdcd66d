//! Shared utilities for integration testing.

use std::net::SocketAddr;

use auth_api::config::{AppConfig, DatabaseConfig};
use auth_api::lifecycle::{startup, Shutdown};
use auth_api::AppState;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A running service bound to an ephemeral loopback port.
#[allow(dead_code)]
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
    pub db_attempt: JoinHandle<()>,
    pub server: JoinHandle<Result<(), std::io::Error>>,
    pub shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Database settings that fail fast: nothing listens on port 1.
pub fn unreachable_database() -> DatabaseConfig {
    DatabaseConfig {
        uri: "mongodb://127.0.0.1:1/?directConnection=true".into(),
        server_selection_timeout_ms: Some(300),
        ..DatabaseConfig::default()
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database: unreachable_database(),
        ..AppConfig::default()
    }
}

/// Start the full service with `auth` mounted.
pub async fn spawn_app(config: AppConfig, auth: Router<AppState>) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let (state, db_attempt) = startup::bootstrap(&config);
    let server = tokio::spawn(startup::serve(
        listener,
        config,
        state.clone(),
        auth,
        shutdown.clone(),
    ));

    TestApp {
        addr,
        state,
        db_attempt,
        server,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
