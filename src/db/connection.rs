//! One-shot connection to the document database.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::config::DatabaseConfig;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("invalid connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),

    #[error("database unreachable: {0}")]
    Unreachable(#[source] mongodb::error::Error),

    #[error("database connection is not available")]
    Unavailable,
}

/// Process-wide handle to the database client.
///
/// Cloning is cheap; every clone observes the same connection state.
#[derive(Clone)]
pub struct DatabaseHandle {
    client: Arc<ArcSwapOption<Client>>,
    default_database: Arc<str>,
}

impl DatabaseHandle {
    /// An empty handle that falls back to `default_database` when the
    /// connection string names no database.
    pub fn new(default_database: impl Into<Arc<str>>) -> Self {
        Self {
            client: Arc::new(ArcSwapOption::empty()),
            default_database: default_database.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.load().is_some()
    }

    pub fn client(&self) -> Option<Client> {
        self.client.load_full().map(|c| Client::clone(&c))
    }

    pub fn require_client(&self) -> Result<Client, DatabaseError> {
        self.client().ok_or(DatabaseError::Unavailable)
    }

    /// The database named by the connection string, or the default one.
    pub fn require_database(&self) -> Result<Database, DatabaseError> {
        let client = self.require_client()?;
        Ok(client
            .default_database()
            .unwrap_or_else(|| client.database(&self.default_database)))
    }

    pub(crate) fn install(&self, client: Client) {
        self.client.store(Some(Arc::new(client)));
    }
}

impl Default for DatabaseHandle {
    fn default() -> Self {
        Self::new(DatabaseConfig::default().default_database)
    }
}

impl std::fmt::Debug for DatabaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseHandle")
            .field("connected", &self.is_connected())
            .field("default_database", &self.default_database)
            .finish()
    }
}

/// Build a client and confirm the server answers a `ping`.
pub async fn connect(config: &DatabaseConfig) -> Result<Client, DatabaseError> {
    let mut options = ClientOptions::parse(config.uri.as_str())
        .await
        .map_err(DatabaseError::InvalidUri)?;

    if let Some(ms) = config.server_selection_timeout_ms {
        options.server_selection_timeout = Some(Duration::from_millis(ms));
    }
    if let Some(name) = &config.app_name {
        options.app_name = Some(name.clone());
    }

    let client = Client::with_options(options).map_err(DatabaseError::InvalidUri)?;
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(DatabaseError::Unreachable)?;

    Ok(client)
}

/// Attempt the connection once in the background.
///
/// The outcome is only logged. The returned handle lets callers await the
/// attempt; dropping it detaches the task.
pub fn spawn_connect(config: DatabaseConfig, handle: DatabaseHandle) -> JoinHandle<()> {
    tokio::spawn(async move {
        match connect(&config).await {
            Ok(client) => {
                handle.install(client);
                tracing::info!("Connection established with database");
            }
            Err(e) => {
                tracing::error!(error = %e, "Database connection failed");
            }
        }
    })
}
