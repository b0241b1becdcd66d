//! Command line and environment overrides.

use crate::config::schema::AppConfig;

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub database_uri: Option<String>,
    pub log_level: Option<String>,
}

impl Overrides {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(addr) = self.bind_address {
            config.server.bind_address = addr;
        }
        if let Some(uri) = self.database_uri {
            config.database.uri = uri;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}
