//! Todo service configuration.

use serde::{Deserialize, Serialize};

use common::DatabaseConfig;

/// Todo service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
}

impl TodoServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env("TODO_SERVICE"),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig::in_memory(),
        }
    }
}
