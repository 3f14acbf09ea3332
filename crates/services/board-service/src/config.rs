//! Board service configuration.

use std::env;

use serde::{Deserialize, Serialize};

use common::DatabaseConfig;

/// Board service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Persist the boards submitted with a member registration
    pub cascade_member_boards: bool,
}

impl BoardServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env("BOARD_SERVICE"),
            cascade_member_boards: env::var("BOARD_SERVICE_CASCADE_MEMBER_BOARDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }

    /// Private in-memory database with cascade enabled.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig::in_memory(),
            cascade_member_boards: true,
        }
    }
}

impl Default for BoardServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            cascade_member_boards: true,
        }
    }
}
