//! Tracker service configuration.

use std::env;

use common::DatabaseConfig;
use domain::StatusWorkflow;

/// Tracker service configuration.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Status transition policy for `update_status`
    pub workflow: StatusWorkflow,
}

impl TrackerConfig {
    /// Load configuration from environment variables.
    ///
    /// `STRICT_WORKFLOW=true` enables the status adjacency rules; anything
    /// else keeps status changes unrestricted.
    pub fn from_env() -> Self {
        let strict = env::var("STRICT_WORKFLOW")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            database: DatabaseConfig::from_env(),
            workflow: if strict {
                StatusWorkflow::Strict
            } else {
                StatusWorkflow::Unrestricted
            },
        }
    }
}
