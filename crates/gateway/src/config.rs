//! Gateway configuration.

use std::env;

use common::{JwtConfig, ServiceConfig};
use domain::MIN_JWT_SECRET_LENGTH;
use tracker_service_lib::config::TrackerConfig;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bind address
    pub service: ServiceConfig,
    /// Bearer token verification
    pub jwt: JwtConfig,
    /// Storage and workflow settings for the tracker services
    pub tracker: TrackerConfig,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ServiceConfig::default();
        Self {
            service: ServiceConfig {
                host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
                port: env::var("GATEWAY_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.port),
            },
            jwt: JwtConfig::from_env(),
            tracker: TrackerConfig::from_env(),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| !o.trim().is_empty()),
        }
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            ));
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            jwt: JwtConfig::default(),
            tracker: TrackerConfig::default(),
            cors_origin: None,
        }
    }
}
