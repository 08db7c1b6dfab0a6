//! Application state for dependency injection.

use std::sync::Arc;

use tracker_service_lib::infra::Database;
use tracker_service_lib::service::TrackerServices;

use crate::middleware::TokenVerifier;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: TrackerServices,
    pub tokens: Arc<TokenVerifier>,
    /// Present when backed by PostgreSQL; used by the health check
    pub database: Option<Database>,
}

impl AppState {
    /// Create new app state.
    pub fn new(services: TrackerServices, tokens: TokenVerifier, database: Option<Database>) -> Self {
        Self {
            services,
            tokens: Arc::new(tokens),
            database,
        }
    }
}
