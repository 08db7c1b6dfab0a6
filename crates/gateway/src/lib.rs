//! Bug tracker HTTP API.
//!
//! Serves the tracker services over REST, authenticating callers with
//! bearer tokens.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use axum::{http::HeaderValue, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use tracker_service_lib::infra::Database;
use tracker_service_lib::repository::InMemoryStore;
use tracker_service_lib::service::TrackerServices;

use crate::config::GatewayConfig;
use crate::middleware::TokenVerifier;
use crate::routes::create_router;
use crate::state::AppState;

/// Storage backend for the running server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

/// Build the application state for the chosen backend.
pub async fn build_state(
    config: &GatewayConfig,
    storage: Storage,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let workflow = config.tracker.workflow;
    let tokens = TokenVerifier::new(&config.jwt);

    let state = match storage {
        Storage::Postgres => {
            let db = Database::connect(&config.tracker.database).await?;
            let services = TrackerServices::from_connection(db.get_connection(), workflow);
            AppState::new(services, tokens, Some(db))
        }
        Storage::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            let services = TrackerServices::in_memory(InMemoryStore::new(), workflow);
            AppState::new(services, tokens, None)
        }
    };

    info!(workflow = ?workflow, "Tracker services ready");
    Ok(state)
}

/// Router with tracing and CORS layers.
pub fn build_app(state: AppState, cors_origin: Option<&str>) -> Result<Router, Box<dyn std::error::Error>> {
    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    Ok(create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Run the HTTP server with the given configuration.
pub async fn serve(config: GatewayConfig, storage: Storage) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;

    let state = build_state(&config, storage).await?;
    let app = build_app(state, config.cors_origin.as_deref())?;

    let addr: SocketAddr = format!("{}:{}", config.service.host, config.service.port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
