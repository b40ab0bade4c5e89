//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod stores;

use std::sync::Arc;

use anyhow::Result;
use arena_core::Config;
use axum::Router;

use crate::state::AppState;

/// Validate configuration, install tracing, open the stores and build the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    config.validate()?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        store_backend = %config.store_backend(),
        "Starting arena API"
    );

    let state = Arc::new(stores::setup_stores(config).await?);
    let app = routes::setup_routes(state.clone());

    Ok((state, app))
}
