//! # huedeckd
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`huedeck.toml`, env vars)
//! - Install the `tracing` subscriber
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the settings store, the bridge controller and host feedback
//! - Build the action service and the axum router
//! - Bind to a TCP port and serve until Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod feedback;

use std::sync::Arc;

use huedeck_adapter_http_axum::router;
use huedeck_adapter_http_axum::state::AppState;
use huedeck_adapter_hue_http::HueHttpController;
use huedeck_adapter_storage_sqlite_sqlx::{Config as StorageConfig, SqliteSettingsStore};
use huedeck_app::cache::SharedCache;
use huedeck_app::services::action_service::ActionService;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::feedback::LogFeedback;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    // Database
    let db = StorageConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let store = SqliteSettingsStore::new(db.pool().clone());

    // Bridge
    let controller = HueHttpController::new(&config.hue_http())?;

    // Services
    let service = ActionService::new(
        Arc::new(SharedCache::new()),
        store,
        controller,
        LogFeedback,
    );

    // HTTP
    let app = router::build(AppState::new(service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "huedeckd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("huedeckd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
