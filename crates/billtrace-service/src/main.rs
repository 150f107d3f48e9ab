//! Billtrace Service - HTTP API for bill tracking.
//!
//! This is the main entry point for the billtrace service.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billtrace_service::{create_router, AppState, ServiceConfig, StoreBackend};
use billtrace_store::{JsonStore, SqliteStore, Store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,billtrace=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Billtrace Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        data_dir = %config.data_dir,
        store_backend = ?config.store_backend,
        cooldown_minutes = config.cooldown_minutes,
        offline_table = %config.geoip_table_path.is_some(),
        "Service configuration loaded"
    );

    std::fs::create_dir_all(&config.data_dir)?;

    // Open the configured store backend
    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Json => {
            tracing::info!(path = %config.data_dir, "Opening JSON store");
            Arc::new(JsonStore::open(&config.data_dir))
        }
        StoreBackend::Sqlite => {
            let path = Path::new(&config.data_dir).join("billtrace.db");
            tracing::info!(path = %path.display(), "Opening SQLite store");
            Arc::new(SqliteStore::open(&path).await?)
        }
    };

    // Build app state (assembles the location provider chain)
    let state = AppState::new(store, config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
