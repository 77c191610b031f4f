//! Key Ledger Service - Main Application Entry Point
//!
//! This is a REST API server for tracking physical keys lent out to people.
//! Each key is either available or checked out to a named holder, and every
//! check-out and check-in is appended to a checkout log.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: Whole-value JSON blobs (`keys`, `checkoutLogs`) in memory,
//!   on disk, or in PostgreSQL via sqlx
//! - **Consistency**: All writes serialized by `CheckoutCoordinator`
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Open the configured blob store (running migrations for PostgreSQL)
//! 3. Build the coordinator and HTTP router
//! 4. Start server on configured port

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use config::{Config, StoreBackend};
use store::{BlobStore, FileBlobStore, MemoryBlobStore, PgBlobStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!(backend = ?config.store_backend, "Configuration loaded");

    let blobs = open_store(&config).await?;
    let app = routes::router(state::AppState::new(blobs));

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the backing store selected by `STORE_BACKEND`.
async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn BlobStore>> {
    let blobs: Arc<dyn BlobStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; keys and logs are lost on restart");
            Arc::new(MemoryBlobStore::new())
        }
        StoreBackend::File => Arc::new(FileBlobStore::open(&config.data_dir).await?),
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when STORE_BACKEND=postgres")?;

            let pool = db::create_pool(database_url).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Arc::new(PgBlobStore::new(pool))
        }
    };

    Ok(blobs)
}
