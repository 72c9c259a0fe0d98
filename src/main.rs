// SPDX-License-Identifier: MIT

//! Heart Link API Server
//!
//! Backend for the Heart Link PWA: accounts, spaces, and the access rules
//! that gate countdowns, messages, to-dos and nudges.

use heartlink::{
    config::{Config, StoreBackend},
    db::Db,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Heart Link API");

    // Initialize the persistence handle once; it is passed by reference
    // through AppState to every component.
    let db = match config.store_backend {
        StoreBackend::Firestore => Db::firestore(&config.gcp_project_id)
            .await
            .expect("Failed to connect to Firestore"),
        StoreBackend::Memory => {
            tracing::warn!("Using in-process store; data is not persisted");
            Db::memory()
        }
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    // Build router
    let app = heartlink::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("heartlink=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
