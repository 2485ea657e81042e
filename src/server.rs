use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    db,
    handlers::{self, AppState},
    signals::setup_signal_handlers,
};

/// Request bodies are small JSON documents
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Start the delivery manager server
///
/// Opens the database (running pending migrations), binds the configured
/// address and serves until SIGTERM/SIGINT, then drains in-flight requests.
pub async fn start_server(config: Config) -> Result<()> {
    let db_pool = db::connect(&config.database)
        .await
        .with_context(|| format!("Failed to open database '{}'", config.database.url))?;

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app = create_router(AppState::new(db_pool.clone()));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting Delivery Manager on {}", addr);
    info!(
        database = %config.database.url,
        max_connections = config.database.max_connections,
        "Database ready"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    db_pool.close().await;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/clients", handlers::clients::router())
        .nest("/orders", handlers::orders::router())
        .nest("/deliveries", handlers::deliveries::router())
        .nest("/pricing", handlers::pricing::router())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
