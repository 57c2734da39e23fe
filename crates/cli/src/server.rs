//! # CLI Server
//!
//! Server startup and management for the Roster CLI.

use std::{future::Future, net::SocketAddr};

use anyhow::anyhow;
use error::Result;
use migration::MigrationManager;
use server::{cache, create_app_router, AppState, ServerResult};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::{parse_socket_addr, AppConfig};

/// Connects to the backing services, applies pending migrations and serves
/// the API until a shutdown signal arrives
///
/// # Arguments
///
/// * `config` - Service configuration
/// * `args` - Serve command arguments
pub async fn serve(config: &AppConfig, args: &crate::commands::ServeArgs) -> Result<()> {
    info!(target: "serve", "Starting API server...");

    info!(target: "serve", database = %config.store.database, "Connecting to document store...");
    let store = store::connect(&config.store).await?;

    info!(target: "serve", "Running migrations...");
    let manager = MigrationManager::new(store.clone());
    manager.initialize().await?;
    let summary = manager.run(&migration::migrations()).await?;
    info!(
        target: "serve",
        applied = summary.applied.len(),
        skipped = summary.skipped.len(),
        "Migrations completed successfully"
    );

    info!(target: "serve", "Connecting to cache...");
    let cache = cache::connect(&config.cache).await?;

    let state = AppState::new(store, cache, config.cache.clone());
    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| anyhow!("Invalid address {}:{}: {}", args.host, args.port, e))?;

    serve_http(create_app_router(state), address, shutdown_signal()).await
}

/// Serves `app` on `address` until `shutdown` resolves
pub async fn serve_http(
    app: axum::Router,
    address: SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| anyhow!("Failed to bind to {}: {}", address, e))?;

    let bound = listener.local_addr()?;
    let result = ServerResult::new(&bound.to_string());
    info!(target: "serve", address = %result.address, started_at = %result.started_at, "Starting HTTP server...");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow!("HTTP server error: {}", e))?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(target: "serve", error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(target: "serve", error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(target: "serve", "Shutdown signal received");
}
