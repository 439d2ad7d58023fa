//! Roomsense Ingest Service
//!
//! Receives telemetry payloads POSTed by roomsense nodes and serves them back
//! over a small JSON API.

mod store;
mod web;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use store::TelemetryStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let listen = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:3000".to_string());
    let addr: SocketAddr = listen.parse().context("Invalid listen address")?;

    let store = Arc::new(TelemetryStore::new());
    let app = web::create_router(store);

    let listener = TcpListener::bind(addr).await?;
    info!("Ingest service listening on http://{}", addr);

    // Setup Unix signal handlers
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
    }

    Ok(())
}
