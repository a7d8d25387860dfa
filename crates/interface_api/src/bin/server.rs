//! Dunning Preview - API Server Binary
//!
//! Starts the HTTP preview surface over the dunning engine.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin dunning-preview
//!
//! # Run with environment variables
//! DUNNING_PORT=9000 DUNNING_TIMEZONE=Europe/Paris cargo run --bin dunning-preview
//! ```
//!
//! # Environment Variables
//!
//! * `DUNNING_HOST` - Server host (default: 0.0.0.0)
//! * `DUNNING_PORT` - Server port (default: 8080)
//! * `DUNNING_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `DUNNING_TIMEZONE` - IANA timezone of the organization (default: UTC)
//! * `RUST_LOG` - Overrides the log filter when set

use anyhow::Context;
use interface_api::{create_router, config::ApiConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - The environment cannot be deserialized into [`ApiConfig`]
/// - The configured default policy is malformed
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load configuration")?;

    // Initialize tracing/logging
    init_tracing(&config.log_level);

    config.validate().context("invalid configuration")?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        timezone = %config.timezone.0,
        steps = config.default_policy.len(),
        "Starting dunning preview server"
    );

    // Parse server address
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    let app = create_router(config);

    tracing::info!(%addr, "Server listening");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
