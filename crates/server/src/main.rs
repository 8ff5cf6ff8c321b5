//! Risk Server - Patient risk prediction API
//!
//! Serves the trained risk model over HTTP with health and metrics
//! endpoints. A missing or corrupt model artifact leaves the process
//! running in degraded mode.

use anyhow::Result;
use risk_lib::{RiskScorer, ServiceMetrics};
use risk_server::{api, config};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting risk-server");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(model_path = %config.model_path, "Server configured");

    // Load the model once; failure degrades instead of aborting
    let scorer = RiskScorer::load(Path::new(&config.model_path));

    // Initialize metrics
    let metrics = ServiceMetrics::new();
    metrics.set_model_loaded(scorer.model_loaded());

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(scorer, metrics));

    // Start the API server
    let _api_handle = tokio::spawn(api::serve(
        config.bind_address.clone(),
        config.api_port,
        app_state,
    ));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
