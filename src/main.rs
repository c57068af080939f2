//! AegisOps - CNC Fleet Condition Monitoring Console
//!
//! Real-time telemetry monitoring for a machining fleet with
//! threshold-based anomaly detection and failure-prediction integration.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (8-machine fleet, random seed)
//! cargo run --release
//!
//! # Reproducible run against a local prediction service
//! cargo run --release -- --seed 42 --prediction-url http://localhost:8000/api/v1
//! ```
//!
//! # Environment Variables
//!
//! - `AEGISOPS_CONFIG`: Path to a monitor_config.toml override
//! - `AEGISOPS_CORS_ORIGINS`: Comma-separated allowed CORS origins (dev only)
//! - `RUST_LOG`: Logging level (default: info)

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use aegisops::api::{create_app, DashboardState};
use aegisops::config::MonitorConfig;
use aegisops::prediction::HttpPredictionService;
use aegisops::runtime::MonitorRuntime;

#[derive(Parser, Debug)]
#[command(name = "aegisops")]
#[command(about = "AegisOps CNC Fleet Condition Monitoring Console")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default: "127.0.0.1:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Override the prediction service base URL
    #[arg(long, value_name = "URL")]
    prediction_url: Option<String>,

    /// Path to a monitor_config.toml (the AEGISOPS_CONFIG env var is the
    /// soft-failure equivalent)
    #[arg(long)]
    config: Option<String>,

    /// Seed the telemetry generators for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => MonitorConfig::load_from_file(std::path::Path::new(path))
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => MonitorConfig::load(),
    };
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }
    if let Some(url) = args.prediction_url {
        config.server.prediction_service_url = url;
    }

    info!("AegisOps CNC Fleet Condition Monitoring Console");
    info!(
        machines = config.fleet.machines.len(),
        tick_secs = config.intervals.console_tick_secs,
        "Fleet roster loaded"
    );

    let server_addr = config.server.addr.clone();
    let prediction_url = config.server.prediction_service_url.clone();

    let runtime = Arc::new(MonitorRuntime::new(config, args.seed));
    runtime.spawn();

    let prediction = HttpPredictionService::new(&prediction_url)
        .context("Failed to build prediction service client")?;
    let state = DashboardState {
        runtime: Arc::clone(&runtime),
        prediction: Arc::new(prediction),
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {server_addr}"))?;
    info!("Dashboard available at http://{server_addr}");

    // Graceful shutdown via Ctrl+C
    let cancel_token = runtime.cancellation_token();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    runtime.shutdown().await;
    info!("AegisOps shutdown complete");
    Ok(())
}
