//! HTTP Endpoint Uptime Monitor Binary

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uptime_monitor::{config, Monitor, Result};

#[derive(Debug, Parser)]
#[command(name = "uptime_monitor", version, about = "Probe HTTP endpoints and report per-domain availability")]
struct Args {
    /// Path to the endpoint list (YAML, or JSON by extension)
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    initialize_tracing();

    let args = Args::parse();

    info!("Starting uptime monitor v{}", env!("CARGO_PKG_VERSION"));

    let endpoints = match config::load_endpoints(&args.config) {
        Ok(endpoints) => endpoints,
        Err(e) => {
            error!(
                "Failed to load endpoint list from {}: {}",
                args.config.display(),
                e
            );
            std::process::exit(1);
        }
    };

    info!(
        "Monitoring {} endpoints from {}",
        endpoints.len(),
        args.config.display()
    );

    let monitor = Monitor::new(endpoints)?;

    if let Err(e) = monitor.start().await {
        error!("Monitor failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize structured logging
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
