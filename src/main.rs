use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

mod address;
mod config;
mod engine;
mod error;
mod models;
mod notify;
mod probe;
mod report;
mod state;
mod utils;

use crate::config::MonitorConfig;
use crate::engine::Monitor;

#[tokio::main]
async fn main() -> Result<()> {
    utils::setup_console();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_ansi(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());
    let config_content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path))?;
    let config: MonitorConfig =
        serde_json::from_str(&config_content).with_context(|| "Failed to parse config")?;

    let monitor = Monitor::new(config)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received. Closing sitewatch...");
            let _ = shutdown_tx.send(true);
        }
    });

    // run() only returns Ok once the shutdown signal has been observed;
    // anything else propagates as a fatal error.
    monitor.run(shutdown_rx).await?;

    println!("CTRL-C detected, quitting...");
    std::process::exit(-1)
}
