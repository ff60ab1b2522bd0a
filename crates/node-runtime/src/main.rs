//! # Omni-Name Node
//!
//! Runs every configured chain's registry, transfer contract and marketplace
//! in one process, relays gateway messages between them and keeps
//! marketplace listings reconciled with ownership.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 2. Load configuration (`ON_CONFIG` file or two-chain default, then env overrides)
//! 3. Deploy each chain and connect its transfer contract to the gateway
//! 4. Spawn the relayer and watcher loops
//! 5. Wait for Ctrl+C, then shut both loops down

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use node_runtime::{NodeConfig, NodeRuntime};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    // Load configuration
    let config = NodeConfig::load().context("Failed to load node configuration")?;

    // Create and start the node runtime
    let runtime = NodeRuntime::new(config)?;
    runtime.start().await?;

    // Keep the node running
    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    // Graceful shutdown
    runtime.shutdown().await;

    Ok(())
}
