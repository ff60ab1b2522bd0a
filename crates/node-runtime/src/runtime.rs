//! # Node Runtime
//!
//! Owns every chain, the gateway and the bus, and drives the two background
//! tasks:
//!
//! ```text
//!   ┌──────────────┐  deliver_all   ┌────────────────┐
//!   │ relayer loop │ ─────────────→ │ InMemoryGateway│ ──→ on_call / on_revert / on_abort
//!   └──────────────┘                └────────────────┘
//!   ┌──────────────┐  sweep + ownership events
//!   │ watcher loop │ ─────────────→ registry / marketplace of every chain
//!   └──────────────┘
//! ```
//!
//! Both stop when the shutdown channel flips.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use on_02_cross_chain_transfer::{DeliveryOutcome, DeliveryResult, InMemoryGateway};
use on_04_reconciliation::ReconciliationWatcher;
use shared_bus::{EventFilter, EventTopic, InMemoryEventBus};
use shared_types::{ChainId, Clock, SystemClock};

use crate::chain::ChainNode;
use crate::config::NodeConfig;

/// Multi-chain node.
pub struct NodeRuntime {
    config: NodeConfig,
    bus: Arc<InMemoryEventBus>,
    gateway: Arc<InMemoryGateway>,
    chains: BTreeMap<ChainId, ChainNode>,
    watcher: Arc<ReconciliationWatcher>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NodeRuntime {
    /// Build every chain on wall-clock time.
    pub fn new(config: NodeConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build every chain on `clock`.
    pub fn with_clock(config: NodeConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate().context("Invalid node configuration")?;

        let bus = Arc::new(InMemoryEventBus::new());
        let gateway = Arc::new(InMemoryGateway::new());
        let watcher = Arc::new(ReconciliationWatcher::new(
            config.watcher.clone(),
            bus.clone(),
        ));

        let mut chains = BTreeMap::new();
        for chain_config in &config.chains {
            let node = ChainNode::deploy(
                chain_config,
                config.peers_of(chain_config.chain_id),
                clock.clone(),
                gateway.clone(),
                bus.clone(),
            )
            .with_context(|| format!("Failed to deploy chain {}", chain_config.chain_id))?;
            watcher.watch(node.watched());
            chains.insert(chain_config.chain_id, node);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            bus,
            gateway,
            chains,
            watcher,
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Spawn the relayer and watcher loops.
    pub async fn start(&self) -> Result<()> {
        if *self.shutdown_rx.borrow() {
            bail!("Runtime already shut down");
        }
        if !self.tasks.lock().is_empty() {
            bail!("Runtime already started");
        }

        info!("===========================================");
        info!("  Omni-Name Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!(
            "Chains: {:?}",
            self.chains.keys().map(|c| c.value()).collect::<Vec<_>>()
        );
        info!(
            "Watcher: policy {}, interval {}s, event-triggered {}",
            self.config.watcher.policy,
            self.config.watcher.interval_secs,
            self.config.watcher.event_triggered
        );

        let mut tasks = Vec::new();
        if self.config.relayer.enabled {
            info!(
                "Relayer: delivering every {}ms",
                self.config.relayer.relay_interval_ms
            );
            tasks.push(tokio::spawn(relay_loop(
                self.gateway.clone(),
                Duration::from_millis(self.config.relayer.relay_interval_ms),
                self.shutdown_rx.clone(),
            )));
        } else {
            warn!("Relayer disabled: gateway messages stay queued until delivered manually");
        }

        let events = self
            .config
            .watcher
            .event_triggered
            .then(|| {
                self.bus.subscribe(EventFilter::topics(vec![
                    EventTopic::Registry,
                    EventTopic::CrossChain,
                ]))
            });
        tasks.push(tokio::spawn(
            self.watcher.clone().run(events, self.shutdown_rx.clone()),
        ));

        *self.tasks.lock() = tasks;
        info!("Node ready");
        Ok(())
    }

    /// Deliver every queued gateway message once.
    pub fn relay_once(&self) -> Vec<DeliveryOutcome> {
        relay(&self.gateway)
    }

    /// Re-run the abort handler of every parked gateway message.
    pub fn retry_unresolved(&self) -> Vec<DeliveryOutcome> {
        let outcomes: Vec<_> = self
            .gateway
            .unresolved()
            .into_iter()
            .filter_map(|receipt| {
                self.gateway
                    .retry_abort(receipt.message_id, "operator retry")
                    .map_err(|e| warn!("[relayer] Retry of {} failed: {}", receipt.message_id, e))
                    .ok()
            })
            .collect();
        log_outcomes(&outcomes);
        outcomes
    }

    /// Signal shutdown and wait for the background tasks.
    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
        let tasks = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            if let Err(e) = task.await {
                error!("Background task failed: {}", e);
            }
        }
        let pending = self.gateway.pending_count();
        if pending > 0 {
            warn!("{} gateway messages still queued at shutdown", pending);
        }
        let unresolved = self.gateway.unresolved_count();
        if unresolved > 0 {
            error!("{} gateway messages unresolved at shutdown", unresolved);
        }
        info!("Shutdown complete");
    }

    /// Configuration.
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Chain by id.
    pub fn chain(&self, chain: ChainId) -> Option<&ChainNode> {
        self.chains.get(&chain)
    }

    /// All chains, ordered by id.
    pub fn chains(&self) -> impl Iterator<Item = &ChainNode> {
        self.chains.values()
    }

    /// Event bus shared by every chain.
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// Gateway connecting the transfer contracts.
    pub fn gateway(&self) -> Arc<InMemoryGateway> {
        Arc::clone(&self.gateway)
    }

    /// Reconciliation watcher.
    pub fn watcher(&self) -> Arc<ReconciliationWatcher> {
        Arc::clone(&self.watcher)
    }
}

fn relay(gateway: &InMemoryGateway) -> Vec<DeliveryOutcome> {
    let outcomes = gateway.deliver_all();
    log_outcomes(&outcomes);
    outcomes
}

fn log_outcomes(outcomes: &[DeliveryOutcome]) {
    for outcome in outcomes {
        let route = format!(
            "{} ({} -> {})",
            outcome.message_id, outcome.source_chain, outcome.target_chain
        );
        match &outcome.result {
            DeliveryResult::Executed => info!("[relayer] {} executed", route),
            DeliveryResult::Reverted { reason } => warn!("[relayer] {} reverted: {}", route, reason),
            DeliveryResult::Aborted { reason } => warn!("[relayer] {} aborted: {}", route, reason),
            DeliveryResult::Unresolved { reason } => {
                error!("[relayer] {} unresolved, parked: {}", route, reason)
            }
        }
    }
}

async fn relay_loop(
    gateway: Arc<InMemoryGateway>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                relay(&gateway);
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
    info!("[relayer] Stopped after {} deliveries", gateway.delivered_count());
}
