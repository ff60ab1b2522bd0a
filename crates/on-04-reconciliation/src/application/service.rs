//! # Reconciliation Watcher
//!
//! Diffs marketplace listings against registry ownership on every watched
//! chain. The marketplace never hears about transfers that bypass `buy`
//! (local transfers, burns, mints, restores, reclaims), so drift is
//! expected and repaired here.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use on_01_domain_registry::DomainRegistryApi;
use on_03_marketplace::MarketplaceApi;
use shared_bus::{EventPublisher, NameServiceEvent, Subscription};
use shared_types::ChainId;

use crate::config::WatcherConfig;
use crate::domain::{
    ReconciliationError, ReconciliationPolicy, ReconciliationReport, StaleListing,
};
use crate::ports::{ReconciliationApi, WatchedChain};

/// Reconciliation Watcher - keeps listings in line with ownership.
pub struct ReconciliationWatcher {
    config: WatcherConfig,
    chains: RwLock<BTreeMap<ChainId, WatchedChain>>,
    flagged: RwLock<BTreeMap<(ChainId, String), StaleListing>>,
    events: Arc<dyn EventPublisher>,
    sweeps: AtomicU64,
}

impl ReconciliationWatcher {
    /// Create a watcher with no chains.
    pub fn new(config: WatcherConfig, events: Arc<dyn EventPublisher>) -> Self {
        Self {
            config,
            chains: RwLock::new(BTreeMap::new()),
            flagged: RwLock::new(BTreeMap::new()),
            events,
            sweeps: AtomicU64::new(0),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Start watching a chain. Replaces any previous entry for the same id.
    pub fn watch(&self, chain: WatchedChain) {
        info!("[on-04] Watching chain {}", chain.chain_id);
        self.chains.write().insert(chain.chain_id, chain);
    }

    /// Watched chain ids, ascending.
    pub fn chains(&self) -> Vec<ChainId> {
        self.chains.read().keys().copied().collect()
    }

    /// Completed full sweeps.
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    fn chain(&self, chain: ChainId) -> Result<WatchedChain, ReconciliationError> {
        self.chains
            .read()
            .get(&chain)
            .cloned()
            .ok_or(ReconciliationError::UnknownChain(chain))
    }

    fn stale_listing(
        chain: &WatchedChain,
        name: &str,
    ) -> Result<Option<StaleListing>, ReconciliationError> {
        let Some(listing) = chain.marketplace.listing(name)? else {
            return Ok(None);
        };
        if !listing.active {
            return Ok(None);
        }
        let owner = chain.registry.owner_of(&listing.name)?;
        if owner == listing.seller {
            return Ok(None);
        }
        Ok(Some(StaleListing {
            chain: chain.chain_id,
            name: listing.name,
            seller: listing.seller,
            owner,
            price: listing.price,
        }))
    }

    fn publish_detected(&self, stale: &StaleListing, deactivated: bool) {
        self.events.publish(NameServiceEvent::StaleListingDetected {
            chain: stale.chain,
            name: stale.name.clone(),
            seller: stale.seller,
            owner: stale.owner,
            deactivated,
        });
    }

    /// Apply the policy to one stale listing. Returns false if nothing was
    /// done because the marketplace found it consistent after all.
    fn act(
        &self,
        chain: &WatchedChain,
        stale: &StaleListing,
    ) -> Result<bool, ReconciliationError> {
        match self.config.policy {
            ReconciliationPolicy::AutoDeactivate => {
                // The marketplace re-checks ownership under its own lock.
                if !chain.marketplace.deactivate_stale(&stale.name)? {
                    debug!(
                        "[on-04] {} on {} no longer stale at deactivation",
                        stale.name, stale.chain
                    );
                    return Ok(false);
                }
                warn!(
                    "[on-04] Deactivated stale listing {} on {} (seller {}, owner {})",
                    stale.name, stale.chain, stale.seller, stale.owner
                );
                self.publish_detected(stale, true);
            }
            ReconciliationPolicy::FlagForReview => {
                let key = (stale.chain, stale.name.clone());
                let newly_flagged = self.flagged.write().insert(key, stale.clone()).is_none();
                if newly_flagged {
                    warn!(
                        "[on-04] Flagged stale listing {} on {} (seller {}, owner {})",
                        stale.name, stale.chain, stale.seller, stale.owner
                    );
                    self.publish_detected(stale, false);
                }
            }
        }
        Ok(true)
    }

    fn unflag(&self, chain: ChainId, name: &str) -> Option<StaleListing> {
        self.flagged.write().remove(&(chain, name.to_string()))
    }

    fn sweep_chain(&self, chain: &WatchedChain) -> ReconciliationReport {
        let mut report = ReconciliationReport::default();
        for listing in chain.marketplace.active_listings() {
            report.checked += 1;
            let stale = match Self::stale_listing(chain, &listing.name) {
                Ok(Some(stale)) => stale,
                Ok(None) => {
                    self.unflag(chain.chain_id, &listing.name);
                    report.consistent += 1;
                    continue;
                }
                Err(e) => {
                    report.errors.push(format!("{}@{}: {}", listing.name, chain.chain_id, e));
                    continue;
                }
            };
            match self.act(chain, &stale) {
                Ok(true) if self.config.policy.is_automatic() => report.deactivated.push(stale),
                Ok(true) => report.flagged.push(stale),
                Ok(false) => report.consistent += 1,
                Err(e) => report.errors.push(format!("{}@{}: {}", stale.name, stale.chain, e)),
            }
        }
        report
    }

    /// Sweep periodically and react to ownership events until `shutdown`
    /// flips to true or its sender is dropped.
    ///
    /// The first sweep runs immediately.
    pub async fn run(
        self: Arc<Self>,
        mut events: Option<Subscription>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let period = Duration::from_secs(self.config.interval_secs.max(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            "[on-04] Watcher started (policy {}, every {:?}, event-triggered {})",
            self.config.policy, period, self.config.event_triggered
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.run_once();
                    if !report.is_clean() {
                        info!(
                            "[on-04] Sweep found {} stale, {} errors",
                            report.stale_count(),
                            report.errors.len()
                        );
                    }
                }
                event = next_event(&mut events) => match event {
                    Some(event) => {
                        self.on_event(&event);
                    }
                    None => {
                        warn!("[on-04] Event bus closed, falling back to periodic sweeps");
                        events = None;
                    }
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("[on-04] Watcher stopped after {} sweeps", self.sweeps());
    }
}

async fn next_event(events: &mut Option<Subscription>) -> Option<NameServiceEvent> {
    match events {
        Some(subscription) => subscription.recv().await,
        None => std::future::pending().await,
    }
}

impl ReconciliationApi for ReconciliationWatcher {
    fn policy(&self) -> ReconciliationPolicy {
        self.config.policy
    }

    fn run_once(&self) -> ReconciliationReport {
        let chains: Vec<WatchedChain> = self.chains.read().values().cloned().collect();
        let mut report = ReconciliationReport::default();
        for chain in &chains {
            report.merge(self.sweep_chain(chain));
        }
        // Queue entries whose listing closed elsewhere are no longer actionable.
        self.flagged.write().retain(|(chain, name), _| {
            chains
                .iter()
                .find(|c| c.chain_id == *chain)
                .and_then(|c| c.marketplace.listing(name).ok().flatten())
                .is_some_and(|listing| listing.active)
        });
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        debug!(
            "[on-04] Sweep: checked {}, consistent {}, deactivated {}, flagged {}",
            report.checked,
            report.consistent,
            report.deactivated.len(),
            report.flagged.len()
        );
        report
    }

    fn reconcile_name(
        &self,
        chain: ChainId,
        name: &str,
    ) -> Result<Option<StaleListing>, ReconciliationError> {
        let watched = self.chain(chain)?;
        let name = watched.registry.normalize(name)?.to_string();
        let Some(stale) = Self::stale_listing(&watched, &name)? else {
            self.unflag(chain, &name);
            return Ok(None);
        };
        if self.act(&watched, &stale)? {
            Ok(Some(stale))
        } else {
            Ok(None)
        }
    }

    fn on_event(&self, event: &NameServiceEvent) -> Option<StaleListing> {
        if !self.config.event_triggered {
            return None;
        }
        let name = event.ownership_change()?;
        let chain = event.chain();
        if !self.chains.read().contains_key(&chain) {
            debug!("[on-04] Ignoring {} on unwatched chain {}", name, chain);
            return None;
        }
        match self.reconcile_name(chain, name) {
            Ok(stale) => stale,
            Err(e) => {
                warn!("[on-04] Reconcile of {} on {} failed: {}", name, chain, e);
                None
            }
        }
    }

    fn flagged(&self) -> Vec<StaleListing> {
        self.flagged.read().values().cloned().collect()
    }

    fn resolve_flagged(&self, chain: ChainId, name: &str) -> Result<bool, ReconciliationError> {
        let watched = self.chain(chain)?;
        let name = watched.registry.normalize(name)?.to_string();
        let stale = self
            .unflag(chain, &name)
            .ok_or_else(|| ReconciliationError::NotFlagged {
                chain,
                name: name.clone(),
            })?;

        let closed = watched.marketplace.deactivate_stale(&name)?;
        if closed {
            info!("[on-04] Resolved flagged listing {} on {}", name, chain);
            self.publish_detected(&stale, true);
        } else {
            info!(
                "[on-04] Flagged listing {} on {} was already consistent",
                name, chain
            );
        }
        Ok(closed)
    }

    fn dismiss_flagged(&self, chain: ChainId, name: &str) -> Result<(), ReconciliationError> {
        let watched = self.chain(chain)?;
        let name = watched.registry.normalize(name)?.to_string();
        if self.unflag(chain, &name).is_none() {
            return Err(ReconciliationError::NotFlagged { chain, name });
        }
        info!("[on-04] Dismissed flagged listing {} on {}", name, chain);
        Ok(())
    }
}
