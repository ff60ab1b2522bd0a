//! # Outbound Ports
//!
//! The watcher reads a chain through its registry and marketplace APIs.
//! It only ever writes through `MarketplaceApi::deactivate_stale`.

use on_01_domain_registry::DomainRegistryApi;
use on_03_marketplace::MarketplaceApi;
use shared_types::ChainId;
use std::fmt;
use std::sync::Arc;

/// One chain's registry and marketplace, as seen by the watcher.
#[derive(Clone)]
pub struct WatchedChain {
    /// Chain id.
    pub chain_id: ChainId,
    /// Source of truth for ownership.
    pub registry: Arc<dyn DomainRegistryApi>,
    /// Listings to keep in line with the registry.
    pub marketplace: Arc<dyn MarketplaceApi>,
}

impl WatchedChain {
    /// Bundle a registry and marketplace. Both must live on the same chain.
    pub fn new(
        registry: Arc<dyn DomainRegistryApi>,
        marketplace: Arc<dyn MarketplaceApi>,
    ) -> Self {
        Self {
            chain_id: registry.chain_id(),
            registry,
            marketplace,
        }
    }
}

impl fmt::Debug for WatchedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchedChain")
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
