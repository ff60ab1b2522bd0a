//! # Chain Node
//!
//! One chain's contracts wired together: registry, transfer contract and
//! marketplace sharing a clock and a ledger.

use std::sync::Arc;

use on_01_domain_registry::{DomainRegistryApi, DomainRegistryService, RegistryError};
use on_02_cross_chain_transfer::{CrossChainTransferService, InMemoryGateway, PeerChain};
use on_03_marketplace::MarketplaceService;
use on_04_reconciliation::WatchedChain;
use shared_bus::EventPublisher;
use shared_types::{ChainId, Clock, InMemoryLedger};
use tracing::info;

use crate::config::ChainConfig;

/// Contracts deployed on one chain.
pub struct ChainNode {
    /// Chain id.
    pub chain_id: ChainId,
    /// Block time source.
    pub clock: Arc<dyn Clock>,
    /// Native balances.
    pub ledger: Arc<InMemoryLedger>,
    /// Domain registry.
    pub registry: Arc<DomainRegistryService>,
    /// Cross-chain transfer contract.
    pub transfer: Arc<CrossChainTransferService>,
    /// Marketplace.
    pub marketplace: Arc<MarketplaceService>,
}

impl ChainNode {
    /// Deploy the contracts, link the transfer agent and marketplace in the
    /// registry and connect the transfer contract to the gateway.
    pub fn deploy(
        config: &ChainConfig,
        peers: Vec<PeerChain>,
        clock: Arc<dyn Clock>,
        gateway: Arc<InMemoryGateway>,
        events: Arc<dyn EventPublisher>,
    ) -> Result<Self, RegistryError> {
        let ledger = Arc::new(InMemoryLedger::new());
        let registry = Arc::new(DomainRegistryService::in_memory(
            config.registry_config(),
            clock.clone(),
            ledger.clone(),
            events.clone(),
        ));
        registry.set_transfer_agent(config.admin, config.transfer_contract)?;
        registry.set_marketplace(config.admin, config.marketplace)?;

        let transfer = Arc::new(CrossChainTransferService::new(
            config.transfer_config(peers),
            registry.clone(),
            gateway.clone(),
            clock.clone(),
            ledger.clone(),
            events.clone(),
        ));
        gateway.connect(config.chain_id, config.transfer_contract, transfer.clone());

        let marketplace = Arc::new(MarketplaceService::new(
            config.marketplace_config(),
            registry.clone(),
            ledger.clone(),
            events,
        ));

        info!(
            "[node] Chain {} deployed (transfer {}, marketplace {})",
            config.chain_id, config.transfer_contract, config.marketplace
        );
        Ok(Self {
            chain_id: config.chain_id,
            clock,
            ledger,
            registry,
            transfer,
            marketplace,
        })
    }

    /// The watcher's view of this chain.
    pub fn watched(&self) -> WatchedChain {
        WatchedChain::new(self.registry.clone(), self.marketplace.clone())
    }
}
