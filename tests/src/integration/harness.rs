//! # Test Harness
//!
//! Two chains on one gateway, relayed by hand, sharing a manual clock.

use std::sync::Arc;

use node_runtime::{ChainConfig, ChainNode, NodeConfig, NodeRuntime};
use on_01_domain_registry::{invariant_single_live_copy, DomainRegistryApi};
use on_02_cross_chain_transfer::DeliveryOutcome;
use on_04_reconciliation::{ReconciliationPolicy, ReconciliationWatcher};
use shared_types::{Address, ChainId, ManualClock, Timestamp};

/// First chain.
pub const CHAIN_A: ChainId = ChainId(1);
/// Second chain.
pub const CHAIN_B: ChainId = ChainId(2);

/// Test accounts.
pub const ALICE: Address = Address::repeat(0x41);
pub const BOB: Address = Address::repeat(0x42);
pub const CAROL: Address = Address::repeat(0x43);

/// Registry fees.
pub const REGISTRATION_FEE: u64 = 100;
pub const UPGRADE_FEE: u64 = 10;
/// Destination gas.
pub const GAS_FEE: u64 = 5;
/// Marketplace listing fee.
pub const LISTING_FEE: u64 = 10;
/// Registration period.
pub const PERIOD: u64 = 1_000;
/// Clock at start.
pub const GENESIS: Timestamp = 1_000;

fn chain(chain_id: ChainId, index: u8) -> ChainConfig {
    let mut chain = ChainConfig::development(chain_id, index);
    chain.registration_fee = REGISTRATION_FEE;
    chain.renewal_fee = 50;
    chain.omnichain_upgrade_fee = UPGRADE_FEE;
    chain.registration_period_secs = PERIOD;
    chain.destination_gas_fee = GAS_FEE;
    chain.listing_fee = LISTING_FEE;
    chain
}

/// Two-chain network with manual relaying.
pub struct TestNetwork {
    pub runtime: NodeRuntime,
    pub clock: Arc<ManualClock>,
}

impl TestNetwork {
    /// Network with the default watcher policy.
    pub fn new() -> Self {
        Self::with_policy(ReconciliationPolicy::AutoDeactivate)
    }

    /// Network whose watcher applies `policy`.
    pub fn with_policy(policy: ReconciliationPolicy) -> Self {
        let mut config = NodeConfig {
            chains: vec![chain(CHAIN_A, 1), chain(CHAIN_B, 2)],
            ..NodeConfig::default()
        };
        config.relayer.enabled = false;
        config.watcher.policy = policy;

        let clock = Arc::new(ManualClock::new(GENESIS));
        let runtime = NodeRuntime::with_clock(config, clock.clone()).unwrap();
        Self { runtime, clock }
    }

    /// Chain A.
    pub fn a(&self) -> &ChainNode {
        self.runtime.chain(CHAIN_A).unwrap()
    }

    /// Chain B.
    pub fn b(&self) -> &ChainNode {
        self.runtime.chain(CHAIN_B).unwrap()
    }

    /// Watcher covering both chains.
    pub fn watcher(&self) -> Arc<ReconciliationWatcher> {
        self.runtime.watcher()
    }

    /// Deliver everything the gateway holds.
    pub fn relay(&self) -> Vec<DeliveryOutcome> {
        self.runtime.relay_once()
    }

    /// Register `name` on chain A for `owner`.
    pub fn register_on_a(&self, owner: Address, name: &str, omnichain: bool) {
        self.a()
            .registry
            .register(owner, name, omnichain, u128::from(REGISTRATION_FEE))
            .unwrap();
    }

    /// Number of chains holding a live copy of `name`.
    pub fn live_copies(&self, name: &str) -> usize {
        self.runtime
            .chains()
            .filter(|c| {
                let info = c.registry.get_domain_info(name).unwrap();
                !info.owner.is_zero() && !info.is_expired
            })
            .count()
    }

    /// Single-live-copy invariant across both chains.
    pub fn single_live_copy(&self, name: &str) -> bool {
        let views: Vec<_> = self
            .runtime
            .chains()
            .map(|c| (c.chain_id, c.registry.get_domain_info(name).unwrap()))
            .collect();
        invariant_single_live_copy(&views)
    }
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}
