//! # Cross-Chain Configuration

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, ChainId};

/// Default gas limit for the source-side revert handler.
pub const DEFAULT_ON_REVERT_GAS_LIMIT: u64 = 500_000;

/// A chain this contract may exchange names with, and the transfer
/// contract deployed there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerChain {
    /// Chain identifier.
    pub chain_id: ChainId,
    /// Transfer contract on that chain.
    pub contract_address: Address,
}

/// Cross-chain transfer configuration for one chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrossChainConfig {
    /// Chain this contract lives on.
    pub chain_id: ChainId,
    /// Address of this transfer contract. Also the registry's transfer agent
    /// and the revert/abort address of every outbound message.
    pub contract_address: Address,
    /// Chains names may travel to or arrive from.
    pub supported_chains: Vec<PeerChain>,
    /// Minimum value attached to `cross_chain_transfer` to pay for
    /// destination execution.
    pub destination_gas_fee: Amount,
    /// Gas limit forwarded for the revert handler.
    pub on_revert_gas_limit: u64,
}

impl Default for CrossChainConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId(7001),
            contract_address: Address::ZERO,
            supported_chains: Vec::new(),
            destination_gas_fee: 10_000_000_000_000_000, // 0.01 native
            on_revert_gas_limit: DEFAULT_ON_REVERT_GAS_LIMIT,
        }
    }
}

impl CrossChainConfig {
    /// Create a config for testing.
    pub fn for_testing(chain_id: ChainId, contract_address: Address) -> Self {
        Self {
            chain_id,
            contract_address,
            supported_chains: Vec::new(),
            destination_gas_fee: 5,
            on_revert_gas_limit: DEFAULT_ON_REVERT_GAS_LIMIT,
        }
    }

    /// Add a peer.
    pub fn with_peer(mut self, chain_id: ChainId, contract_address: Address) -> Self {
        self.supported_chains.push(PeerChain {
            chain_id,
            contract_address,
        });
        self
    }

    /// Transfer contract on `chain`, if supported.
    pub fn peer(&self, chain: ChainId) -> Option<Address> {
        self.supported_chains
            .iter()
            .find(|p| p.chain_id == chain)
            .map(|p| p.contract_address)
    }

    /// Supported chain identifiers.
    pub fn chain_ids(&self) -> Vec<ChainId> {
        self.supported_chains.iter().map(|p| p.chain_id).collect()
    }
}
