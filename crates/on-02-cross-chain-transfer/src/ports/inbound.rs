//! # Inbound Ports
//!
//! API exposed by the transfer contract.

use crate::domain::{TransferError, TransferId, TransferRecord, TransferState};
use async_trait::async_trait;
use shared_types::{Address, Amount, ChainId};

/// Cross-chain transfer API.
#[async_trait]
pub trait CrossChainTransferApi: Send + Sync {
    /// Burn `name` here and dispatch it to `target_chain` for `to`.
    ///
    /// Returns once the message is queued; the outcome arrives later.
    async fn cross_chain_transfer(
        &self,
        caller: Address,
        name: &str,
        to: Address,
        target_chain: ChainId,
        payment: Amount,
    ) -> Result<TransferRecord, TransferError>;

    /// State of a transfer known to this chain.
    fn transfer_status(&self, id: &TransferId) -> Option<TransferState>;

    /// Full record of a transfer known to this chain.
    fn transfer(&self, id: &TransferId) -> Option<TransferRecord>;

    /// Outbound transfers still waiting for a resolution.
    fn pending_transfers(&self) -> Vec<TransferRecord>;

    /// Chains names may travel to.
    fn supported_chains(&self) -> Vec<ChainId>;
}
