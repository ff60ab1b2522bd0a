//! # Domain Invariants
//!
//! Checks performed before the burn and on every inbound delivery.

use super::errors::TransferError;
use crate::config::CrossChainConfig;
use shared_types::{Address, Amount, ChainId};

/// Invariant: the target is a configured peer other than this chain.
pub fn invariant_routable_target(
    config: &CrossChainConfig,
    target: ChainId,
) -> Result<Address, TransferError> {
    if target == config.chain_id {
        return Err(TransferError::SameChain(target));
    }
    config
        .peer(target)
        .ok_or(TransferError::UnsupportedChain(target))
}

/// Invariant: attached value covers destination execution.
///
/// Returns the excess to refund.
pub fn invariant_gas_covered(required: Amount, provided: Amount) -> Result<Amount, TransferError> {
    provided
        .checked_sub(required)
        .ok_or(TransferError::InsufficientGasPayment { required, provided })
}

/// Invariant: inbound calls come from the peer contract of their source chain.
pub fn invariant_trusted_sender(
    config: &CrossChainConfig,
    source: ChainId,
    sender: Address,
) -> Result<(), TransferError> {
    match config.peer(source) {
        Some(peer) if peer == sender && source != config.chain_id => Ok(()),
        _ => Err(TransferError::UnauthorizedSender {
            chain: source,
            sender,
        }),
    }
}
