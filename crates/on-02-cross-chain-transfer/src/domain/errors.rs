//! # Domain Errors
//!
//! Error types for the Cross-Chain Transfer Protocol.

use super::value_objects::{MessageId, TransferId};
use on_01_domain_registry::RegistryError;
use shared_types::{Address, Amount, ChainId};
use thiserror::Error;

/// Cross-chain transfer error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// Rejected by the local registry (not omnichain, not owner, expired...).
    #[error("Registry rejected transfer: {0}")]
    Registry(#[from] RegistryError),

    /// Target chain is not configured as a peer.
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(ChainId),

    /// Target equals the current chain.
    #[error("Target chain {0} is the current chain")]
    SameChain(ChainId),

    /// Destination owner is the zero sentinel.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(Address),

    /// Attached value does not cover destination execution.
    #[error("Insufficient gas payment: required {required}, provided {provided}")]
    InsufficientGasPayment {
        /// Destination gas fee.
        required: Amount,
        /// Attached value.
        provided: Amount,
    },

    /// The handler already ran for this transfer.
    #[error("Duplicate execution of transfer {0}")]
    DuplicateExecution(TransferId),

    /// No transfer with this identifier (or message) is known.
    #[error("Unknown transfer: {0}")]
    UnknownTransfer(String),

    /// Invalid state transition.
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted state.
        to: String,
    },

    /// Payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Message was abandoned by the gateway.
    #[error("Delivery aborted for {message_id}: {reason}")]
    DeliveryAbort {
        /// Gateway message.
        message_id: MessageId,
        /// Why delivery stopped.
        reason: String,
    },

    /// A protocol invariant was breached upstream.
    #[error("Consistency fault on transfer {transfer_id}: {detail}")]
    ConsistencyFault {
        /// Transfer.
        transfer_id: TransferId,
        /// What was found.
        detail: String,
    },

    /// Gateway refused or failed the request.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// Inbound message did not come from a known peer contract.
    #[error("Unauthorized sender {sender} on {chain}")]
    UnauthorizedSender {
        /// Claimed source chain.
        chain: ChainId,
        /// Claimed sender.
        sender: Address,
    },
}

impl TransferError {
    /// Faults that indicate an invariant breach rather than a routine rejection.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(
            self,
            Self::ConsistencyFault { .. } | Self::DuplicateExecution(_)
        )
    }
}
