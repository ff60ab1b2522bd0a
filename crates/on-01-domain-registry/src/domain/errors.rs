//! # Domain Errors
//!
//! Error types for the Domain Registry.

use shared_types::{Address, Amount, ChainId, LedgerError};
use thiserror::Error;

/// Registry error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Name failed normalisation.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        /// Raw input.
        name: String,
        /// What was wrong.
        reason: String,
    },

    /// A live record already exists.
    #[error("Name already registered: {0}")]
    AlreadyRegistered(String),

    /// No record for this name.
    #[error("Name not found: {0}")]
    NotFound(String),

    /// Caller is not the recorded owner (or the linked marketplace).
    #[error("Not owner of {name}: caller {caller}")]
    NotOwner {
        /// Name.
        name: String,
        /// Rejected caller.
        caller: Address,
    },

    /// Record is past its expiry.
    #[error("Name expired: {0}")]
    Expired(String),

    /// Name was never upgraded to omnichain.
    #[error("Name is not omnichain: {0}")]
    NotOmnichain(String),

    /// Name is already omnichain.
    #[error("Name is already omnichain: {0}")]
    AlreadyOmnichain(String),

    /// Attached payment is below the fee.
    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        /// Fee.
        required: Amount,
        /// Attached value.
        provided: Amount,
    },

    /// Caller lacks the admin or transfer-agent capability.
    #[error("Unauthorized caller: {0}")]
    Unauthorized(Address),

    /// Zero sentinel used where a real account is required.
    #[error("Zero address is not a valid owner")]
    ZeroAddress,

    /// Restore requested but the name is not departed to the expected chain.
    #[error("No outbound transfer of {name} to {target} to restore")]
    NotDeparted {
        /// Name.
        name: String,
        /// Chain the snapshot says it left for.
        target: ChainId,
    },

    /// Snapshot addressed to a different chain.
    #[error("Snapshot for {got} delivered to {expected}")]
    WrongChain {
        /// This registry's chain.
        expected: ChainId,
        /// Chain named in the snapshot.
        got: ChainId,
    },

    /// Payout failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
