//! # Domain Errors
//!
//! Error types for the Marketplace.

use on_01_domain_registry::RegistryError;
use shared_types::{Address, Amount, LedgerError};
use thiserror::Error;

/// Marketplace error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketplaceError {
    /// Caller is not the registry owner of the name.
    #[error("Not owner of {name}: caller {caller}")]
    NotOwner {
        /// Name.
        name: String,
        /// Rejected caller.
        caller: Address,
    },

    /// Caller is not the listing's seller.
    #[error("Not seller of {name}: caller {caller}")]
    NotSeller {
        /// Name.
        name: String,
        /// Rejected caller.
        caller: Address,
    },

    /// Name is past its expiry.
    #[error("Name expired: {0}")]
    Expired(String),

    /// Listing fee not covered.
    #[error("Insufficient listing fee: required {required}, provided {provided}")]
    InsufficientFee {
        /// Listing fee.
        required: Amount,
        /// Attached value.
        provided: Amount,
    },

    /// No active listing for the name.
    #[error("No active listing for {0}")]
    NoActiveListing(String),

    /// Payment below the asking price.
    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        /// Asking price.
        required: Amount,
        /// Attached value.
        provided: Amount,
    },

    /// Seller no longer owns the name.
    #[error("Stale listing for {name}: seller {seller}, owner {owner}")]
    StaleOwnership {
        /// Name.
        name: String,
        /// Recorded seller.
        seller: Address,
        /// Current registry owner.
        owner: Address,
    },

    /// Caller is not the treasury owner.
    #[error("Not marketplace owner: {0}")]
    NotMarketplaceOwner(Address),

    /// Price must be positive.
    #[error("Invalid price: {0}")]
    InvalidPrice(Amount),

    /// Registry rejected the call.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Payout failed.
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}
