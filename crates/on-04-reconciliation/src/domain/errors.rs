//! # Domain Errors
//!
//! Error types for the Reconciliation Watcher.

use on_01_domain_registry::RegistryError;
use on_03_marketplace::MarketplaceError;
use shared_types::ChainId;
use thiserror::Error;

/// Reconciliation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconciliationError {
    /// Chain is not being watched.
    #[error("Chain not watched: {0}")]
    UnknownChain(ChainId),

    /// No flagged listing for this name.
    #[error("No flagged listing for {name} on {chain}")]
    NotFlagged {
        /// Chain.
        chain: ChainId,
        /// Normalised name.
        name: String,
    },

    /// Marketplace call failed.
    #[error("Marketplace error: {0}")]
    Marketplace(#[from] MarketplaceError),

    /// Registry read failed.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}
