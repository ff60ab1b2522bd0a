//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, ChainId};

/// An active listing whose seller is not the registry owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleListing {
    /// Chain of the marketplace holding the listing.
    pub chain: ChainId,
    /// Normalised name.
    pub name: String,
    /// Seller recorded on the listing.
    pub seller: Address,
    /// Current registry owner, zero if the name is not live on this chain.
    pub owner: Address,
    /// Asking price.
    pub price: Amount,
}

/// Outcome of one sweep.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Active listings examined.
    pub checked: usize,
    /// Listings whose seller still owns the name.
    pub consistent: usize,
    /// Stale listings closed in this sweep.
    pub deactivated: Vec<StaleListing>,
    /// Stale listings queued for review in this sweep.
    pub flagged: Vec<StaleListing>,
    /// Per-listing failures; the sweep continues past them.
    pub errors: Vec<String>,
}

impl ReconciliationReport {
    /// No drift and no failures.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.deactivated.is_empty() && self.flagged.is_empty() && self.errors.is_empty()
    }

    /// Stale listings found, whatever was done about them.
    #[must_use]
    pub fn stale_count(&self) -> usize {
        self.deactivated.len() + self.flagged.len()
    }

    pub(crate) fn merge(&mut self, other: ReconciliationReport) {
        self.checked += other.checked;
        self.consistent += other.consistent;
        self.deactivated.extend(other.deactivated);
        self.flagged.extend(other.flagged);
        self.errors.extend(other.errors);
    }
}
