//! # Name-Service Events
//!
//! Every event that flows through the shared bus. Transfer identifiers are
//! carried as raw hashes so the bus does not depend on the transfer crate.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, ChainId, Hash, Timestamp};

/// All events that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameServiceEvent {
    // =========================================================================
    // DOMAIN REGISTRY (on-01)
    // =========================================================================
    /// A name was registered locally.
    DomainRegistered {
        /// Chain holding the record.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// New owner.
        owner: Address,
        /// Expiry timestamp.
        expires_at: Timestamp,
        /// Whether the name is eligible for cross-chain transfer.
        omnichain: bool,
    },

    /// Expiry was extended.
    DomainRenewed {
        /// Chain holding the record.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// New expiry timestamp.
        expires_at: Timestamp,
    },

    /// A name was upgraded to omnichain.
    DomainUpgraded {
        /// Chain holding the record.
        chain: ChainId,
        /// Normalised name.
        name: String,
    },

    /// Ownership moved on the same chain (direct or via marketplace).
    DomainTransferred {
        /// Chain holding the record.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// Previous owner.
        from: Address,
        /// New owner.
        to: Address,
    },

    /// An expired record was reclaimed.
    DomainReclaimed {
        /// Chain holding the record.
        chain: ChainId,
        /// Normalised name.
        name: String,
    },

    /// Owner cleared for an outbound transfer; a tombstone remains.
    DomainBurned {
        /// Chain the name left.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// Owner before the burn.
        from: Address,
        /// Chain the name is travelling to.
        target_chain: ChainId,
    },

    /// A record was created from an inbound transfer.
    DomainMinted {
        /// Chain now holding the record.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// New owner.
        owner: Address,
        /// Original mint chain.
        source_chain_id: ChainId,
    },

    /// A burned record was given back to its owner after a failed transfer.
    DomainRestored {
        /// Chain holding the record.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// Restored owner.
        owner: Address,
    },

    // =========================================================================
    // CROSS-CHAIN TRANSFER (on-02)
    // =========================================================================
    /// Source-side burn succeeded and the message was dispatched.
    TransferInitiated {
        /// Transfer identifier.
        transfer_id: Hash,
        /// Normalised name.
        name: String,
        /// Source chain.
        source_chain: ChainId,
        /// Destination chain.
        target_chain: ChainId,
        /// Owner before the burn.
        from: Address,
        /// Destination owner.
        to: Address,
    },

    /// Destination mint succeeded.
    TransferCommitted {
        /// Transfer identifier.
        transfer_id: Hash,
        /// Normalised name.
        name: String,
        /// Chain that now holds the live record.
        chain: ChainId,
        /// Owner on that chain.
        owner: Address,
    },

    /// Destination rejected the message; the record was restored on source.
    TransferReverted {
        /// Transfer identifier.
        transfer_id: Hash,
        /// Normalised name.
        name: String,
        /// Source chain where the record was restored.
        chain: ChainId,
        /// Restored owner.
        owner: Address,
    },

    /// Message could not be delivered; the abort handler restored the record.
    TransferAborted {
        /// Transfer identifier.
        transfer_id: Hash,
        /// Normalised name.
        name: String,
        /// Source chain where the record was restored.
        chain: ChainId,
        /// Restored owner.
        owner: Address,
    },

    // =========================================================================
    // MARKETPLACE (on-03)
    // =========================================================================
    /// A listing was created or overwritten.
    ListingCreated {
        /// Chain of the marketplace.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// Seller.
        seller: Address,
        /// Asking price.
        price: Amount,
    },

    /// A listing was deactivated.
    ListingClosed {
        /// Chain of the marketplace.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// Why it closed.
        reason: ListingCloseReason,
    },

    /// A sale executed.
    DomainSold {
        /// Chain of the marketplace.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// Seller.
        seller: Address,
        /// Buyer.
        buyer: Address,
        /// Sale price.
        price: Amount,
    },

    // =========================================================================
    // RECONCILIATION (on-04)
    // =========================================================================
    /// A listing whose seller no longer owns the name was found.
    StaleListingDetected {
        /// Chain of the marketplace.
        chain: ChainId,
        /// Normalised name.
        name: String,
        /// Recorded seller.
        seller: Address,
        /// Current registry owner (zero if none).
        owner: Address,
        /// True if the watcher closed it, false if only flagged.
        deactivated: bool,
    },

    // =========================================================================
    // CRITICAL EVENTS (DLQ)
    // =========================================================================
    /// A protocol invariant was breached upstream.
    ConsistencyFault {
        /// Chain that detected it.
        chain: ChainId,
        /// Component tag (e.g. "on-02").
        component: String,
        /// Description.
        detail: String,
    },
}

/// Reason a listing was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingCloseReason {
    /// Seller delisted.
    Delisted,
    /// Sold through the marketplace.
    Sold,
    /// Seller no longer owns the name.
    Stale,
}

impl NameServiceEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::DomainRegistered { .. }
            | Self::DomainRenewed { .. }
            | Self::DomainUpgraded { .. }
            | Self::DomainTransferred { .. }
            | Self::DomainReclaimed { .. }
            | Self::DomainBurned { .. }
            | Self::DomainMinted { .. }
            | Self::DomainRestored { .. } => EventTopic::Registry,
            Self::TransferInitiated { .. }
            | Self::TransferCommitted { .. }
            | Self::TransferReverted { .. }
            | Self::TransferAborted { .. } => EventTopic::CrossChain,
            Self::ListingCreated { .. } | Self::ListingClosed { .. } | Self::DomainSold { .. } => {
                EventTopic::Marketplace
            }
            Self::StaleListingDetected { .. } => EventTopic::Reconciliation,
            Self::ConsistencyFault { .. } => EventTopic::DeadLetterQueue,
        }
    }

    /// Chain the event refers to.
    #[must_use]
    pub fn chain(&self) -> ChainId {
        match self {
            Self::DomainRegistered { chain, .. }
            | Self::DomainRenewed { chain, .. }
            | Self::DomainUpgraded { chain, .. }
            | Self::DomainTransferred { chain, .. }
            | Self::DomainReclaimed { chain, .. }
            | Self::DomainBurned { chain, .. }
            | Self::DomainMinted { chain, .. }
            | Self::DomainRestored { chain, .. }
            | Self::TransferCommitted { chain, .. }
            | Self::TransferReverted { chain, .. }
            | Self::TransferAborted { chain, .. }
            | Self::ListingCreated { chain, .. }
            | Self::ListingClosed { chain, .. }
            | Self::DomainSold { chain, .. }
            | Self::StaleListingDetected { chain, .. }
            | Self::ConsistencyFault { chain, .. } => *chain,
            Self::TransferInitiated { source_chain, .. } => *source_chain,
        }
    }

    /// Name whose ownership changed on [`Self::chain`], if any.
    ///
    /// The reconciliation watcher re-checks listings for these names.
    #[must_use]
    pub fn ownership_change(&self) -> Option<&str> {
        match self {
            Self::DomainTransferred { name, .. }
            | Self::DomainReclaimed { name, .. }
            | Self::DomainBurned { name, .. }
            | Self::DomainMinted { name, .. }
            | Self::DomainRestored { name, .. }
            | Self::TransferInitiated { name, .. }
            | Self::TransferCommitted { name, .. }
            | Self::TransferReverted { name, .. }
            | Self::TransferAborted { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Registry lifecycle.
    Registry,
    /// Cross-chain transfer transitions.
    CrossChain,
    /// Listings and sales.
    Marketplace,
    /// Watcher findings.
    Reconciliation,
    /// Consistency faults.
    DeadLetterQueue,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Chains to include. Empty means all chains.
    pub chains: Vec<ChainId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            chains: Vec::new(),
        }
    }

    /// Restrict to events on the given chains.
    #[must_use]
    pub fn on_chains(mut self, chains: Vec<ChainId>) -> Self {
        self.chains = chains;
        self
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &NameServiceEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let chain_match = self.chains.is_empty() || self.chains.contains(&event.chain());

        topic_match && chain_match
    }
}
