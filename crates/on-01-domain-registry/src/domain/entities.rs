//! # Domain Entities
//!
//! The authoritative per-chain record and the snapshot that carries it
//! across chains.

use super::value_objects::{DomainName, RecordStatus};
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId, Timestamp};

/// A name record on one chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Normalised name (unique key).
    pub name: DomainName,
    /// Owner; zero when departed or reclaimed.
    pub owner: Address,
    /// Absolute expiry timestamp.
    pub expires_at: Timestamp,
    /// When this chain's copy was created.
    pub registered_at: Timestamp,
    /// Chain on which the name was originally minted.
    pub source_chain_id: ChainId,
    /// Eligible for cross-chain transfer.
    pub is_omnichain: bool,
    /// Set while the name has left this chain through an outbound transfer.
    pub departed_to: Option<ChainId>,
}

impl DomainRecord {
    /// Check if the record is past its expiry.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Non-zero owner and not expired.
    pub fn is_live(&self, now: Timestamp) -> bool {
        !self.owner.is_zero() && !self.is_expired(now)
    }

    /// Owner cleared by an outbound transfer that has not been restored.
    ///
    /// Expiry does not end departure: the live copy elsewhere keeps its own
    /// clock and may have been renewed.
    pub fn is_departed(&self) -> bool {
        self.owner.is_zero() && self.departed_to.is_some()
    }

    /// Status at `now`.
    pub fn status(&self, now: Timestamp) -> RecordStatus {
        match self.departed_to {
            Some(target) if self.owner.is_zero() => RecordStatus::Departed(target),
            _ if self.is_expired(now) => RecordStatus::Expired,
            _ if self.owner.is_zero() => RecordStatus::Unregistered,
            _ => RecordStatus::Live,
        }
    }

    /// Owner if live, otherwise the zero sentinel.
    pub fn live_owner(&self, now: Timestamp) -> Address {
        if self.is_live(now) {
            self.owner
        } else {
            Address::ZERO
        }
    }

    /// Read projection at `now`.
    pub fn info(&self, now: Timestamp) -> DomainInfo {
        DomainInfo {
            owner: self.live_owner(now),
            expires_at: self.expires_at,
            source_chain_id: self.source_chain_id,
            is_omnichain: self.is_omnichain,
            is_expired: self.is_expired(now),
        }
    }
}

/// Read projection returned by `get_domain_info`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    /// Live owner or zero.
    pub owner: Address,
    /// Expiry timestamp (0 if unregistered).
    pub expires_at: Timestamp,
    /// Original mint chain (0 if unregistered).
    pub source_chain_id: ChainId,
    /// Omnichain flag.
    pub is_omnichain: bool,
    /// Computed against the reading chain's clock.
    pub is_expired: bool,
}

impl DomainInfo {
    /// Projection for a name with no record.
    pub fn unregistered() -> Self {
        Self {
            owner: Address::ZERO,
            expires_at: 0,
            source_chain_id: ChainId(0),
            is_omnichain: false,
            is_expired: true,
        }
    }

    /// Non-zero owner and not expired.
    pub fn is_live(&self) -> bool {
        !self.owner.is_zero() && !self.is_expired
    }
}

/// Everything needed to recreate a burned record on another chain, or to
/// restore it on the source chain if the transfer fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSnapshot {
    /// Normalised name.
    pub name: DomainName,
    /// Owner at burn time (restored on revert/abort).
    pub from: Address,
    /// Destination owner.
    pub to: Address,
    /// Expiry carried over unchanged.
    pub expires_at: Timestamp,
    /// Original mint chain, preserved for provenance.
    pub source_chain_id: ChainId,
    /// Always true for a transferable record.
    pub is_omnichain: bool,
    /// Chain the name was burned on.
    pub burned_on: ChainId,
    /// Chain the name is travelling to.
    pub target_chain_id: ChainId,
}
