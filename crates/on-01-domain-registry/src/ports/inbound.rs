//! # Inbound Ports
//!
//! What the Domain Registry exposes: the public API and the hooks reserved
//! for the cross-chain transfer protocol.

use crate::domain::{DomainInfo, DomainName, DomainRecord, RegistryError, TransferSnapshot};
use shared_types::{Address, Amount, ChainId, Timestamp};

/// Public registry API.
///
/// Write entry points take the calling account and the value attached to
/// the call. A failed call applies nothing and keeps nothing.
pub trait DomainRegistryApi: Send + Sync {
    /// Chain this registry lives on.
    fn chain_id(&self) -> ChainId;

    /// Canonical form of `name` under this registry's rules.
    fn normalize(&self, name: &str) -> Result<DomainName, RegistryError>;

    /// True iff no record exists or the record has expired.
    fn is_available(&self, name: &str) -> Result<bool, RegistryError>;

    /// Register `name` for the caller.
    fn register(
        &self,
        caller: Address,
        name: &str,
        make_omnichain: bool,
        payment: Amount,
    ) -> Result<DomainRecord, RegistryError>;

    /// Extend expiry by one period. Owner only. Returns the new expiry.
    fn renew(&self, caller: Address, name: &str, payment: Amount)
        -> Result<Timestamp, RegistryError>;

    /// Make an existing name eligible for cross-chain transfer. Owner only.
    fn upgrade_to_omnichain(
        &self,
        caller: Address,
        name: &str,
        payment: Amount,
    ) -> Result<(), RegistryError>;

    /// Live owner or the zero sentinel.
    fn owner_of(&self, name: &str) -> Result<Address, RegistryError>;

    /// Combined read, `is_expired` computed against this chain's clock.
    fn get_domain_info(&self, name: &str) -> Result<DomainInfo, RegistryError>;

    /// Move ownership on this chain. Caller must be the owner or the linked
    /// marketplace.
    fn transfer_local(&self, caller: Address, name: &str, to: Address)
        -> Result<(), RegistryError>;

    /// Clear an expired record. Departed tombstones are never reclaimed.
    /// Returns false if nothing was reclaimed.
    fn reclaim_expired(&self, name: &str) -> Result<bool, RegistryError>;

    /// Link the marketplace account. Admin only.
    fn set_marketplace(&self, caller: Address, marketplace: Address) -> Result<(), RegistryError>;

    /// Name the account allowed to call [`TransferHooks`]. Admin only.
    fn set_transfer_agent(&self, caller: Address, agent: Address) -> Result<(), RegistryError>;

    /// Sweep collected fees to `to`. Admin only. Returns the amount swept.
    fn withdraw_fees(&self, caller: Address, to: Address) -> Result<Amount, RegistryError>;
}

/// Hooks invoked only by the transfer agent.
pub trait TransferHooks: Send + Sync {
    /// Clear the local record for an outbound transfer and return the
    /// snapshot needed to rebuild it elsewhere.
    fn burn_for_outbound_transfer(
        &self,
        agent: Address,
        name: &str,
        expected_owner: Address,
        to: Address,
        target_chain: ChainId,
    ) -> Result<TransferSnapshot, RegistryError>;

    /// Create the record carried by an inbound transfer.
    fn mint_from_inbound_transfer(
        &self,
        agent: Address,
        snapshot: &TransferSnapshot,
    ) -> Result<DomainRecord, RegistryError>;

    /// Undo a burn after the destination rejected or never received it.
    fn restore_after_failed_transfer(
        &self,
        agent: Address,
        snapshot: &TransferSnapshot,
    ) -> Result<DomainRecord, RegistryError>;
}
