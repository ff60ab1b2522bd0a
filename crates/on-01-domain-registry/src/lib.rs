//! # ON-01 Domain Registry
//!
//! Authoritative per-chain store of name records.
//!
//! **Component:** 1
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Each chain runs one registry. It decides who owns a name on that chain:
//! - Registration, renewal and omnichain upgrade against native-coin fees
//! - Local ownership moves by the owner or the linked marketplace
//! - Burn, mint and restore hooks reserved for the cross-chain transfer agent
//!
//! ## Ownership Rules
//!
//! | Rule | Enforcement |
//! |------|-------------|
//! | One live record per name per chain | `invariant_available` |
//! | Inbound mint never overwrites a live record | `invariant_mint_target_vacant` |
//! | Departed names stay reserved until expiry | tombstone with `departed_to` |
//! | Expiry is strict | `now > expires_at` |
//!
//! ## Module Structure
//!
//! ```text
//! on-01-domain-registry/
//! ├── domain/          # DomainName, DomainRecord, TransferSnapshot, errors
//! ├── ports/           # DomainRegistryApi, TransferHooks, DomainStore
//! ├── adapters/        # InMemoryDomainStore
//! ├── application/     # DomainRegistryService
//! └── config.rs        # RegistryConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::InMemoryDomainStore;
pub use application::DomainRegistryService;
pub use config::{RegistryConfig, MAX_NAME_LEN, SECONDS_PER_YEAR};
pub use domain::{
    invariant_available, invariant_mint_target_vacant, invariant_owner,
    invariant_payment_covers, invariant_single_live_copy, DomainInfo, DomainName, DomainRecord,
    RecordStatus, RegistryError, TransferSnapshot,
};
pub use ports::{DomainRegistryApi, DomainStore, TransferHooks};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
