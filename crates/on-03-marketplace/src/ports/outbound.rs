//! # Outbound Ports
//!
//! The marketplace reads ownership from, and moves it through, the registry
//! of its own chain. It never caches owners.

use on_01_domain_registry::{DomainInfo, DomainName, DomainRegistryApi, RegistryError};
use shared_types::{Address, ChainId};

/// Registry operations the marketplace depends on.
pub trait OwnershipRegistry: Send + Sync {
    /// Chain of the registry.
    fn chain_id(&self) -> ChainId;

    /// Canonical name.
    fn normalize(&self, name: &str) -> Result<DomainName, RegistryError>;

    /// Live owner or zero.
    fn owner_of(&self, name: &str) -> Result<Address, RegistryError>;

    /// Combined read.
    fn get_domain_info(&self, name: &str) -> Result<DomainInfo, RegistryError>;

    /// Move ownership with the marketplace as operator.
    fn transfer_local(&self, operator: Address, name: &str, to: Address)
        -> Result<(), RegistryError>;
}

impl<T: DomainRegistryApi + ?Sized> OwnershipRegistry for T {
    fn chain_id(&self) -> ChainId {
        DomainRegistryApi::chain_id(self)
    }

    fn normalize(&self, name: &str) -> Result<DomainName, RegistryError> {
        DomainRegistryApi::normalize(self, name)
    }

    fn owner_of(&self, name: &str) -> Result<Address, RegistryError> {
        DomainRegistryApi::owner_of(self, name)
    }

    fn get_domain_info(&self, name: &str) -> Result<DomainInfo, RegistryError> {
        DomainRegistryApi::get_domain_info(self, name)
    }

    fn transfer_local(
        &self,
        operator: Address,
        name: &str,
        to: Address,
    ) -> Result<(), RegistryError> {
        DomainRegistryApi::transfer_local(self, operator, name, to)
    }
}
