//! # Outbound Ports
//!
//! Storage dependency of the registry.

use crate::domain::{DomainName, DomainRecord};

/// Authoritative keyed store of records for one chain.
///
/// All mutation is funnelled through `DomainRegistryService`; nothing else
/// holds a writable handle.
pub trait DomainStore: Send + Sync {
    /// Get a record.
    fn get(&self, name: &DomainName) -> Option<DomainRecord>;

    /// Insert or replace a record.
    fn put(&self, record: DomainRecord);

    /// Remove a record.
    fn remove(&self, name: &DomainName) -> Option<DomainRecord>;

    /// All stored names.
    fn names(&self) -> Vec<DomainName>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// True if empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
