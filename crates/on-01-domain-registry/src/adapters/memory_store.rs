//! In-memory `DomainStore`.

use crate::domain::{DomainName, DomainRecord};
use crate::ports::outbound::DomainStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// In-memory record store, ordered by name.
#[derive(Default)]
pub struct InMemoryDomainStore {
    records: RwLock<BTreeMap<DomainName, DomainRecord>>,
}

impl InMemoryDomainStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainStore for InMemoryDomainStore {
    fn get(&self, name: &DomainName) -> Option<DomainRecord> {
        self.records.read().get(name).cloned()
    }

    fn put(&self, record: DomainRecord) {
        self.records.write().insert(record.name.clone(), record);
    }

    fn remove(&self, name: &DomainName) -> Option<DomainRecord> {
        self.records.write().remove(name)
    }

    fn names(&self) -> Vec<DomainName> {
        self.records.read().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.records.read().len()
    }
}
