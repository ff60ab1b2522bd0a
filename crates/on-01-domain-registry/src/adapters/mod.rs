//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements outbound port traits for the registry.

mod memory_store;

pub use memory_store::InMemoryDomainStore;
