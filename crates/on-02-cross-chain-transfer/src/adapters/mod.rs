//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the gateway port for in-process multi-chain deployments.

mod memory_gateway;

pub use memory_gateway::{DeliveryOutcome, DeliveryResult, InMemoryGateway};
