//! # Node Runtime Library
//!
//! Builds a multi-chain Omni-Name deployment in one process. The main entry
//! point is the `omniname-node` binary; the library is exposed for the
//! integration tests.
//!
//! ## Architectural Patterns
//!
//! - **EDA (Event-Driven Architecture)**: components report through the shared event bus
//! - **Hexagonal Architecture**: chains are wired through the component ports only
//! - **One gateway, N chains**: every transfer contract peers with every other

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod config;
pub mod runtime;

// Re-exports
pub use chain::ChainNode;
pub use config::{ChainConfig, ConfigError, NodeConfig, RelayerConfig};
pub use runtime::NodeRuntime;
