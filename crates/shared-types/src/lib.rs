//! # Shared Types Crate
//!
//! Primitive identifiers and per-chain ports shared by the registry, the
//! cross-chain transfer protocol, the marketplace and the reconciliation
//! watcher.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: account and chain identifiers are defined once.
//! - **Fixed-width accounts**: `Address` is compared byte-for-byte; textual
//!   forms are parsed case-insensitively and never compared as strings.
//! - **Explicit time**: every chain reads time through its own [`Clock`], so
//!   chains with no shared clock can be simulated side by side.

pub mod clock;
pub mod entities;
pub mod errors;
pub mod ledger;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entities::*;
pub use errors::*;
pub use ledger::{InMemoryLedger, NativeLedger};
