//! # ON-04 Ownership Reconciliation Watcher
//!
//! Off-chain process that keeps marketplace listings honest.
//!
//! **Component:** 4
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A listing is only valid while its seller owns the name. Local transfers,
//! cross-chain burns, inbound mints, restores and reclaims all change
//! ownership without the marketplace hearing about it. The watcher:
//! - Sweeps every active listing on every watched chain on an interval
//! - Re-checks single names as ownership-changing events arrive
//! - Closes stale listings, or queues them for an operator
//!
//! ## Policies
//!
//! | Policy | Stale listing | Event |
//! |--------|---------------|-------|
//! | `AutoDeactivate` (default) | closed via `deactivate_stale` | `StaleListingDetected { deactivated: true }` |
//! | `FlagForReview` | queued; `resolve_flagged` / `dismiss_flagged` | `StaleListingDetected { deactivated: false }` |
//!
//! ## Module Structure
//!
//! ```text
//! on-04-reconciliation/
//! ├── domain/          # ReconciliationPolicy, StaleListing, ReconciliationReport, errors
//! ├── ports/           # ReconciliationApi, WatchedChain
//! ├── application/     # ReconciliationWatcher (sweep + run loop)
//! └── config.rs        # WatcherConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::ReconciliationWatcher;
pub use config::{WatcherConfig, DEFAULT_WATCH_INTERVAL_SECS};
pub use domain::{ReconciliationError, ReconciliationPolicy, ReconciliationReport, StaleListing};
pub use ports::{ReconciliationApi, WatchedChain};

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
