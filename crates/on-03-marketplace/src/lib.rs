//! # ON-03 Marketplace
//!
//! Listing, fee collection and atomic sale execution against the Domain
//! Registry of the same chain.
//!
//! **Component:** 3
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! - `list` charges a non-refundable fee and records `seller`/`price`
//! - `buy` re-checks `owner_of(name) == seller` immediately before moving
//!   the name, so a stale listing can never sell
//! - Proceeds, cut and refund are paid in one ledger batch
//!
//! ## Module Structure
//!
//! ```text
//! on-03-marketplace/
//! ├── domain/          # Listing, SaleReceipt, errors, invariants
//! ├── algorithms/      # Sale split
//! ├── ports/           # MarketplaceApi, OwnershipRegistry
//! ├── application/     # MarketplaceService
//! └── config.rs        # MarketplaceConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use algorithms::split_sale;
pub use application::MarketplaceService;
pub use config::{MarketplaceConfig, BPS_DENOMINATOR, DEFAULT_CUT_BPS};
pub use domain::{
    invariant_fee_covered, invariant_listing_consistent, invariant_price_covered, Listing,
    MarketplaceError, SaleReceipt,
};
pub use ports::{MarketplaceApi, OwnershipRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
