//! # Omni-Name Test Suite
//!
//! Unified test crate for flows that span several components.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs                # Two-chain network on a manual clock
//!     ├── cross_chain_flows.rs      # Registry + transfer + gateway
//!     └── marketplace_consistency.rs# Marketplace + watcher under drift
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p on-tests
//!
//! # By category
//! cargo test -p on-tests integration::cross_chain_flows
//! cargo test -p on-tests integration::marketplace_consistency
//! ```

#![allow(dead_code)]

pub mod integration;
