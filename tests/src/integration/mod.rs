//! # Integration Tests
//!
//! End-to-end flows across registry, transfer contract, gateway,
//! marketplace and watcher, built on the node runtime.

pub mod harness;

mod cross_chain_flows;
mod marketplace_consistency;
