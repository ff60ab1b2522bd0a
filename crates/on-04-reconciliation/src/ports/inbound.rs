//! # Inbound Ports
//!
//! API exposed by the watcher to the runtime and operators.

use crate::domain::{ReconciliationError, ReconciliationPolicy, ReconciliationReport, StaleListing};
use shared_bus::NameServiceEvent;
use shared_types::ChainId;

/// Reconciliation API.
pub trait ReconciliationApi: Send + Sync {
    /// Policy applied to stale listings.
    fn policy(&self) -> ReconciliationPolicy;

    /// Diff every active listing on every watched chain against its registry.
    fn run_once(&self) -> ReconciliationReport;

    /// Check one name on one chain. Returns the stale listing if drift was found.
    fn reconcile_name(
        &self,
        chain: ChainId,
        name: &str,
    ) -> Result<Option<StaleListing>, ReconciliationError>;

    /// React to a bus event. Only ownership-changing events trigger a check.
    fn on_event(&self, event: &NameServiceEvent) -> Option<StaleListing>;

    /// Listings waiting for an operator, ordered by chain then name.
    fn flagged(&self) -> Vec<StaleListing>;

    /// Close a flagged listing if it is still stale and drop it from the queue.
    /// Returns true if the listing was closed.
    fn resolve_flagged(&self, chain: ChainId, name: &str) -> Result<bool, ReconciliationError>;

    /// Drop a flagged listing from the queue without touching the marketplace.
    fn dismiss_flagged(&self, chain: ChainId, name: &str) -> Result<(), ReconciliationError>;
}
