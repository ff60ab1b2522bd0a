//! # Watcher Configuration

use crate::domain::ReconciliationPolicy;
use serde::{Deserialize, Serialize};

/// Default period between full sweeps.
pub const DEFAULT_WATCH_INTERVAL_SECS: u64 = 60;

/// Reconciliation watcher configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// What to do with a stale listing.
    pub policy: ReconciliationPolicy,
    /// Seconds between full sweeps of every watched chain.
    pub interval_secs: u64,
    /// Re-check a name as soon as an ownership-changing event is seen.
    pub event_triggered: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            policy: ReconciliationPolicy::AutoDeactivate,
            interval_secs: DEFAULT_WATCH_INTERVAL_SECS,
            event_triggered: true,
        }
    }
}

impl WatcherConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            policy: ReconciliationPolicy::AutoDeactivate,
            interval_secs: 1,
            event_triggered: true,
        }
    }

    /// Same config with a different policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReconciliationPolicy) -> Self {
        self.policy = policy;
        self
    }
}
