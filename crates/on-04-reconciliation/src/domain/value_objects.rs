//! # Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the watcher does when a listing's seller no longer owns the name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconciliationPolicy {
    /// Close the listing through the marketplace's sync call.
    #[default]
    AutoDeactivate,
    /// Queue it for an operator to resolve or dismiss.
    FlagForReview,
}

impl ReconciliationPolicy {
    /// Whether a stale listing is closed without operator input.
    #[must_use]
    pub fn is_automatic(&self) -> bool {
        matches!(self, Self::AutoDeactivate)
    }
}

impl fmt::Display for ReconciliationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AutoDeactivate => write!(f, "auto-deactivate"),
            Self::FlagForReview => write!(f, "flag-for-review"),
        }
    }
}

impl FromStr for ReconciliationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "auto-deactivate" | "autodeactivate" => Ok(Self::AutoDeactivate),
            "flag" | "flag-for-review" | "flagforreview" | "manual" => Ok(Self::FlagForReview),
            other => Err(format!("unknown reconciliation policy '{other}'")),
        }
    }
}
