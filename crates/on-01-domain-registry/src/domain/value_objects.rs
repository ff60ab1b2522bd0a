//! # Domain Value Objects
//!
//! Normalised names and record status.

use super::errors::RegistryError;
use serde::{Deserialize, Serialize};
use shared_types::ChainId;
use std::fmt;

/// A normalised domain name: lower-case `[a-z0-9-]`, no TLD suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    /// Normalise `raw`.
    ///
    /// Trims whitespace, lower-cases ASCII and strips one trailing `.<tld>`.
    pub fn parse(raw: &str, tld: &str, max_len: usize) -> Result<Self, RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidName {
            name: raw.to_string(),
            reason: reason.to_string(),
        };

        let lowered = raw.trim().to_ascii_lowercase();
        let suffix = format!(".{}", tld.to_ascii_lowercase());
        let label: &str = if tld.is_empty() {
            lowered.as_str()
        } else {
            lowered.strip_suffix(suffix.as_str()).unwrap_or(lowered.as_str())
        };

        if label.is_empty() {
            return Err(invalid("empty"));
        }
        if label.len() > max_len {
            return Err(invalid("too long"));
        }
        if let Some(bad) = label
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(invalid(&format!("character '{bad}' not allowed")));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("leading or trailing hyphen"));
        }

        Ok(Self(label.to_string()))
    }

    /// Name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a name stands on one chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    /// No record.
    Unregistered,
    /// Owned and not expired.
    Live,
    /// Past expiry, waiting to be re-registered or reclaimed.
    Expired,
    /// Burned by an outbound transfer to the given chain.
    Departed(ChainId),
}

impl RecordStatus {
    /// True only for [`RecordStatus::Live`].
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}
