//! # Registry Configuration

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount, ChainId};

/// Seconds in a 365-day registration year.
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Maximum name length (DNS label limit).
pub const MAX_NAME_LEN: usize = 253;

/// Domain registry configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Chain this registry lives on.
    pub chain_id: ChainId,
    /// Account allowed to link the marketplace, name the transfer agent and
    /// sweep fees.
    pub admin: Address,
    /// Suffix stripped during normalisation (without the dot).
    pub tld: String,
    /// Maximum normalised length.
    pub max_name_len: usize,
    /// Fee for a new registration.
    pub registration_fee: Amount,
    /// Fee for one renewal period.
    pub renewal_fee: Amount,
    /// Fee for upgrading an existing name to omnichain.
    pub omnichain_upgrade_fee: Amount,
    /// Length of one registration or renewal period.
    pub registration_period_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId(7001),
            admin: Address::ZERO,
            tld: "omni".to_string(),
            max_name_len: MAX_NAME_LEN,
            registration_fee: 1_000_000_000_000_000, // 0.001 native
            renewal_fee: 1_000_000_000_000_000,
            omnichain_upgrade_fee: 0,
            registration_period_secs: SECONDS_PER_YEAR,
        }
    }
}

impl RegistryConfig {
    /// Create a config for testing (small fees, short period).
    pub fn for_testing() -> Self {
        Self {
            chain_id: ChainId(1),
            admin: Address::repeat(0xAD),
            tld: "omni".to_string(),
            max_name_len: MAX_NAME_LEN,
            registration_fee: 100,
            renewal_fee: 50,
            omnichain_upgrade_fee: 10,
            registration_period_secs: 1_000,
        }
    }

    /// Same testing config on another chain.
    pub fn for_testing_on(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            ..Self::for_testing()
        }
    }
}
