//! # Marketplace Configuration

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount};

/// Basis-point denominator.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Default marketplace cut (2.5%).
pub const DEFAULT_CUT_BPS: u16 = 250;

/// Marketplace configuration for one chain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketplaceConfig {
    /// Marketplace account; linked in the registry as its operator.
    pub address: Address,
    /// Treasury owner allowed to withdraw.
    pub owner: Address,
    /// Non-refundable fee for each `list`.
    pub listing_fee: Amount,
    /// Share of each sale kept by the marketplace, in basis points.
    pub marketplace_cut_bps: u16,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            address: Address::ZERO,
            owner: Address::ZERO,
            listing_fee: 1_000_000_000_000_000, // 0.001 native
            marketplace_cut_bps: DEFAULT_CUT_BPS,
        }
    }
}

impl MarketplaceConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            address: Address::repeat(0x11),
            owner: Address::repeat(0x0E),
            listing_fee: 10,
            marketplace_cut_bps: DEFAULT_CUT_BPS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cut() {
        assert_eq!(MarketplaceConfig::default().marketplace_cut_bps, 250);
    }
}
