//! # Sale Split
//!
//! Divides a sale price between seller and marketplace. The cut rounds
//! down, so rounding always favours the seller.

use crate::config::BPS_DENOMINATOR;
use shared_types::Amount;

/// Returns `(seller_proceeds, marketplace_cut)`.
pub fn split_sale(price: Amount, cut_bps: u16) -> (Amount, Amount) {
    let bps = Amount::from(cut_bps.min(BPS_DENOMINATOR));
    // price * bps cannot overflow for realistic prices; fall back to
    // dividing first if it would.
    let cut = price
        .checked_mul(bps)
        .map(|v| v / Amount::from(BPS_DENOMINATOR))
        .unwrap_or_else(|| price / Amount::from(BPS_DENOMINATOR) * bps);
    (price - cut, cut)
}
