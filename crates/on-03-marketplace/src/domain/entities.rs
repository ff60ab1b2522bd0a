//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Amount};

/// A listing, keyed by normalised name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Normalised name.
    pub name: String,
    /// Account that listed it.
    pub seller: Address,
    /// Asking price.
    pub price: Amount,
    /// Open for purchase.
    pub active: bool,
}

/// Breakdown of an executed sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    /// Normalised name.
    pub name: String,
    /// Previous owner.
    pub seller: Address,
    /// New owner.
    pub buyer: Address,
    /// Asking price.
    pub price: Amount,
    /// Credited to the seller.
    pub seller_proceeds: Amount,
    /// Kept by the marketplace.
    pub marketplace_cut: Amount,
    /// Overpayment credited back to the buyer.
    pub refund: Amount,
}
