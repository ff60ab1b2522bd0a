//! # Domain Invariants
//!
//! Business rules for the Marketplace.

use super::entities::Listing;
use super::errors::MarketplaceError;
use shared_types::{Address, Amount};

/// Invariant: an active listing's seller is the current registry owner.
pub fn invariant_listing_consistent(listing: &Listing, owner: Address) -> bool {
    !listing.active || (!owner.is_zero() && listing.seller == owner)
}

/// Invariant: the listing fee is attached. Returns the excess.
pub fn invariant_fee_covered(required: Amount, provided: Amount) -> Result<Amount, MarketplaceError> {
    provided
        .checked_sub(required)
        .ok_or(MarketplaceError::InsufficientFee { required, provided })
}

/// Invariant: the price is paid. Returns the overpayment.
pub fn invariant_price_covered(price: Amount, provided: Amount) -> Result<Amount, MarketplaceError> {
    provided
        .checked_sub(price)
        .ok_or(MarketplaceError::InsufficientPayment {
            required: price,
            provided,
        })
}
