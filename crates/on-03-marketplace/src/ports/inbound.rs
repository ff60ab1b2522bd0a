//! # Inbound Ports
//!
//! API exposed by the marketplace.

use crate::domain::{Listing, MarketplaceError, SaleReceipt};
use shared_types::{Address, Amount, ChainId};

/// Marketplace API.
pub trait MarketplaceApi: Send + Sync {
    /// Chain the marketplace lives on.
    fn chain_id(&self) -> ChainId;

    /// List `name` at `price`, paying the listing fee.
    fn list(
        &self,
        caller: Address,
        name: &str,
        price: Amount,
        payment: Amount,
    ) -> Result<Listing, MarketplaceError>;

    /// Deactivate the caller's listing.
    fn delist(&self, caller: Address, name: &str) -> Result<(), MarketplaceError>;

    /// Buy a listed name.
    fn buy(&self, buyer: Address, name: &str, payment: Amount)
        -> Result<SaleReceipt, MarketplaceError>;

    /// Sweep the treasury. Marketplace owner only.
    fn withdraw(&self, caller: Address, to: Address) -> Result<Amount, MarketplaceError>;

    /// Listing for `name`, active or not.
    fn listing(&self, name: &str) -> Result<Option<Listing>, MarketplaceError>;

    /// Current listing fee.
    fn listing_fee(&self) -> Amount;

    /// All active listings, ordered by name.
    fn active_listings(&self) -> Vec<Listing>;

    /// Close the listing for `name` if its seller no longer owns it.
    /// Returns true if a listing was closed.
    fn deactivate_stale(&self, name: &str) -> Result<bool, MarketplaceError>;
}
