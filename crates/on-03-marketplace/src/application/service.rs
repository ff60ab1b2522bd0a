//! # Marketplace Service
//!
//! Listings, treasury and sale execution for one chain. Ownership is
//! re-read from the registry inside every call; a sale moves the name
//! through `transfer_local` with the marketplace as operator.

use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use shared_bus::{EventPublisher, ListingCloseReason, NameServiceEvent};
use shared_types::{Address, Amount, ChainId, NativeLedger};

use crate::algorithms::split_sale;
use crate::config::MarketplaceConfig;
use crate::domain::{
    invariant_fee_covered, invariant_price_covered, Listing, MarketplaceError, SaleReceipt,
};
use crate::ports::{MarketplaceApi, OwnershipRegistry};

/// Marketplace Service - escrow-free listing and sale execution.
pub struct MarketplaceService {
    config: MarketplaceConfig,
    registry: Arc<dyn OwnershipRegistry>,
    ledger: Arc<dyn NativeLedger>,
    events: Arc<dyn EventPublisher>,
    listings: RwLock<BTreeMap<String, Listing>>,
    treasury: Mutex<Amount>,
    tx_lock: Mutex<()>,
}

impl MarketplaceService {
    /// Create a marketplace. The registry must link `config.address` via
    /// `set_marketplace` before sales can execute.
    pub fn new(
        config: MarketplaceConfig,
        registry: Arc<dyn OwnershipRegistry>,
        ledger: Arc<dyn NativeLedger>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            registry,
            ledger,
            events,
            listings: RwLock::new(BTreeMap::new()),
            treasury: Mutex::new(0),
            tx_lock: Mutex::new(()),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &MarketplaceConfig {
        &self.config
    }

    /// Marketplace account.
    pub fn address(&self) -> Address {
        self.config.address
    }

    /// Fees and cuts held.
    pub fn treasury_balance(&self) -> Amount {
        *self.treasury.lock()
    }

    /// Every listing, including closed ones.
    pub fn all_listings(&self) -> Vec<Listing> {
        self.listings.read().values().cloned().collect()
    }

    fn close(&self, name: &str, reason: ListingCloseReason) {
        if let Some(listing) = self.listings.write().get_mut(name) {
            listing.active = false;
        }
        self.events.publish(NameServiceEvent::ListingClosed {
            chain: self.registry.chain_id(),
            name: name.to_string(),
            reason,
        });
    }

    fn active_listing(&self, name: &str) -> Result<Listing, MarketplaceError> {
        self.listings
            .read()
            .get(name)
            .filter(|l| l.active)
            .cloned()
            .ok_or_else(|| MarketplaceError::NoActiveListing(name.to_string()))
    }
}

impl MarketplaceApi for MarketplaceService {
    fn chain_id(&self) -> ChainId {
        self.registry.chain_id()
    }

    fn list(
        &self,
        caller: Address,
        name: &str,
        price: Amount,
        payment: Amount,
    ) -> Result<Listing, MarketplaceError> {
        let _tx = self.tx_lock.lock();
        let name = self.registry.normalize(name)?.to_string();
        if price == 0 {
            return Err(MarketplaceError::InvalidPrice(price));
        }

        let info = self.registry.get_domain_info(&name)?;
        if info.is_expired && info.expires_at != 0 {
            return Err(MarketplaceError::Expired(name));
        }
        if info.owner.is_zero() || info.owner != caller {
            return Err(MarketplaceError::NotOwner { name, caller });
        }

        let excess = invariant_fee_covered(self.config.listing_fee, payment)?;
        if excess > 0 {
            self.ledger.credit(caller, excess)?;
        }
        *self.treasury.lock() += self.config.listing_fee;

        let listing = Listing {
            name: name.clone(),
            seller: caller,
            price,
            active: true,
        };
        self.listings.write().insert(name.clone(), listing.clone());

        info!("[on-03] Listed {} by {} at {}", name, caller, price);
        self.events.publish(NameServiceEvent::ListingCreated {
            chain: self.registry.chain_id(),
            name,
            seller: caller,
            price,
        });
        Ok(listing)
    }

    fn delist(&self, caller: Address, name: &str) -> Result<(), MarketplaceError> {
        let _tx = self.tx_lock.lock();
        let name = self.registry.normalize(name)?.to_string();
        let listing = self.active_listing(&name)?;
        if listing.seller != caller {
            return Err(MarketplaceError::NotSeller { name, caller });
        }

        self.close(&name, ListingCloseReason::Delisted);
        info!("[on-03] Delisted {}", name);
        Ok(())
    }

    fn buy(
        &self,
        buyer: Address,
        name: &str,
        payment: Amount,
    ) -> Result<SaleReceipt, MarketplaceError> {
        let _tx = self.tx_lock.lock();
        let name = self.registry.normalize(name)?.to_string();
        let listing = self.active_listing(&name)?;
        let refund = invariant_price_covered(listing.price, payment)?;

        let owner = self.registry.owner_of(&name)?;
        if owner != listing.seller {
            warn!(
                "[on-03] Refusing sale of {}: seller {} no longer owns it (owner {})",
                name, listing.seller, owner
            );
            return Err(MarketplaceError::StaleOwnership {
                name,
                seller: listing.seller,
                owner,
            });
        }

        let (seller_proceeds, marketplace_cut) =
            split_sale(listing.price, self.config.marketplace_cut_bps);

        self.registry
            .transfer_local(self.config.address, &name, buyer)?;
        if let Err(e) = self
            .ledger
            .credit_all(&[(listing.seller, seller_proceeds), (buyer, refund)])
        {
            error!("[on-03] Payout for {} failed, returning name: {}", name, e);
            if let Err(undo) = self
                .registry
                .transfer_local(self.config.address, &name, listing.seller)
            {
                error!("[on-03] Could not return {} to {}: {}", name, listing.seller, undo);
            }
            return Err(e.into());
        }
        *self.treasury.lock() += marketplace_cut;

        self.close(&name, ListingCloseReason::Sold);
        info!(
            "[on-03] Sold {} from {} to {} for {}",
            name, listing.seller, buyer, listing.price
        );
        self.events.publish(NameServiceEvent::DomainSold {
            chain: self.registry.chain_id(),
            name: name.clone(),
            seller: listing.seller,
            buyer,
            price: listing.price,
        });

        Ok(SaleReceipt {
            name,
            seller: listing.seller,
            buyer,
            price: listing.price,
            seller_proceeds,
            marketplace_cut,
            refund,
        })
    }

    fn withdraw(&self, caller: Address, to: Address) -> Result<Amount, MarketplaceError> {
        if caller != self.config.owner || caller.is_zero() {
            return Err(MarketplaceError::NotMarketplaceOwner(caller));
        }
        let _tx = self.tx_lock.lock();
        let mut treasury = self.treasury.lock();
        let amount = *treasury;
        if amount > 0 {
            self.ledger.credit(to, amount)?;
            *treasury = 0;
        }
        info!("[on-03] Withdrew {} to {}", amount, to);
        Ok(amount)
    }

    fn listing(&self, name: &str) -> Result<Option<Listing>, MarketplaceError> {
        let name = self.registry.normalize(name)?;
        Ok(self.listings.read().get(name.as_str()).cloned())
    }

    fn listing_fee(&self) -> Amount {
        self.config.listing_fee
    }

    fn active_listings(&self) -> Vec<Listing> {
        self.listings
            .read()
            .values()
            .filter(|l| l.active)
            .cloned()
            .collect()
    }

    fn deactivate_stale(&self, name: &str) -> Result<bool, MarketplaceError> {
        let _tx = self.tx_lock.lock();
        let name = self.registry.normalize(name)?.to_string();
        let Ok(listing) = self.active_listing(&name) else {
            return Ok(false);
        };

        let owner = self.registry.owner_of(&name)?;
        if owner == listing.seller {
            debug!("[on-03] Listing for {} still consistent", name);
            return Ok(false);
        }

        self.close(&name, ListingCloseReason::Stale);
        warn!(
            "[on-03] Closed stale listing for {} (seller {}, owner {})",
            name, listing.seller, owner
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::MarketplaceService;
    use crate::config::MarketplaceConfig;
    use crate::domain::MarketplaceError;
    use crate::ports::MarketplaceApi;
    use on_01_domain_registry::{DomainRegistryApi, DomainRegistryService, RegistryConfig};
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, NameServiceEvent};
    use shared_types::{Address, InMemoryLedger, ManualClock, NativeLedger};
    use std::sync::Arc;

    const ADMIN: Address = Address::repeat(0xAD);
    const ALICE: Address = Address::repeat(0xA1);
    const BOB: Address = Address::repeat(0xB0);
    const CAROL: Address = Address::repeat(0xCA);

    struct Fixture {
        clock: Arc<ManualClock>,
        ledger: Arc<InMemoryLedger>,
        bus: Arc<InMemoryEventBus>,
        registry: Arc<DomainRegistryService>,
        market: MarketplaceService,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(1_000));
        let ledger = Arc::new(InMemoryLedger::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let registry = Arc::new(DomainRegistryService::in_memory(
            RegistryConfig::for_testing(),
            clock.clone(),
            ledger.clone(),
            bus.clone(),
        ));
        let config = MarketplaceConfig::for_testing();
        registry.set_marketplace(ADMIN, config.address).unwrap();
        let market = MarketplaceService::new(config, registry.clone(), ledger.clone(), bus.clone());
        registry.register(ALICE, "test", false, 100).unwrap();
        Fixture {
            clock,
            ledger,
            bus,
            registry,
            market,
        }
    }

    #[test]
    fn test_list_requires_fee() {
        let f = fixture();
        assert!(matches!(
            f.market.list(ALICE, "test", 500, 9),
            Err(MarketplaceError::InsufficientFee { required: 10, provided: 9 })
        ));
        let listing = f.market.list(ALICE, "test", 500, 10).unwrap();
        assert!(listing.active);
        assert_eq!(f.market.listing("test").unwrap(), Some(listing));
        assert_eq!(f.market.treasury_balance(), 10);
    }

    #[test]
    fn test_list_refunds_fee_overpayment() {
        let f = fixture();
        f.market.list(ALICE, "test", 500, 15).unwrap();
        assert_eq!(f.ledger.balance_of(&ALICE), 5);
    }

    #[test]
    fn test_list_not_owner() {
        let f = fixture();
        assert!(matches!(
            f.market.list(BOB, "test", 500, 10),
            Err(MarketplaceError::NotOwner { .. })
        ));
        assert!(matches!(
            f.market.list(BOB, "nobody", 500, 10),
            Err(MarketplaceError::NotOwner { .. })
        ));
    }

    #[test]
    fn test_list_expired() {
        let f = fixture();
        f.clock.set(2_001);
        assert!(matches!(
            f.market.list(ALICE, "test", 500, 10),
            Err(MarketplaceError::Expired(_))
        ));
    }

    #[test]
    fn test_list_zero_price() {
        let f = fixture();
        assert_eq!(
            f.market.list(ALICE, "test", 0, 10),
            Err(MarketplaceError::InvalidPrice(0))
        );
    }

    #[test]
    fn test_delist() {
        let f = fixture();
        f.market.list(ALICE, "test", 500, 10).unwrap();
        assert!(matches!(
            f.market.delist(BOB, "test"),
            Err(MarketplaceError::NotSeller { .. })
        ));
        f.market.delist(ALICE, "test").unwrap();
        assert!(f.market.active_listings().is_empty());
        assert!(matches!(
            f.market.delist(ALICE, "test"),
            Err(MarketplaceError::NoActiveListing(_))
        ));
    }

    #[test]
    fn test_buy_moves_ownership_and_pays_seller() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::topics(vec![EventTopic::Marketplace]));
        f.market.list(ALICE, "test", 10_000, 10).unwrap();

        let receipt = f.market.buy(BOB, "test", 10_500).unwrap();
        assert_eq!(receipt.seller_proceeds, 9_750);
        assert_eq!(receipt.marketplace_cut, 250);
        assert_eq!(receipt.refund, 500);

        assert_eq!(f.registry.owner_of("test").unwrap(), BOB);
        assert_eq!(f.ledger.balance_of(&ALICE), 9_750);
        assert_eq!(f.ledger.balance_of(&BOB), 500);
        assert_eq!(f.market.treasury_balance(), 260);
        assert!(!f.market.listing("test").unwrap().unwrap().active);

        let events = sub.drain();
        assert!(events
            .iter()
            .any(|e| matches!(e, NameServiceEvent::DomainSold { buyer, .. } if *buyer == BOB)));
    }

    #[test]
    fn test_buy_underpaid() {
        let f = fixture();
        f.market.list(ALICE, "test", 100, 10).unwrap();
        assert!(matches!(
            f.market.buy(BOB, "test", 99),
            Err(MarketplaceError::InsufficientPayment { required: 100, provided: 99 })
        ));
        assert_eq!(f.registry.owner_of("test").unwrap(), ALICE);
    }

    #[test]
    fn test_buy_without_listing() {
        let f = fixture();
        assert!(matches!(
            f.market.buy(BOB, "test", 100),
            Err(MarketplaceError::NoActiveListing(_))
        ));
    }

    #[test]
    fn test_buy_stale_listing_fails() {
        let f = fixture();
        f.market.list(ALICE, "test", 10, 10).unwrap();
        f.registry.transfer_local(ALICE, "test", CAROL).unwrap();

        assert!(matches!(
            f.market.buy(BOB, "test", 10),
            Err(MarketplaceError::StaleOwnership { seller, owner, .. })
                if seller == ALICE && owner == CAROL
        ));
        assert_eq!(f.registry.owner_of("test").unwrap(), CAROL);
        // The failed buy leaves the listing for the watcher.
        assert_eq!(f.market.active_listings().len(), 1);
    }

    #[test]
    fn test_deactivate_stale() {
        let f = fixture();
        f.market.list(ALICE, "test", 10, 10).unwrap();
        assert!(!f.market.deactivate_stale("test").unwrap());

        f.registry.transfer_local(ALICE, "test", CAROL).unwrap();
        assert!(f.market.deactivate_stale("test").unwrap());
        assert!(f.market.active_listings().is_empty());
        assert!(!f.market.deactivate_stale("test").unwrap());
    }

    #[test]
    fn test_withdraw_owner_only() {
        let f = fixture();
        f.market.list(ALICE, "test", 10, 10).unwrap();
        let owner = f.market.config().owner;
        assert_eq!(
            f.market.withdraw(ALICE, ALICE),
            Err(MarketplaceError::NotMarketplaceOwner(ALICE))
        );
        assert_eq!(f.market.withdraw(owner, owner).unwrap(), 10);
        assert_eq!(f.ledger.balance_of(&owner), 10);
        assert_eq!(f.market.treasury_balance(), 0);
    }

    #[test]
    fn test_relist_overwrites() {
        let f = fixture();
        f.market.list(ALICE, "test", 10, 10).unwrap();
        f.market.list(ALICE, "TEST.omni", 20, 10).unwrap();
        let listings = f.market.active_listings();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, 20);
    }
}
