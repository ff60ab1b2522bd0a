//! # Domain Registry Service
//!
//! Application service owning one chain's name records. Every write runs
//! under a per-chain transaction lock, so operations on the same chain are
//! strictly ordered and a failed call leaves no partial state.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, warn};

use shared_bus::{EventPublisher, NameServiceEvent};
use shared_types::{Address, Amount, ChainId, Clock, NativeLedger, Timestamp};

use crate::adapters::InMemoryDomainStore;
use crate::config::RegistryConfig;
use crate::domain::{
    invariant_available, invariant_mint_target_vacant, invariant_owner, invariant_payment_covers,
    DomainInfo, DomainName, DomainRecord, RecordStatus, RegistryError, TransferSnapshot,
};
use crate::ports::{DomainRegistryApi, DomainStore, TransferHooks};

#[derive(Clone, Copy, Debug, Default)]
struct Roles {
    marketplace: Option<Address>,
    transfer_agent: Option<Address>,
}

/// Domain Registry Service - authoritative name store for one chain.
pub struct DomainRegistryService {
    config: RegistryConfig,
    store: Arc<dyn DomainStore>,
    clock: Arc<dyn Clock>,
    ledger: Arc<dyn NativeLedger>,
    events: Arc<dyn EventPublisher>,
    roles: RwLock<Roles>,
    fees_collected: Mutex<Amount>,
    tx_lock: Mutex<()>,
}

impl DomainRegistryService {
    /// Create a registry over an existing store.
    pub fn new(
        config: RegistryConfig,
        store: Arc<dyn DomainStore>,
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn NativeLedger>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            store,
            clock,
            ledger,
            events,
            roles: RwLock::new(Roles::default()),
            fees_collected: Mutex::new(0),
            tx_lock: Mutex::new(()),
        }
    }

    /// Create a registry backed by an in-memory store.
    pub fn in_memory(
        config: RegistryConfig,
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn NativeLedger>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self::new(config, Arc::new(InMemoryDomainStore::new()), clock, ledger, events)
    }

    /// Configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Linked marketplace account.
    pub fn marketplace(&self) -> Option<Address> {
        self.roles.read().marketplace
    }

    /// Account allowed to call the transfer hooks.
    pub fn transfer_agent(&self) -> Option<Address> {
        self.roles.read().transfer_agent
    }

    /// Fees held and not yet withdrawn.
    pub fn fees_collected(&self) -> Amount {
        *self.fees_collected.lock()
    }

    /// Current chain time.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Raw record, including departed tombstones.
    pub fn record(&self, name: &str) -> Result<Option<DomainRecord>, RegistryError> {
        let name = self.normalize(name)?;
        Ok(self.store.get(&name))
    }

    /// Status of a name on this chain.
    pub fn status(&self, name: &str) -> Result<RecordStatus, RegistryError> {
        let now = self.clock.now();
        Ok(self
            .record(name)?
            .map_or(RecordStatus::Unregistered, |r| r.status(now)))
    }

    /// Snapshot of every stored record, for indexers.
    pub fn records(&self) -> Vec<DomainRecord> {
        self.store
            .names()
            .iter()
            .filter_map(|name| self.store.get(name))
            .collect()
    }

    fn require_admin(&self, caller: Address) -> Result<(), RegistryError> {
        if caller.is_zero() || caller != self.config.admin {
            return Err(RegistryError::Unauthorized(caller));
        }
        Ok(())
    }

    fn require_agent(&self, agent: Address) -> Result<(), RegistryError> {
        match self.roles.read().transfer_agent {
            Some(expected) if expected == agent => Ok(()),
            _ => Err(RegistryError::Unauthorized(agent)),
        }
    }

    fn require_chain(&self, chain: ChainId) -> Result<(), RegistryError> {
        if chain != self.config.chain_id {
            return Err(RegistryError::WrongChain {
                expected: self.config.chain_id,
                got: chain,
            });
        }
        Ok(())
    }

    /// Keep `fee` out of `payment` and refund the rest to `payer`.
    ///
    /// Must be the last fallible step before mutating the store.
    fn collect_fee(&self, payer: Address, fee: Amount, payment: Amount) -> Result<(), RegistryError> {
        let excess = invariant_payment_covers(fee, payment)?;
        if excess > 0 {
            self.ledger.credit(payer, excess)?;
        }
        *self.fees_collected.lock() += fee;
        Ok(())
    }

    fn load(&self, name: &DomainName) -> Result<DomainRecord, RegistryError> {
        self.store
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }
}

impl DomainRegistryApi for DomainRegistryService {
    fn chain_id(&self) -> ChainId {
        self.config.chain_id
    }

    fn normalize(&self, name: &str) -> Result<DomainName, RegistryError> {
        DomainName::parse(name, &self.config.tld, self.config.max_name_len)
    }

    fn is_available(&self, name: &str) -> Result<bool, RegistryError> {
        let name = self.normalize(name)?;
        Ok(invariant_available(
            self.store.get(&name).as_ref(),
            self.clock.now(),
        ))
    }

    fn register(
        &self,
        caller: Address,
        name: &str,
        make_omnichain: bool,
        payment: Amount,
    ) -> Result<DomainRecord, RegistryError> {
        let _tx = self.tx_lock.lock();
        if caller.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        let name = self.normalize(name)?;
        let now = self.clock.now();

        if !invariant_available(self.store.get(&name).as_ref(), now) {
            return Err(RegistryError::AlreadyRegistered(name.to_string()));
        }
        self.collect_fee(caller, self.config.registration_fee, payment)?;

        let record = DomainRecord {
            name,
            owner: caller,
            expires_at: now.saturating_add(self.config.registration_period_secs),
            registered_at: now,
            source_chain_id: self.config.chain_id,
            is_omnichain: make_omnichain,
            departed_to: None,
        };
        self.store.put(record.clone());

        info!(
            "[on-01] Registered {} on {} for {} (omnichain={})",
            record.name, self.config.chain_id, caller, make_omnichain
        );
        self.events.publish(NameServiceEvent::DomainRegistered {
            chain: self.config.chain_id,
            name: record.name.to_string(),
            owner: caller,
            expires_at: record.expires_at,
            omnichain: make_omnichain,
        });
        Ok(record)
    }

    fn renew(
        &self,
        caller: Address,
        name: &str,
        payment: Amount,
    ) -> Result<Timestamp, RegistryError> {
        let _tx = self.tx_lock.lock();
        let name = self.normalize(name)?;
        let now = self.clock.now();
        let mut record = self.load(&name)?;

        invariant_owner(&record, caller, now)?;
        self.collect_fee(caller, self.config.renewal_fee, payment)?;

        record.expires_at = record
            .expires_at
            .saturating_add(self.config.registration_period_secs);
        let expires_at = record.expires_at;
        self.store.put(record);

        info!("[on-01] Renewed {} until {}", name, expires_at);
        self.events.publish(NameServiceEvent::DomainRenewed {
            chain: self.config.chain_id,
            name: name.to_string(),
            expires_at,
        });
        Ok(expires_at)
    }

    fn upgrade_to_omnichain(
        &self,
        caller: Address,
        name: &str,
        payment: Amount,
    ) -> Result<(), RegistryError> {
        let _tx = self.tx_lock.lock();
        let name = self.normalize(name)?;
        let now = self.clock.now();
        let mut record = self.load(&name)?;

        invariant_owner(&record, caller, now)?;
        if record.is_omnichain {
            return Err(RegistryError::AlreadyOmnichain(name.to_string()));
        }
        self.collect_fee(caller, self.config.omnichain_upgrade_fee, payment)?;

        record.is_omnichain = true;
        self.store.put(record);

        info!("[on-01] Upgraded {} to omnichain", name);
        self.events.publish(NameServiceEvent::DomainUpgraded {
            chain: self.config.chain_id,
            name: name.to_string(),
        });
        Ok(())
    }

    fn owner_of(&self, name: &str) -> Result<Address, RegistryError> {
        let name = self.normalize(name)?;
        let now = self.clock.now();
        Ok(self
            .store
            .get(&name)
            .map_or(Address::ZERO, |r| r.live_owner(now)))
    }

    fn get_domain_info(&self, name: &str) -> Result<DomainInfo, RegistryError> {
        let name = self.normalize(name)?;
        let now = self.clock.now();
        Ok(self
            .store
            .get(&name)
            .map_or_else(DomainInfo::unregistered, |r| r.info(now)))
    }

    fn transfer_local(
        &self,
        caller: Address,
        name: &str,
        to: Address,
    ) -> Result<(), RegistryError> {
        let _tx = self.tx_lock.lock();
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        let name = self.normalize(name)?;
        let now = self.clock.now();
        let mut record = self.load(&name)?;

        let via_marketplace = self.roles.read().marketplace == Some(caller);
        if record.owner.is_zero() || (record.owner != caller && !via_marketplace) {
            return Err(RegistryError::NotOwner {
                name: name.to_string(),
                caller,
            });
        }
        if record.is_expired(now) {
            return Err(RegistryError::Expired(name.to_string()));
        }

        let from = record.owner;
        record.owner = to;
        self.store.put(record);

        info!("[on-01] Transferred {} from {} to {}", name, from, to);
        self.events.publish(NameServiceEvent::DomainTransferred {
            chain: self.config.chain_id,
            name: name.to_string(),
            from,
            to,
        });
        Ok(())
    }

    fn reclaim_expired(&self, name: &str) -> Result<bool, RegistryError> {
        let _tx = self.tx_lock.lock();
        let name = self.normalize(name)?;
        let now = self.clock.now();

        match self.store.get(&name) {
            Some(record) if record.is_expired(now) && !record.is_departed() => {
                self.store.remove(&name);
                debug!("[on-01] Reclaimed expired {}", name);
                self.events.publish(NameServiceEvent::DomainReclaimed {
                    chain: self.config.chain_id,
                    name: name.to_string(),
                });
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn set_marketplace(&self, caller: Address, marketplace: Address) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        if marketplace.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        self.roles.write().marketplace = Some(marketplace);
        info!("[on-01] Marketplace linked: {}", marketplace);
        Ok(())
    }

    fn set_transfer_agent(&self, caller: Address, agent: Address) -> Result<(), RegistryError> {
        self.require_admin(caller)?;
        if agent.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        self.roles.write().transfer_agent = Some(agent);
        info!("[on-01] Transfer agent set: {}", agent);
        Ok(())
    }

    fn withdraw_fees(&self, caller: Address, to: Address) -> Result<Amount, RegistryError> {
        self.require_admin(caller)?;
        let _tx = self.tx_lock.lock();
        let mut fees = self.fees_collected.lock();
        let amount = *fees;
        if amount > 0 {
            self.ledger.credit(to, amount)?;
            *fees = 0;
        }
        info!("[on-01] Withdrew {} in fees to {}", amount, to);
        Ok(amount)
    }
}

impl TransferHooks for DomainRegistryService {
    fn burn_for_outbound_transfer(
        &self,
        agent: Address,
        name: &str,
        expected_owner: Address,
        to: Address,
        target_chain: ChainId,
    ) -> Result<TransferSnapshot, RegistryError> {
        self.require_agent(agent)?;
        let _tx = self.tx_lock.lock();
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        let name = self.normalize(name)?;
        let now = self.clock.now();
        let record = self.load(&name)?;

        if record.owner.is_zero() {
            return Err(RegistryError::NotOwner {
                name: name.to_string(),
                caller: expected_owner,
            });
        }
        if record.is_expired(now) {
            return Err(RegistryError::Expired(name.to_string()));
        }
        if !record.is_omnichain {
            return Err(RegistryError::NotOmnichain(name.to_string()));
        }
        if record.owner != expected_owner {
            return Err(RegistryError::NotOwner {
                name: name.to_string(),
                caller: expected_owner,
            });
        }

        let snapshot = TransferSnapshot {
            name: record.name.clone(),
            from: record.owner,
            to,
            expires_at: record.expires_at,
            source_chain_id: record.source_chain_id,
            is_omnichain: record.is_omnichain,
            burned_on: self.config.chain_id,
            target_chain_id: target_chain,
        };
        self.store.put(DomainRecord {
            owner: Address::ZERO,
            departed_to: Some(target_chain),
            ..record
        });

        info!(
            "[on-01] Burned {} on {} for transfer to {}",
            name, self.config.chain_id, target_chain
        );
        self.events.publish(NameServiceEvent::DomainBurned {
            chain: self.config.chain_id,
            name: name.to_string(),
            from: snapshot.from,
            target_chain,
        });
        Ok(snapshot)
    }

    fn mint_from_inbound_transfer(
        &self,
        agent: Address,
        snapshot: &TransferSnapshot,
    ) -> Result<DomainRecord, RegistryError> {
        self.require_agent(agent)?;
        let _tx = self.tx_lock.lock();
        self.require_chain(snapshot.target_chain_id)?;
        if snapshot.to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        let name = self.normalize(snapshot.name.as_str())?;
        let now = self.clock.now();

        invariant_mint_target_vacant(self.store.get(&name).as_ref(), now)?;

        let record = DomainRecord {
            name,
            owner: snapshot.to,
            expires_at: snapshot.expires_at,
            registered_at: now,
            source_chain_id: snapshot.source_chain_id,
            is_omnichain: snapshot.is_omnichain,
            departed_to: None,
        };
        if record.is_expired(now) {
            warn!(
                "[on-01] Minted {} already past expiry ({} < {})",
                record.name, record.expires_at, now
            );
        }
        self.store.put(record.clone());

        info!(
            "[on-01] Minted {} on {} for {} (origin {})",
            record.name, self.config.chain_id, record.owner, record.source_chain_id
        );
        self.events.publish(NameServiceEvent::DomainMinted {
            chain: self.config.chain_id,
            name: record.name.to_string(),
            owner: record.owner,
            source_chain_id: record.source_chain_id,
        });
        Ok(record)
    }

    fn restore_after_failed_transfer(
        &self,
        agent: Address,
        snapshot: &TransferSnapshot,
    ) -> Result<DomainRecord, RegistryError> {
        self.require_agent(agent)?;
        let _tx = self.tx_lock.lock();
        self.require_chain(snapshot.burned_on)?;
        let name = self.normalize(snapshot.name.as_str())?;

        let tombstone = match self.store.get(&name) {
            Some(r) if r.owner.is_zero() && r.departed_to == Some(snapshot.target_chain_id) => r,
            _ => {
                return Err(RegistryError::NotDeparted {
                    name: name.to_string(),
                    target: snapshot.target_chain_id,
                })
            }
        };

        let record = DomainRecord {
            owner: snapshot.from,
            departed_to: None,
            ..tombstone
        };
        self.store.put(record.clone());

        info!("[on-01] Restored {} to {} after failed transfer", name, record.owner);
        self.events.publish(NameServiceEvent::DomainRestored {
            chain: self.config.chain_id,
            name: name.to_string(),
            owner: record.owner,
        });
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventFilter, InMemoryEventBus};
    use shared_types::{InMemoryLedger, ManualClock};

    const ALICE: Address = Address::repeat(0xA1);
    const BOB: Address = Address::repeat(0xB0);
    const ADMIN: Address = Address::repeat(0xAD);
    const AGENT: Address = Address::repeat(0xCC);
    const MARKET: Address = Address::repeat(0x11);

    struct Fixture {
        clock: Arc<ManualClock>,
        ledger: Arc<InMemoryLedger>,
        bus: Arc<InMemoryEventBus>,
        registry: DomainRegistryService,
    }

    fn fixture() -> Fixture {
        let clock = Arc::new(ManualClock::new(1_000));
        let ledger = Arc::new(InMemoryLedger::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let registry = DomainRegistryService::in_memory(
            RegistryConfig::for_testing(),
            clock.clone(),
            ledger.clone(),
            bus.clone(),
        );
        registry.set_transfer_agent(ADMIN, AGENT).unwrap();
        Fixture {
            clock,
            ledger,
            bus,
            registry,
        }
    }

    #[test]
    fn test_register_creates_record() {
        let f = fixture();
        let record = f.registry.register(ALICE, "Alice", false, 100).unwrap();
        assert_eq!(record.owner, ALICE);
        assert_eq!(record.expires_at, 2_000);
        assert_eq!(record.source_chain_id, ChainId(1));
        assert!(!record.is_omnichain);
        assert_eq!(f.registry.owner_of("alice").unwrap(), ALICE);
        assert_eq!(f.registry.fees_collected(), 100);
    }

    #[test]
    fn test_register_twice_fails() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        let err = f.registry.register(BOB, "ALICE.omni", false, 100).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("alice".to_string()));
    }

    #[test]
    fn test_register_insufficient_payment_applies_nothing() {
        let f = fixture();
        let err = f.registry.register(ALICE, "alice", false, 99).unwrap_err();
        assert!(matches!(err, RegistryError::InsufficientPayment { .. }));
        assert!(f.registry.is_available("alice").unwrap());
        assert_eq!(f.registry.fees_collected(), 0);
    }

    #[test]
    fn test_register_refunds_overpayment() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 130).unwrap();
        assert_eq!(f.ledger.balance_of(&ALICE), 30);
        assert_eq!(f.registry.fees_collected(), 100);
    }

    #[test]
    fn test_availability_across_lifecycle() {
        let f = fixture();
        assert!(f.registry.is_available("alice").unwrap());
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(!f.registry.is_available("alice").unwrap());

        f.clock.set(2_000);
        assert!(!f.registry.is_available("alice").unwrap());

        f.clock.set(2_001);
        assert!(f.registry.is_available("alice").unwrap());
        assert_eq!(f.registry.owner_of("alice").unwrap(), Address::ZERO);
    }

    #[test]
    fn test_reregister_after_expiry() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        f.clock.set(5_000);
        let record = f.registry.register(BOB, "alice", true, 100).unwrap();
        assert_eq!(record.owner, BOB);
        assert_eq!(record.expires_at, 6_000);
    }

    #[test]
    fn test_renew_owner_only() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(matches!(
            f.registry.renew(BOB, "alice", 50),
            Err(RegistryError::NotOwner { .. })
        ));
        assert_eq!(f.registry.renew(ALICE, "alice", 50).unwrap(), 3_000);
    }

    #[test]
    fn test_renew_requires_fee() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(matches!(
            f.registry.renew(ALICE, "alice", 49),
            Err(RegistryError::InsufficientPayment { required: 50, provided: 49 })
        ));
    }

    #[test]
    fn test_renew_after_expiry_fails() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        f.clock.set(2_001);
        assert!(matches!(
            f.registry.renew(ALICE, "alice", 50),
            Err(RegistryError::Expired(_))
        ));
    }

    #[test]
    fn test_get_domain_info() {
        let f = fixture();
        f.registry.register(ALICE, "alice", true, 100).unwrap();
        let info = f.registry.get_domain_info("alice").unwrap();
        assert_eq!(info.owner, ALICE);
        assert_eq!(info.expires_at, 2_000);
        assert!(info.is_omnichain);
        assert!(!info.is_expired);

        let missing = f.registry.get_domain_info("nobody").unwrap();
        assert_eq!(missing, DomainInfo::unregistered());
    }

    #[test]
    fn test_transfer_local() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::all());
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        f.registry.transfer_local(ALICE, "alice", BOB).unwrap();
        assert_eq!(f.registry.owner_of("alice").unwrap(), BOB);

        let events = sub.drain();
        assert!(events.iter().any(|e| matches!(
            e,
            NameServiceEvent::DomainTransferred { from, to, .. } if *from == ALICE && *to == BOB
        )));
    }

    #[test]
    fn test_transfer_local_not_owner() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(matches!(
            f.registry.transfer_local(BOB, "alice", BOB),
            Err(RegistryError::NotOwner { .. })
        ));
    }

    #[test]
    fn test_transfer_local_expired() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        f.clock.set(2_001);
        assert!(matches!(
            f.registry.transfer_local(ALICE, "alice", BOB),
            Err(RegistryError::Expired(_))
        ));
    }

    #[test]
    fn test_marketplace_may_transfer() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(f.registry.transfer_local(MARKET, "alice", BOB).is_err());

        f.registry.set_marketplace(ADMIN, MARKET).unwrap();
        f.registry.transfer_local(MARKET, "alice", BOB).unwrap();
        assert_eq!(f.registry.owner_of("alice").unwrap(), BOB);
    }

    #[test]
    fn test_set_marketplace_admin_only() {
        let f = fixture();
        assert_eq!(
            f.registry.set_marketplace(ALICE, MARKET),
            Err(RegistryError::Unauthorized(ALICE))
        );
    }

    #[test]
    fn test_upgrade_to_omnichain() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        f.registry.upgrade_to_omnichain(ALICE, "alice", 10).unwrap();
        assert!(f.registry.get_domain_info("alice").unwrap().is_omnichain);
        assert!(matches!(
            f.registry.upgrade_to_omnichain(ALICE, "alice", 10),
            Err(RegistryError::AlreadyOmnichain(_))
        ));
    }

    #[test]
    fn test_reclaim_expired() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(!f.registry.reclaim_expired("alice").unwrap());
        f.clock.set(2_001);
        assert!(f.registry.reclaim_expired("alice").unwrap());
        assert!(f.registry.record("alice").unwrap().is_none());
    }

    #[test]
    fn test_withdraw_fees() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(f.registry.withdraw_fees(ALICE, ALICE).is_err());
        assert_eq!(f.registry.withdraw_fees(ADMIN, ADMIN).unwrap(), 100);
        assert_eq!(f.ledger.balance_of(&ADMIN), 100);
        assert_eq!(f.registry.fees_collected(), 0);
    }

    #[test]
    fn test_burn_requires_agent() {
        let f = fixture();
        f.registry.register(ALICE, "alice", true, 100).unwrap();
        assert_eq!(
            f.registry
                .burn_for_outbound_transfer(ALICE, "alice", ALICE, BOB, ChainId(2))
                .unwrap_err(),
            RegistryError::Unauthorized(ALICE)
        );
    }

    #[test]
    fn test_burn_not_omnichain() {
        let f = fixture();
        f.registry.register(ALICE, "alice", false, 100).unwrap();
        assert!(matches!(
            f.registry
                .burn_for_outbound_transfer(AGENT, "alice", ALICE, BOB, ChainId(2)),
            Err(RegistryError::NotOmnichain(_))
        ));
        assert_eq!(f.registry.owner_of("alice").unwrap(), ALICE);
    }

    #[test]
    fn test_burn_wrong_owner() {
        let f = fixture();
        f.registry.register(ALICE, "alice", true, 100).unwrap();
        assert!(matches!(
            f.registry
                .burn_for_outbound_transfer(AGENT, "alice", BOB, BOB, ChainId(2)),
            Err(RegistryError::NotOwner { .. })
        ));
    }

    #[test]
    fn test_burn_leaves_tombstone() {
        let f = fixture();
        f.registry.register(ALICE, "alice", true, 100).unwrap();
        let snapshot = f
            .registry
            .burn_for_outbound_transfer(AGENT, "alice", ALICE, BOB, ChainId(2))
            .unwrap();

        assert_eq!(snapshot.from, ALICE);
        assert_eq!(snapshot.to, BOB);
        assert_eq!(snapshot.expires_at, 2_000);
        assert_eq!(f.registry.owner_of("alice").unwrap(), Address::ZERO);
        assert_eq!(
            f.registry.status("alice").unwrap(),
            RecordStatus::Departed(ChainId(2))
        );
        // Not re-registrable while it lives elsewhere.
        assert!(!f.registry.is_available("alice").unwrap());
        assert!(f.registry.transfer_local(ALICE, "alice", BOB).is_err());
    }

    #[test]
    fn test_tombstone_outlives_recorded_expiry() {
        let f = fixture();
        f.registry.register(ALICE, "alice", true, 100).unwrap();
        f.registry
            .burn_for_outbound_transfer(AGENT, "alice", ALICE, BOB, ChainId(2))
            .unwrap();

        f.clock.set(2_500);
        assert!(!f.registry.is_available("alice").unwrap());
        assert_eq!(
            f.registry.register(BOB, "alice", false, 100).unwrap_err(),
            RegistryError::AlreadyRegistered("alice".to_string())
        );
        assert!(!f.registry.reclaim_expired("alice").unwrap());
        assert_eq!(
            f.registry.status("alice").unwrap(),
            RecordStatus::Departed(ChainId(2))
        );
    }

    #[test]
    fn test_transfer_hooks_publish_lifecycle_events() {
        let f = fixture();
        f.registry.register(ALICE, "alice", true, 100).unwrap();
        let mut sub = f.bus.subscribe(EventFilter::all());

        let snapshot = f
            .registry
            .burn_for_outbound_transfer(AGENT, "alice", ALICE, BOB, ChainId(2))
            .unwrap();
        f.registry
            .restore_after_failed_transfer(AGENT, &snapshot)
            .unwrap();

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            NameServiceEvent::DomainBurned { from, target_chain, .. }
                if *from == ALICE && *target_chain == ChainId(2)
        ));
        assert!(matches!(
            &events[1],
            NameServiceEvent::DomainRestored { owner, .. } if *owner == ALICE
        ));
    }

    #[test]
    fn test_restore_after_burn() {
        let f = fixture();
        f.registry.register(ALICE, "alice", true, 100).unwrap();
        let snapshot = f
            .registry
            .burn_for_outbound_transfer(AGENT, "alice", ALICE, BOB, ChainId(2))
            .unwrap();
        let restored = f
            .registry
            .restore_after_failed_transfer(AGENT, &snapshot)
            .unwrap();
        assert_eq!(restored.owner, ALICE);
        assert_eq!(f.registry.owner_of("alice").unwrap(), ALICE);

        // A second restore finds no tombstone.
        assert!(matches!(
            f.registry.restore_after_failed_transfer(AGENT, &snapshot),
            Err(RegistryError::NotDeparted { .. })
        ));
    }

    #[test]
    fn test_mint_from_inbound() {
        let f = fixture();
        let mut sub = f.bus.subscribe(EventFilter::all());
        let snapshot = TransferSnapshot {
            name: f.registry.normalize("alice").unwrap(),
            from: ALICE,
            to: BOB,
            expires_at: 9_000,
            source_chain_id: ChainId(7),
            is_omnichain: true,
            burned_on: ChainId(7),
            target_chain_id: ChainId(1),
        };
        let record = f
            .registry
            .mint_from_inbound_transfer(AGENT, &snapshot)
            .unwrap();
        assert_eq!(record.owner, BOB);
        assert!(matches!(
            sub.drain().as_slice(),
            [NameServiceEvent::DomainMinted { owner, source_chain_id, .. }]
                if *owner == BOB && *source_chain_id == ChainId(7)
        ));
        let info = f.registry.get_domain_info("alice").unwrap();
        assert_eq!(info.source_chain_id, ChainId(7));
        assert_eq!(info.expires_at, 9_000);

        // Live record already present: consistency fault signal.
        assert!(matches!(
            f.registry.mint_from_inbound_transfer(AGENT, &snapshot),
            Err(RegistryError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn test_mint_wrong_chain() {
        let f = fixture();
        let snapshot = TransferSnapshot {
            name: f.registry.normalize("alice").unwrap(),
            from: ALICE,
            to: BOB,
            expires_at: 9_000,
            source_chain_id: ChainId(7),
            is_omnichain: true,
            burned_on: ChainId(7),
            target_chain_id: ChainId(3),
        };
        assert!(matches!(
            f.registry.mint_from_inbound_transfer(AGENT, &snapshot),
            Err(RegistryError::WrongChain { .. })
        ));
    }
}
