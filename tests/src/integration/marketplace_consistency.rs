//! # Marketplace Consistency
//!
//! Listings versus registry ownership when transfers bypass `buy`, and the
//! watcher closing the gap.

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;

    use on_01_domain_registry::DomainRegistryApi;
    use on_02_cross_chain_transfer::CrossChainTransferApi;
    use on_03_marketplace::{MarketplaceApi, MarketplaceError};
    use on_04_reconciliation::{ReconciliationApi, ReconciliationPolicy};
    use shared_bus::{EventFilter, EventTopic, NameServiceEvent};
    use shared_types::{Address, NativeLedger};

    const FEE: u128 = LISTING_FEE as u128;

    fn is_active(net: &TestNetwork, name: &str) -> bool {
        net.a()
            .marketplace
            .listing(name)
            .unwrap()
            .is_some_and(|l| l.active)
    }

    // =============================================================================
    // FEES AND SALES
    // =============================================================================

    #[test]
    fn test_listing_fee_enforced() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "test", false);
        let market = &net.a().marketplace;
        assert_eq!(market.listing_fee(), FEE);

        assert!(matches!(
            market.list(ALICE, "test", 500, FEE - 1),
            Err(MarketplaceError::InsufficientFee { .. })
        ));
        assert!(!is_active(&net, "test"));

        let listing = market.list(ALICE, "test", 500, FEE).unwrap();
        assert!(listing.active);
        assert_eq!(listing.seller, ALICE);
        assert!(is_active(&net, "test"));
    }

    #[test]
    fn test_sale_moves_ownership_and_pays_seller() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "test", false);
        let market = &net.a().marketplace;
        market.list(ALICE, "test", 1_000, FEE).unwrap();

        let receipt = market.buy(BOB, "test", 1_200).unwrap();
        assert_eq!(receipt.seller_proceeds + receipt.marketplace_cut, 1_000);
        assert_eq!(receipt.refund, 200);
        assert_eq!(net.a().registry.owner_of("test").unwrap(), BOB);
        assert_eq!(net.a().ledger.balance_of(&ALICE), receipt.seller_proceeds);
        assert_eq!(net.a().ledger.balance_of(&BOB), 200);
        assert!(!is_active(&net, "test"));
        assert!(net.watcher().run_once().is_clean());
    }

    // =============================================================================
    // DRIFT: LOCAL TRANSFER
    // =============================================================================

    #[test]
    fn test_bypassing_transfer_blocks_sale_and_watcher_closes_listing() {
        let net = TestNetwork::new();
        let mut sub = net
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Reconciliation]));
        net.register_on_a(ALICE, "a", false);
        net.a().marketplace.list(ALICE, "a", 10, FEE).unwrap();

        net.a().registry.transfer_local(ALICE, "a", CAROL).unwrap();

        assert!(matches!(
            net.a().marketplace.buy(BOB, "a", 10),
            Err(MarketplaceError::StaleOwnership { seller, owner, .. })
                if seller == ALICE && owner == CAROL
        ));
        assert_eq!(net.a().registry.owner_of("a").unwrap(), CAROL);
        assert!(is_active(&net, "a"));

        let report = net.watcher().run_once();
        assert_eq!(report.deactivated.len(), 1);
        assert_eq!(report.deactivated[0].chain, CHAIN_A);
        assert!(!is_active(&net, "a"));
        assert!(matches!(
            sub.drain().as_slice(),
            [NameServiceEvent::StaleListingDetected { deactivated: true, .. }]
        ));

        assert!(matches!(
            net.a().marketplace.buy(BOB, "a", 10),
            Err(MarketplaceError::NoActiveListing(_))
        ));
    }

    // =============================================================================
    // DRIFT: CROSS-CHAIN TRANSFER
    // =============================================================================

    #[tokio::test]
    async fn test_cross_chain_departure_leaves_stale_listing() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "a", true);
        net.a().marketplace.list(ALICE, "a", 10, FEE).unwrap();

        net.a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, u128::from(GAS_FEE))
            .await
            .unwrap();
        assert!(matches!(
            net.a().marketplace.buy(CAROL, "a", 10),
            Err(MarketplaceError::StaleOwnership { owner, .. }) if owner == Address::ZERO
        ));

        let report = net.watcher().run_once();
        assert_eq!(report.deactivated.len(), 1);
        assert_eq!(report.deactivated[0].owner, Address::ZERO);
        assert!(!is_active(&net, "a"));

        // The name arrives on B without any listing there.
        net.relay();
        assert!(net.b().marketplace.listing("a").unwrap().is_none());
        assert!(net.watcher().run_once().is_clean());
    }

    #[test]
    fn test_ownership_event_triggers_reconcile() {
        let net = TestNetwork::new();
        let mut registry_events = net
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Registry]).on_chains(vec![CHAIN_A]));
        net.register_on_a(ALICE, "a", false);
        net.a().marketplace.list(ALICE, "a", 10, FEE).unwrap();
        net.a().registry.transfer_local(ALICE, "a", CAROL).unwrap();

        let watcher = net.watcher();
        let stale: Vec<_> = registry_events
            .drain()
            .iter()
            .filter_map(|event| watcher.on_event(event))
            .collect();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].owner, CAROL);
        assert!(!is_active(&net, "a"));
    }

    // =============================================================================
    // MANUAL REVIEW POLICY
    // =============================================================================

    #[test]
    fn test_flag_for_review_waits_for_operator() {
        let net = TestNetwork::with_policy(ReconciliationPolicy::FlagForReview);
        net.register_on_a(ALICE, "a", false);
        net.register_on_a(ALICE, "b", false);
        net.a().marketplace.list(ALICE, "a", 10, FEE).unwrap();
        net.a().marketplace.list(ALICE, "b", 10, FEE).unwrap();
        net.a().registry.transfer_local(ALICE, "a", CAROL).unwrap();
        net.a().registry.transfer_local(ALICE, "b", CAROL).unwrap();

        let watcher = net.watcher();
        let report = watcher.run_once();
        assert_eq!(report.flagged.len(), 2);
        assert!(report.deactivated.is_empty());
        assert!(is_active(&net, "a"));
        assert_eq!(watcher.flagged().len(), 2);

        // The marketplace still refuses the stale sale on its own.
        assert!(matches!(
            net.a().marketplace.buy(BOB, "a", 10),
            Err(MarketplaceError::StaleOwnership { .. })
        ));

        assert_eq!(watcher.resolve_flagged(CHAIN_A, "a"), Ok(true));
        assert!(!is_active(&net, "a"));
        watcher.dismiss_flagged(CHAIN_A, "b").unwrap();
        assert!(is_active(&net, "b"));
        assert!(watcher.flagged().is_empty());
    }
}
