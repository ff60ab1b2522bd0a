//! # Cross-Chain Flows
//!
//! Registry, transfer contract and gateway working together across two
//! chains:
//!
//! 1. **Availability**: a name is taken strictly between registration and expiry
//! 2. **Commit**: burn on A, mint on B, provenance preserved
//! 3. **Replay**: a second inbound mint for the same transfer is refused
//! 4. **Single live copy**: checked before, during and after every transfer,
//!    and after the destination renews past the source's recorded expiry
//! 5. **Compensation**: destination failure reverts, gateway abort restores

#[cfg(test)]
mod tests {
    use crate::integration::harness::*;

    use on_01_domain_registry::{DomainName, DomainRegistryApi, RegistryError, TransferSnapshot};
    use on_02_cross_chain_transfer::{
        encode_payload, CrossChainTransferApi, DeliveryResult, GatewayReceiver, MessageContext,
        MessageId, TransferError, TransferPayload, TransferState,
    };
    use proptest::prelude::*;
    use shared_bus::{EventFilter, EventTopic, NameServiceEvent};
    use shared_types::Address;

    const GAS: u128 = GAS_FEE as u128;

    // =============================================================================
    // AVAILABILITY
    // =============================================================================

    #[test]
    fn test_availability_follows_registration_and_expiry() {
        let net = TestNetwork::new();
        let registry = &net.a().registry;
        assert!(registry.is_available("test").unwrap());

        net.register_on_a(ALICE, "test", false);
        assert!(!registry.is_available("test").unwrap());

        net.clock.set(GENESIS + PERIOD);
        assert!(!registry.is_available("test").unwrap());

        net.clock.set(GENESIS + PERIOD + 1);
        assert!(registry.is_available("test").unwrap());
        assert!(registry.get_domain_info("test").unwrap().is_expired);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_available_iff_outside_registration_window(offset in 0u64..3 * PERIOD) {
            let net = TestNetwork::new();
            net.register_on_a(ALICE, "prop", false);
            net.clock.set(GENESIS + offset);
            let available = net.a().registry.is_available("prop").unwrap();
            prop_assert_eq!(available, offset > PERIOD);
        }
    }

    // =============================================================================
    // COMMIT PATH
    // =============================================================================

    #[tokio::test]
    async fn test_round_trip_preserves_provenance() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "a", true);
        let original = net.a().registry.get_domain_info("a").unwrap();

        let record = net
            .a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        assert_eq!(record.state, TransferState::Initiated);

        // Destination reads NotFound-equivalent while in flight.
        assert_eq!(net.b().registry.owner_of("a").unwrap(), Address::ZERO);

        let outcomes = net.relay();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].result, DeliveryResult::Executed);

        let info = net.b().registry.get_domain_info("a").unwrap();
        assert_eq!(info.owner, BOB);
        assert!(info.is_omnichain);
        assert_eq!(info.source_chain_id, CHAIN_A);
        assert_eq!(info.source_chain_id, original.source_chain_id);
        assert_eq!(info.expires_at, original.expires_at);

        assert_eq!(
            net.a().transfer.transfer_status(&record.id),
            Some(TransferState::Committed)
        );
        assert_eq!(
            net.b().transfer.transfer_status(&record.id),
            Some(TransferState::Committed)
        );
    }

    #[tokio::test]
    async fn test_completion_signals_are_published() {
        let net = TestNetwork::new();
        let mut sub = net
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::CrossChain]));
        net.register_on_a(ALICE, "a", true);

        let record = net
            .a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        net.relay();

        let events = sub.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            NameServiceEvent::TransferInitiated { transfer_id, target_chain, .. }
                if *transfer_id == record.id.0 && *target_chain == CHAIN_B
        ));
        assert!(matches!(
            &events[1],
            NameServiceEvent::TransferCommitted { chain, owner, .. }
                if *chain == CHAIN_B && *owner == BOB
        ));
    }

    #[tokio::test]
    async fn test_name_travels_back_to_source() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "a", true);

        net.a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        net.relay();
        net.b()
            .transfer
            .cross_chain_transfer(BOB, "a", CAROL, CHAIN_A, GAS)
            .await
            .unwrap();
        assert_eq!(net.live_copies("a"), 0);
        net.relay();

        let info = net.a().registry.get_domain_info("a").unwrap();
        assert_eq!(info.owner, CAROL);
        assert_eq!(info.source_chain_id, CHAIN_A);
        assert_eq!(net.live_copies("a"), 1);
    }

    // =============================================================================
    // IDEMPOTENCE
    // =============================================================================

    #[tokio::test]
    async fn test_replayed_mint_is_refused_without_side_effects() {
        let net = TestNetwork::new();
        let mut faults = net
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::DeadLetterQueue]));
        net.register_on_a(ALICE, "a", true);
        let record = net
            .a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        net.relay();
        let before = net.b().registry.get_domain_info("a").unwrap();

        let payload = encode_payload(&TransferPayload {
            transfer_id: record.id,
            nonce: record.nonce,
            snapshot: TransferSnapshot {
                name: DomainName::parse("a", "omni", 253).unwrap(),
                from: ALICE,
                to: CAROL,
                expires_at: before.expires_at,
                source_chain_id: CHAIN_A,
                is_omnichain: true,
                burned_on: CHAIN_A,
                target_chain_id: CHAIN_B,
            },
        })
        .unwrap();
        let ctx = MessageContext {
            message_id: MessageId::new(),
            source_chain: CHAIN_A,
            sender: net.a().transfer.address(),
        };

        assert_eq!(
            net.b().transfer.on_call(&ctx, &payload),
            Err(TransferError::DuplicateExecution(record.id))
        );
        assert_eq!(net.b().registry.get_domain_info("a").unwrap(), before);
        assert!(matches!(
            faults.drain().as_slice(),
            [NameServiceEvent::ConsistencyFault { chain, .. }] if *chain == CHAIN_B
        ));
    }

    // =============================================================================
    // SINGLE LIVE COPY
    // =============================================================================

    #[tokio::test]
    async fn test_at_most_one_live_copy_throughout() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "a", true);
        assert!(net.single_live_copy("a"));
        assert_eq!(net.live_copies("a"), 1);

        net.a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        // Mid-flight: burned on A, not yet minted on B.
        assert!(net.single_live_copy("a"));
        assert_eq!(net.live_copies("a"), 0);

        net.relay();
        assert!(net.single_live_copy("a"));
        assert_eq!(net.live_copies("a"), 1);

        // The departed name stays reserved on A.
        assert!(!net.a().registry.is_available("a").unwrap());
        assert!(matches!(
            net.a().registry.register(CAROL, "a", false, 100),
            Err(RegistryError::AlreadyRegistered(_))
        ));
        assert!(net.single_live_copy("a"));
    }

    #[tokio::test]
    async fn test_destination_renewal_keeps_source_reserved() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "a", true);
        net.a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        net.relay();

        let renewed = net.b().registry.renew(BOB, "a", 50).unwrap();
        assert_eq!(renewed, GENESIS + 2 * PERIOD);

        // Past the expiry carried by A's tombstone, still live on B.
        net.clock.set(GENESIS + PERIOD + PERIOD / 2);
        assert!(!net.a().registry.is_available("a").unwrap());
        assert!(matches!(
            net.a()
                .registry
                .register(CAROL, "a", false, u128::from(REGISTRATION_FEE)),
            Err(RegistryError::AlreadyRegistered(_))
        ));
        assert!(!net.a().registry.reclaim_expired("a").unwrap());

        assert_eq!(net.b().registry.owner_of("a").unwrap(), BOB);
        assert_eq!(net.live_copies("a"), 1);
        assert!(net.single_live_copy("a"));
    }

    // =============================================================================
    // OMNICHAIN GATE
    // =============================================================================

    #[tokio::test]
    async fn test_plain_name_needs_upgrade_before_transfer() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "test", false);

        let err = net
            .a()
            .transfer
            .cross_chain_transfer(ALICE, "test", BOB, CHAIN_B, GAS)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransferError::Registry(RegistryError::NotOmnichain(_))
        ));
        assert_eq!(net.a().registry.owner_of("test").unwrap(), ALICE);
        assert_eq!(net.runtime.gateway().pending_count(), 0);

        net.a()
            .registry
            .upgrade_to_omnichain(ALICE, "test", u128::from(UPGRADE_FEE))
            .unwrap();
        net.a()
            .transfer
            .cross_chain_transfer(ALICE, "test", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        assert_eq!(net.a().registry.owner_of("test").unwrap(), Address::ZERO);
        assert_eq!(net.runtime.gateway().pending_count(), 1);
    }

    // =============================================================================
    // COMPENSATION
    // =============================================================================

    #[tokio::test]
    async fn test_occupied_destination_reverts_to_sender() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "a", true);
        net.b()
            .registry
            .register(CAROL, "a", false, u128::from(REGISTRATION_FEE))
            .unwrap();

        let record = net
            .a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();
        let outcomes = net.relay();
        assert!(matches!(outcomes[0].result, DeliveryResult::Reverted { .. }));

        assert_eq!(net.a().registry.owner_of("a").unwrap(), ALICE);
        assert_eq!(net.b().registry.owner_of("a").unwrap(), CAROL);
        assert_eq!(
            net.a().transfer.transfer_status(&record.id),
            Some(TransferState::Reverted)
        );
    }

    #[tokio::test]
    async fn test_gateway_abort_restores_sender() {
        let net = TestNetwork::new();
        net.register_on_a(ALICE, "a", true);
        let record = net
            .a()
            .transfer
            .cross_chain_transfer(ALICE, "a", BOB, CHAIN_B, GAS)
            .await
            .unwrap();

        let outcome = net
            .runtime
            .gateway()
            .abort(record.message_id.unwrap(), "destination halted")
            .unwrap();
        assert!(matches!(outcome.result, DeliveryResult::Aborted { .. }));
        assert_eq!(net.a().registry.owner_of("a").unwrap(), ALICE);
        assert_eq!(net.b().registry.owner_of("a").unwrap(), Address::ZERO);
        assert_eq!(
            net.a().transfer.transfer_status(&record.id),
            Some(TransferState::Aborted)
        );
        assert!(net.relay().is_empty());
    }
}
