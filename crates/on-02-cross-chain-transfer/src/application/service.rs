//! # Cross-Chain Transfer Service
//!
//! The transfer contract of one chain. Outbound it burns, records and
//! dispatches; inbound it mints, and on failure it restores the burned
//! record exactly once.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use on_01_domain_registry::{RegistryError, TransferHooks, TransferSnapshot};
use shared_bus::{EventPublisher, NameServiceEvent};
use shared_types::{Address, Amount, ChainId, Clock, NativeLedger};

use crate::algorithms::{
    decode_payload, decode_revert, derive_transfer_id, encode_payload, encode_revert,
    ExecutionLedger,
};
use crate::config::CrossChainConfig;
use crate::domain::{
    invariant_gas_covered, invariant_routable_target, invariant_trusted_sender,
    CrossChainTransferIntent, MessageId, RevertEnvelope, TransferDirection, TransferError,
    TransferId, TransferPayload, TransferPhase, TransferRecord, TransferState,
};
use crate::ports::{
    CrossChainTransferApi, DispatchReceipt, Gateway, GatewayCall, GatewayReceiver,
    MessageContext, RevertContext,
};

/// Outbound transfer burned and recorded, not yet handed to the gateway.
struct Prepared {
    record: TransferRecord,
    snapshot: TransferSnapshot,
    call: GatewayCall,
    refund: Amount,
}

/// Cross-Chain Transfer Service - one chain's transfer contract.
pub struct CrossChainTransferService {
    config: CrossChainConfig,
    registry: Arc<dyn TransferHooks>,
    gateway: Arc<dyn Gateway>,
    clock: Arc<dyn Clock>,
    ledger: Arc<dyn NativeLedger>,
    events: Arc<dyn EventPublisher>,
    transfers: RwLock<HashMap<TransferId, TransferRecord>>,
    by_message: RwLock<HashMap<MessageId, TransferId>>,
    early_acks: Mutex<HashSet<MessageId>>,
    executions: Mutex<ExecutionLedger>,
    next_nonce: Mutex<u64>,
    tx_lock: Mutex<()>,
}

impl CrossChainTransferService {
    /// Create the service. The registry must name `config.contract_address`
    /// as its transfer agent.
    pub fn new(
        config: CrossChainConfig,
        registry: Arc<dyn TransferHooks>,
        gateway: Arc<dyn Gateway>,
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn NativeLedger>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            config,
            registry,
            gateway,
            clock,
            ledger,
            events,
            transfers: RwLock::new(HashMap::new()),
            by_message: RwLock::new(HashMap::new()),
            early_acks: Mutex::new(HashSet::new()),
            executions: Mutex::new(ExecutionLedger::new()),
            next_nonce: Mutex::new(0),
            tx_lock: Mutex::new(()),
        }
    }

    /// Configuration.
    pub fn config(&self) -> &CrossChainConfig {
        &self.config
    }

    /// Chain this contract lives on.
    pub fn chain_id(&self) -> ChainId {
        self.config.chain_id
    }

    /// Address of this contract.
    pub fn address(&self) -> Address {
        self.config.contract_address
    }

    /// Nonce the next outbound transfer will use.
    pub fn next_nonce(&self) -> u64 {
        *self.next_nonce.lock()
    }

    /// Every transfer known to this chain.
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.transfers.read().values().cloned().collect()
    }

    /// Transfer dispatched as `message_id`.
    pub fn transfer_by_message(&self, message_id: MessageId) -> Option<TransferRecord> {
        let id = self.by_message.read().get(&message_id).copied()?;
        self.transfer(&id)
    }

    fn prepare(
        &self,
        caller: Address,
        name: &str,
        to: Address,
        target_chain: ChainId,
        payment: Amount,
    ) -> Result<Prepared, TransferError> {
        let _tx = self.tx_lock.lock();
        let receiver = invariant_routable_target(&self.config, target_chain)?;
        if to.is_zero() {
            return Err(TransferError::InvalidRecipient(to));
        }
        let refund = invariant_gas_covered(self.config.destination_gas_fee, payment)?;

        let snapshot = self.registry.burn_for_outbound_transfer(
            self.config.contract_address,
            name,
            caller,
            to,
            target_chain,
        )?;

        let nonce = {
            let mut next = self.next_nonce.lock();
            let nonce = *next;
            *next += 1;
            nonce
        };
        let transfer_id =
            derive_transfer_id(snapshot.name.as_str(), self.config.chain_id, target_chain, nonce);

        let encoded = encode_payload(&TransferPayload {
            transfer_id,
            nonce,
            snapshot: snapshot.clone(),
        })
        .and_then(|payload| {
            let revert_message = encode_revert(&RevertEnvelope {
                transfer_id,
                snapshot: snapshot.clone(),
            })?;
            Ok((payload, revert_message))
        });
        let (payload, revert_message) = match encoded {
            Ok(encoded) => encoded,
            Err(e) => {
                self.undo_burn(transfer_id, &snapshot);
                return Err(e);
            }
        };

        let intent = CrossChainTransferIntent {
            transfer_id,
            name: snapshot.name.to_string(),
            to,
            target_chain_id: target_chain,
            source_chain_id: self.config.chain_id,
            revert_address: self.config.contract_address,
            abort_address: self.config.contract_address,
            revert_message,
            on_revert_gas_limit: self.config.on_revert_gas_limit,
        };
        debug!("[on-02] Prepared {:?}", intent.transfer_id);

        let record = TransferRecord::outbound(transfer_id, nonce, &snapshot, self.clock.now());
        self.transfers.write().insert(transfer_id, record.clone());

        let call = GatewayCall {
            source_chain: self.config.chain_id,
            sender: self.config.contract_address,
            target_chain,
            receiver,
            payload,
            revert_options: intent.revert_options(),
            gas_payment: self.config.destination_gas_fee,
        };
        Ok(Prepared {
            record,
            snapshot,
            call,
            refund,
        })
    }

    fn dispatched(
        &self,
        prepared: Prepared,
        caller: Address,
        receipt: DispatchReceipt,
    ) -> TransferRecord {
        let _tx = self.tx_lock.lock();
        let id = prepared.record.id;
        let mut record = prepared.record;
        if let Some(stored) = self.transfers.write().get_mut(&id) {
            stored.message_id = Some(receipt.message_id);
            record = stored.clone();
        }
        self.by_message.write().insert(receipt.message_id, id);

        if prepared.refund > 0 {
            if let Err(e) = self.ledger.credit(caller, prepared.refund) {
                error!("[on-02] Gas refund of {} to {} failed: {}", prepared.refund, caller, e);
            }
        }

        info!(
            "[on-02] Transfer {} of {} initiated: {} -> {} ({})",
            id, record.name, record.source_chain, record.target_chain, receipt.message_id
        );
        self.events.publish(NameServiceEvent::TransferInitiated {
            transfer_id: id.0,
            name: record.name.clone(),
            source_chain: record.source_chain,
            target_chain: record.target_chain,
            from: record.from,
            to: record.to,
        });

        // The relayer may have delivered before the receipt came back.
        if self.early_acks.lock().remove(&receipt.message_id) {
            if let Err(e) = self.commit_outbound(id) {
                warn!("[on-02] Deferred commit of {} failed: {}", id, e);
            }
            if let Some(stored) = self.transfers.read().get(&id) {
                record = stored.clone();
            }
        }
        record
    }

    fn refused(&self, prepared: &Prepared, reason: &TransferError) {
        let _tx = self.tx_lock.lock();
        self.transfers.write().remove(&prepared.record.id);
        self.undo_burn(prepared.record.id, &prepared.snapshot);
        warn!(
            "[on-02] Gateway refused transfer {} of {}: {}",
            prepared.record.id, prepared.record.name, reason
        );
    }

    fn undo_burn(&self, id: TransferId, snapshot: &TransferSnapshot) {
        if let Err(e) = self
            .registry
            .restore_after_failed_transfer(self.config.contract_address, snapshot)
        {
            self.fault(id, format!("burn of {} could not be undone: {e}", snapshot.name));
        }
    }

    fn commit_outbound(&self, id: TransferId) -> Result<(), TransferError> {
        let now = self.clock.now();
        let mut transfers = self.transfers.write();
        let record = transfers
            .get_mut(&id)
            .ok_or_else(|| TransferError::UnknownTransfer(id.to_string()))?;
        if record.state == TransferState::Committed {
            return Ok(());
        }
        if let Err(e) = record.transition_to(TransferState::Committed, now, None) {
            return Err(self.fault(id, format!("commit acknowledged after {e}")));
        }
        info!("[on-02] Transfer {} of {} committed", id, record.name);
        Ok(())
    }

    fn resolve(&self, ctx: &RevertContext, outcome: TransferState) -> Result<(), TransferError> {
        let _tx = self.tx_lock.lock();
        let envelope = decode_revert(&ctx.revert_message)?;
        let id = envelope.transfer_id;

        if self.executions.lock().is_executed(id, TransferPhase::Resolve) {
            return Err(self.duplicate(id));
        }
        let (state, name) = self
            .transfers
            .read()
            .get(&id)
            .map(|r| (r.state, r.name.clone()))
            .ok_or_else(|| TransferError::UnknownTransfer(id.to_string()))?;
        if !state.can_transition_to(outcome) {
            return Err(self.fault(id, format!("{outcome:?} requested in state {state:?}")));
        }
        if name != envelope.snapshot.name.as_str() {
            return Err(self.fault(id, format!("revert message names {}", envelope.snapshot.name)));
        }

        let restored = self
            .registry
            .restore_after_failed_transfer(self.config.contract_address, &envelope.snapshot)
            .map_err(|e| self.fault(id, format!("restore failed: {e}")))?;
        self.executions.lock().record(id, TransferPhase::Resolve);

        if let Some(record) = self.transfers.write().get_mut(&id) {
            record.transition_to(outcome, self.clock.now(), Some(ctx.reason.clone()))?;
        }

        warn!(
            "[on-02] Transfer {} of {} {:?}: {} (restored to {})",
            id, name, outcome, ctx.reason, restored.owner
        );
        let event = match outcome {
            TransferState::Aborted => NameServiceEvent::TransferAborted {
                transfer_id: id.0,
                name,
                chain: self.config.chain_id,
                owner: restored.owner,
            },
            _ => NameServiceEvent::TransferReverted {
                transfer_id: id.0,
                name,
                chain: self.config.chain_id,
                owner: restored.owner,
            },
        };
        self.events.publish(event);
        Ok(())
    }

    fn fault(&self, id: TransferId, detail: String) -> TransferError {
        error!("[on-02] CONSISTENCY FAULT on transfer {}: {}", id, detail);
        self.events.publish(NameServiceEvent::ConsistencyFault {
            chain: self.config.chain_id,
            component: "on-02".to_string(),
            detail: format!("transfer {id}: {detail}"),
        });
        TransferError::ConsistencyFault {
            transfer_id: id,
            detail,
        }
    }

    fn duplicate(&self, id: TransferId) -> TransferError {
        error!("[on-02] Duplicate execution of transfer {}", id);
        self.events.publish(NameServiceEvent::ConsistencyFault {
            chain: self.config.chain_id,
            component: "on-02".to_string(),
            detail: format!("transfer {id}: duplicate execution"),
        });
        TransferError::DuplicateExecution(id)
    }
}

#[async_trait]
impl CrossChainTransferApi for CrossChainTransferService {
    async fn cross_chain_transfer(
        &self,
        caller: Address,
        name: &str,
        to: Address,
        target_chain: ChainId,
        payment: Amount,
    ) -> Result<TransferRecord, TransferError> {
        let prepared = self.prepare(caller, name, to, target_chain, payment)?;
        match self.gateway.call(prepared.call.clone()).await {
            Ok(receipt) => Ok(self.dispatched(prepared, caller, receipt)),
            Err(e) => {
                self.refused(&prepared, &e);
                Err(e)
            }
        }
    }

    fn transfer_status(&self, id: &TransferId) -> Option<TransferState> {
        self.transfers.read().get(id).map(|r| r.state)
    }

    fn transfer(&self, id: &TransferId) -> Option<TransferRecord> {
        self.transfers.read().get(id).cloned()
    }

    fn pending_transfers(&self) -> Vec<TransferRecord> {
        let mut pending: Vec<_> = self
            .transfers
            .read()
            .values()
            .filter(|r| r.direction == TransferDirection::Outbound && r.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.nonce);
        pending
    }

    fn supported_chains(&self) -> Vec<ChainId> {
        self.config.chain_ids()
    }
}

impl GatewayReceiver for CrossChainTransferService {
    fn on_call(&self, ctx: &MessageContext, payload: &[u8]) -> Result<(), TransferError> {
        let _tx = self.tx_lock.lock();
        if let Err(e) = invariant_trusted_sender(&self.config, ctx.source_chain, ctx.sender) {
            warn!("[on-02] Rejected inbound {}: {}", ctx.message_id, e);
            return Err(e);
        }
        let payload = decode_payload(payload)?;
        let snapshot = &payload.snapshot;
        let id = payload.transfer_id;

        let expected = derive_transfer_id(
            snapshot.name.as_str(),
            snapshot.burned_on,
            snapshot.target_chain_id,
            payload.nonce,
        );
        if expected != id || snapshot.burned_on != ctx.source_chain {
            return Err(TransferError::Decode(format!(
                "transfer id {id} does not match its payload"
            )));
        }
        if self.executions.lock().is_executed(id, TransferPhase::Mint) {
            return Err(self.duplicate(id));
        }

        match self
            .registry
            .mint_from_inbound_transfer(self.config.contract_address, snapshot)
        {
            Ok(_) => {}
            Err(RegistryError::AlreadyRegistered(name)) => {
                return Err(self.fault(id, format!("live record for {name} already present")));
            }
            Err(e) => return Err(e.into()),
        }
        self.executions.lock().record(id, TransferPhase::Mint);

        let record = TransferRecord::inbound(&payload, ctx.message_id, self.clock.now());
        self.transfers.write().insert(id, record);

        info!(
            "[on-02] Transfer {} of {} committed on {} for {}",
            id, snapshot.name, self.config.chain_id, snapshot.to
        );
        self.events.publish(NameServiceEvent::TransferCommitted {
            transfer_id: id.0,
            name: snapshot.name.to_string(),
            chain: self.config.chain_id,
            owner: snapshot.to,
        });
        Ok(())
    }

    fn on_revert(&self, ctx: &RevertContext) -> Result<(), TransferError> {
        self.resolve(ctx, TransferState::Reverted)
    }

    fn on_abort(&self, ctx: &RevertContext) -> Result<(), TransferError> {
        self.resolve(ctx, TransferState::Aborted)
    }

    fn acknowledge_commit(&self, message_id: MessageId) -> Result<(), TransferError> {
        let _tx = self.tx_lock.lock();
        let id = self.by_message.read().get(&message_id).copied();
        match id {
            Some(id) => self.commit_outbound(id),
            None => {
                debug!("[on-02] Commit for {} arrived before its receipt", message_id);
                self.early_acks.lock().insert(message_id);
                Ok(())
            }
        }
    }
}
