//! In-memory omnichain gateway.
//!
//! Calls are queued on dispatch and only executed when a relayer (or a
//! test) asks for delivery, so the `Initiated` window is observable.
//! Messages no handler could resolve are parked until an operator retries
//! the abort path.

use crate::domain::{MessageId, TransferError};
use crate::ports::outbound::{
    DispatchReceipt, Gateway, GatewayCall, GatewayReceiver, MessageContext, RevertContext,
};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared_types::{Address, Amount, ChainId};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
struct Endpoint {
    address: Address,
    receiver: Arc<dyn GatewayReceiver>,
}

struct QueuedMessage {
    id: MessageId,
    call: GatewayCall,
}

impl QueuedMessage {
    fn receipt(&self) -> DispatchReceipt {
        DispatchReceipt {
            message_id: self.id,
            source_chain: self.call.source_chain,
            target_chain: self.call.target_chain,
        }
    }
}

/// How a message was resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryResult {
    /// Destination handler succeeded.
    Executed,
    /// Destination failed; source revert handler ran.
    Reverted {
        /// Destination failure.
        reason: String,
    },
    /// Source abort handler ran.
    Aborted {
        /// Why the message was abandoned.
        reason: String,
    },
    /// No handler could resolve the message; it is parked for
    /// [`InMemoryGateway::retry_abort`].
    Unresolved {
        /// Last failure.
        reason: String,
    },
}

/// Result of delivering one message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryOutcome {
    /// Gateway message.
    pub message_id: MessageId,
    /// Source chain.
    pub source_chain: ChainId,
    /// Destination chain.
    pub target_chain: ChainId,
    /// Resolution.
    pub result: DeliveryResult,
}

/// Queue-backed gateway connecting the transfer contracts of several chains.
#[derive(Default)]
pub struct InMemoryGateway {
    endpoints: RwLock<HashMap<ChainId, Endpoint>>,
    queue: Mutex<VecDeque<QueuedMessage>>,
    unresolved: Mutex<Vec<QueuedMessage>>,
    gas_collected: Mutex<Amount>,
    delivered: AtomicU64,
}

impl InMemoryGateway {
    /// Create a gateway with no connected chains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect the contract at `address` on `chain`.
    pub fn connect(&self, chain: ChainId, address: Address, receiver: Arc<dyn GatewayReceiver>) {
        info!("[on-02] Gateway connected {} at {}", chain, address);
        self.endpoints
            .write()
            .insert(chain, Endpoint { address, receiver });
    }

    /// Queued messages, oldest first.
    pub fn pending(&self) -> Vec<DispatchReceipt> {
        self.queue.lock().iter().map(QueuedMessage::receipt).collect()
    }

    /// Parked messages whose revert and abort handlers both failed.
    pub fn unresolved(&self) -> Vec<DispatchReceipt> {
        self.unresolved
            .lock()
            .iter()
            .map(QueuedMessage::receipt)
            .collect()
    }

    /// Number of parked messages.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.lock().len()
    }

    /// Number of queued messages.
    pub fn pending_count(&self) -> usize {
        self.queue.lock().len()
    }

    /// Gas paid by all dispatched calls.
    pub fn gas_collected(&self) -> Amount {
        *self.gas_collected.lock()
    }

    /// Messages resolved so far (executed, reverted or aborted).
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    /// Execute one queued message.
    pub fn deliver(&self, id: MessageId) -> Result<DeliveryOutcome, TransferError> {
        let message = self.take(id)?;
        Ok(self.execute(message))
    }

    /// Execute the oldest queued message.
    pub fn deliver_next(&self) -> Option<DeliveryOutcome> {
        let message = self.queue.lock().pop_front()?;
        Some(self.execute(message))
    }

    /// Execute every queued message in order.
    pub fn deliver_all(&self) -> Vec<DeliveryOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.deliver_next() {
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Abandon a queued message without executing it on the destination.
    pub fn abort(&self, id: MessageId, reason: &str) -> Result<DeliveryOutcome, TransferError> {
        let message = self.take(id)?;
        let result = self.resolve_abort(&message, reason.to_string());
        Ok(self.finish(message, result))
    }

    /// Run the abort handler again for a parked message.
    ///
    /// The message stays parked if the handler still fails.
    pub fn retry_abort(
        &self,
        id: MessageId,
        reason: &str,
    ) -> Result<DeliveryOutcome, TransferError> {
        let message = {
            let mut parked = self.unresolved.lock();
            let index = parked
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| TransferError::Gateway(format!("no unresolved message {id}")))?;
            parked.remove(index)
        };
        info!("[on-02] Retrying abort of {}: {}", id, reason);
        let result = self.resolve_abort(&message, reason.to_string());
        Ok(self.finish(message, result))
    }

    fn take(&self, id: MessageId) -> Result<QueuedMessage, TransferError> {
        let mut queue = self.queue.lock();
        let index = queue
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| TransferError::Gateway(format!("unknown message {id}")))?;
        queue
            .remove(index)
            .ok_or_else(|| TransferError::Gateway(format!("unknown message {id}")))
    }

    fn endpoint(&self, chain: ChainId) -> Option<Endpoint> {
        self.endpoints.read().get(&chain).cloned()
    }

    fn execute(&self, message: QueuedMessage) -> DeliveryOutcome {
        let call = &message.call;
        let Some(destination) = self.endpoint(call.target_chain) else {
            let result =
                self.resolve_abort(&message, format!("no receiver on {}", call.target_chain));
            return self.finish(message, result);
        };

        let outcome = if destination.address != call.receiver {
            Err(TransferError::Gateway(format!(
                "receiver {} not deployed on {}",
                call.receiver, call.target_chain
            )))
        } else {
            let ctx = MessageContext {
                message_id: message.id,
                source_chain: call.source_chain,
                sender: call.sender,
            };
            destination.receiver.on_call(&ctx, &call.payload)
        };

        let result = match outcome {
            Ok(()) => {
                if let Some(source) = self.endpoint(call.source_chain) {
                    if let Err(e) = source.receiver.acknowledge_commit(message.id) {
                        warn!("[on-02] Commit acknowledgement for {} failed: {}", message.id, e);
                    }
                }
                DeliveryResult::Executed
            }
            Err(e) if call.revert_options.call_on_revert => self.resolve_revert(&message, e.to_string()),
            Err(e) => self.resolve_abort(&message, e.to_string()),
        };
        self.finish(message, result)
    }

    fn resolve_revert(&self, message: &QueuedMessage, reason: String) -> DeliveryResult {
        let options = &message.call.revert_options;
        let handler = self
            .endpoint(message.call.source_chain)
            .filter(|ep| ep.address == options.revert_address);
        let Some(source) = handler else {
            return self.resolve_abort(message, format!("no revert handler: {reason}"));
        };

        match source.receiver.on_revert(&Self::revert_context(message, &reason)) {
            Ok(()) => DeliveryResult::Reverted { reason },
            Err(e) => {
                warn!("[on-02] Revert handler for {} failed: {}", message.id, e);
                self.resolve_abort(message, format!("revert failed: {e}"))
            }
        }
    }

    fn resolve_abort(&self, message: &QueuedMessage, reason: String) -> DeliveryResult {
        let options = &message.call.revert_options;
        let handler = self
            .endpoint(message.call.source_chain)
            .filter(|ep| ep.address == options.abort_address);
        let Some(source) = handler else {
            error!("[on-02] No abort handler for {}: {}", message.id, reason);
            return DeliveryResult::Unresolved { reason };
        };

        match source.receiver.on_abort(&Self::revert_context(message, &reason)) {
            Ok(()) => DeliveryResult::Aborted { reason },
            Err(e) => {
                error!("[on-02] Abort handler for {} failed: {}", message.id, e);
                DeliveryResult::Unresolved {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn revert_context(message: &QueuedMessage, reason: &str) -> RevertContext {
        RevertContext {
            message_id: message.id,
            target_chain: message.call.target_chain,
            revert_message: message.call.revert_options.revert_message.clone(),
            reason: reason.to_string(),
        }
    }

    fn finish(&self, message: QueuedMessage, result: DeliveryResult) -> DeliveryOutcome {
        let outcome = DeliveryOutcome {
            message_id: message.id,
            source_chain: message.call.source_chain,
            target_chain: message.call.target_chain,
            result,
        };
        if matches!(outcome.result, DeliveryResult::Unresolved { .. }) {
            warn!("[on-02] Message {} parked as unresolved", message.id);
            self.unresolved.lock().push(message);
        } else {
            self.delivered.fetch_add(1, Ordering::Relaxed);
            debug!("[on-02] Message {} resolved: {:?}", message.id, outcome.result);
        }
        outcome
    }
}

#[async_trait]
impl Gateway for InMemoryGateway {
    async fn call(&self, call: GatewayCall) -> Result<DispatchReceipt, TransferError> {
        if call.source_chain == call.target_chain {
            return Err(TransferError::Gateway(format!(
                "source and target are both {}",
                call.source_chain
            )));
        }
        if self.endpoint(call.target_chain).is_none() {
            return Err(TransferError::Gateway(format!(
                "no route to {}",
                call.target_chain
            )));
        }

        let receipt = DispatchReceipt {
            message_id: MessageId::new(),
            source_chain: call.source_chain,
            target_chain: call.target_chain,
        };
        *self.gas_collected.lock() += call.gas_payment;
        self.queue.lock().push_back(QueuedMessage {
            id: receipt.message_id,
            call,
        });
        debug!(
            "[on-02] Queued {} from {} to {}",
            receipt.message_id, receipt.source_chain, receipt.target_chain
        );
        Ok(receipt)
    }
}
