//! # Outbound Ports
//!
//! The omnichain messaging gateway and the contexts it hands back to
//! receivers.

use crate::domain::{MessageId, RevertOptions, TransferError};
use async_trait::async_trait;
use shared_types::{Address, Amount, ChainId};

/// One outbound gateway call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GatewayCall {
    /// Chain the call is made from.
    pub source_chain: ChainId,
    /// Calling contract.
    pub sender: Address,
    /// Destination chain.
    pub target_chain: ChainId,
    /// Destination contract.
    pub receiver: Address,
    /// Opaque payload for the destination's `on_call`.
    pub payload: Vec<u8>,
    /// Revert/abort routing.
    pub revert_options: RevertOptions,
    /// Value paid for destination execution.
    pub gas_payment: Amount,
}

/// Returned when the gateway accepts a call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// Gateway message.
    pub message_id: MessageId,
    /// Source chain.
    pub source_chain: ChainId,
    /// Destination chain.
    pub target_chain: ChainId,
}

/// Omnichain messaging gateway - outbound port.
///
/// The gateway executes the destination handler at most once per message,
/// and at most one of the revert/abort handlers.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Queue a call. An error means nothing was queued.
    async fn call(&self, call: GatewayCall) -> Result<DispatchReceipt, TransferError>;
}

/// Context of a destination delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageContext {
    /// Gateway message.
    pub message_id: MessageId,
    /// Chain the call came from.
    pub source_chain: ChainId,
    /// Calling contract on that chain.
    pub sender: Address,
}

/// Context of a source-side revert or abort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevertContext {
    /// Gateway message.
    pub message_id: MessageId,
    /// Destination that failed.
    pub target_chain: ChainId,
    /// The `revert_message` from the original call.
    pub revert_message: Vec<u8>,
    /// Why the call failed.
    pub reason: String,
}

/// Contract side of the gateway: handlers the gateway invokes.
pub trait GatewayReceiver: Send + Sync {
    /// Destination handler.
    fn on_call(&self, ctx: &MessageContext, payload: &[u8]) -> Result<(), TransferError>;

    /// Source handler after the destination failed.
    fn on_revert(&self, ctx: &RevertContext) -> Result<(), TransferError>;

    /// Source handler when the message could not be executed at all.
    fn on_abort(&self, ctx: &RevertContext) -> Result<(), TransferError>;

    /// Source notification that the destination handler succeeded.
    fn acknowledge_commit(&self, message_id: MessageId) -> Result<(), TransferError>;
}
