//! # Domain Entities
//!
//! The in-flight intent, its wire forms and the per-transfer record.

use super::errors::TransferError;
use super::value_objects::{MessageId, RevertOptions, TransferDirection, TransferId, TransferState};
use on_01_domain_registry::TransferSnapshot;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId, Timestamp};

/// Ephemeral description of one outbound transfer, built after the burn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossChainTransferIntent {
    /// Transfer identifier.
    pub transfer_id: TransferId,
    /// Normalised name.
    pub name: String,
    /// Destination owner.
    pub to: Address,
    /// Destination chain.
    pub target_chain_id: ChainId,
    /// Chain the name was burned on.
    pub source_chain_id: ChainId,
    /// Receives the revert call.
    pub revert_address: Address,
    /// Receives the abort call.
    pub abort_address: Address,
    /// Encoded [`RevertEnvelope`].
    pub revert_message: Vec<u8>,
    /// Gas limit for the revert handler.
    pub on_revert_gas_limit: u64,
}

impl CrossChainTransferIntent {
    /// Gateway revert options. Failures always go through `on_revert`.
    pub fn revert_options(&self) -> RevertOptions {
        RevertOptions {
            revert_address: self.revert_address,
            call_on_revert: true,
            abort_address: self.abort_address,
            revert_message: self.revert_message.clone(),
            on_revert_gas_limit: self.on_revert_gas_limit,
        }
    }
}

/// Payload delivered to the destination's inbound handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    /// Transfer identifier.
    pub transfer_id: TransferId,
    /// Source-chain nonce the identifier was derived from.
    pub nonce: u64,
    /// Record to mint.
    pub snapshot: TransferSnapshot,
}

/// Revert message replayed to the source on failure. Carries the whole
/// snapshot since the source record was cleared by the burn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertEnvelope {
    /// Transfer identifier.
    pub transfer_id: TransferId,
    /// Record to restore.
    pub snapshot: TransferSnapshot,
}

/// Per-transfer record, kept until (and after) a terminal state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Transfer identifier.
    pub id: TransferId,
    /// Outbound or inbound from this chain's point of view.
    pub direction: TransferDirection,
    /// Normalised name.
    pub name: String,
    /// Owner before the burn.
    pub from: Address,
    /// Destination owner.
    pub to: Address,
    /// Burn chain.
    pub source_chain: ChainId,
    /// Mint chain.
    pub target_chain: ChainId,
    /// Source nonce.
    pub nonce: u64,
    /// Current state.
    pub state: TransferState,
    /// Gateway message, once dispatched.
    pub message_id: Option<MessageId>,
    /// When this chain created the record.
    pub created_at: Timestamp,
    /// When a terminal state was reached.
    pub resolved_at: Option<Timestamp>,
    /// Failure reason for reverted or aborted transfers.
    pub failure_reason: Option<String>,
}

impl TransferRecord {
    /// Outbound record right after the burn.
    pub fn outbound(id: TransferId, nonce: u64, snapshot: &TransferSnapshot, now: Timestamp) -> Self {
        Self {
            id,
            direction: TransferDirection::Outbound,
            name: snapshot.name.to_string(),
            from: snapshot.from,
            to: snapshot.to,
            source_chain: snapshot.burned_on,
            target_chain: snapshot.target_chain_id,
            nonce,
            state: TransferState::Initiated,
            message_id: None,
            created_at: now,
            resolved_at: None,
            failure_reason: None,
        }
    }

    /// Inbound record after a successful mint.
    pub fn inbound(payload: &TransferPayload, message_id: MessageId, now: Timestamp) -> Self {
        Self {
            state: TransferState::Committed,
            direction: TransferDirection::Inbound,
            message_id: Some(message_id),
            resolved_at: Some(now),
            ..Self::outbound(payload.transfer_id, payload.nonce, &payload.snapshot, now)
        }
    }

    /// Move to `next`, recording the time and an optional failure reason.
    pub fn transition_to(
        &mut self,
        next: TransferState,
        now: Timestamp,
        reason: Option<String>,
    ) -> Result<(), TransferError> {
        if !self.state.can_transition_to(next) {
            return Err(TransferError::InvalidTransition {
                from: format!("{:?}", self.state),
                to: format!("{:?}", next),
            });
        }
        self.state = next;
        if next.is_terminal() {
            self.resolved_at = Some(now);
        }
        self.failure_reason = reason;
        Ok(())
    }

    /// Still waiting for a resolution.
    pub fn is_pending(&self) -> bool {
        !self.state.is_terminal()
    }
}
