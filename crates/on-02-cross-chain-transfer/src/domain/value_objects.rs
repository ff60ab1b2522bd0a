//! # Domain Value Objects
//!
//! Identifiers, transfer state machine and gateway revert options.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};
use std::fmt;
use uuid::Uuid;

/// Transfer identifier: SHA-256 over `{name, source, target, nonce}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransferId(pub Hash);

impl TransferId {
    /// Raw bytes.
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for TransferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0[..8]))
    }
}

/// Gateway message identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Transfer state machine.
///
/// ```text
/// Initiated ──► Committed
///     │
///     ├──────► Reverted
///     └──────► Aborted
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TransferState {
    /// Burned on source, message dispatched.
    #[default]
    Initiated,
    /// Minted on destination.
    Committed,
    /// Destination rejected; record restored on source.
    Reverted,
    /// Message undeliverable; record restored on source.
    Aborted,
}

impl TransferState {
    /// Check if transition to next state is valid.
    pub fn can_transition_to(&self, next: TransferState) -> bool {
        matches!(
            (self, next),
            (Self::Initiated, Self::Committed)
                | (Self::Initiated, Self::Reverted)
                | (Self::Initiated, Self::Aborted)
        )
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Initiated)
    }
}

/// Which side of the transfer a handler runs on. Keys the idempotency ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferPhase {
    /// Destination mint.
    Mint,
    /// Source revert or abort. Shared so at most one of them runs.
    Resolve,
}

/// Whether a transfer left or arrived at this chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    /// Burned here.
    Outbound,
    /// Minted here.
    Inbound,
}

/// Gateway revert options attached to every outbound call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertOptions {
    /// Receives `on_revert` on the source chain.
    pub revert_address: Address,
    /// Route destination failures to `on_revert` (otherwise `on_abort`).
    pub call_on_revert: bool,
    /// Receives `on_abort` on the source chain.
    pub abort_address: Address,
    /// Opaque payload replayed to the revert/abort handler.
    pub revert_message: Vec<u8>,
    /// Gas limit for the revert handler.
    pub on_revert_gas_limit: u64,
}
