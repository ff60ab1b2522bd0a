//! # Wire Codec
//!
//! `bincode` encoding of gateway payloads and revert messages.

use crate::domain::{RevertEnvelope, TransferError, TransferPayload};

/// Encode the destination payload.
pub fn encode_payload(payload: &TransferPayload) -> Result<Vec<u8>, TransferError> {
    bincode::serialize(payload).map_err(|e| TransferError::Decode(format!("encode payload: {e}")))
}

/// Decode the destination payload.
pub fn decode_payload(bytes: &[u8]) -> Result<TransferPayload, TransferError> {
    bincode::deserialize(bytes).map_err(|e| TransferError::Decode(format!("payload: {e}")))
}

/// Encode the revert message.
pub fn encode_revert(envelope: &RevertEnvelope) -> Result<Vec<u8>, TransferError> {
    bincode::serialize(envelope).map_err(|e| TransferError::Decode(format!("encode revert: {e}")))
}

/// Decode the revert message.
pub fn decode_revert(bytes: &[u8]) -> Result<RevertEnvelope, TransferError> {
    bincode::deserialize(bytes).map_err(|e| TransferError::Decode(format!("revert message: {e}")))
}
