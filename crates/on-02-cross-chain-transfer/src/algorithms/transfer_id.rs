//! # Transfer Identifiers
//!
//! `SHA-256(len(name) || name || source || target || nonce)`, all integers
//! big-endian. The length prefix keeps distinct names from colliding.

use crate::domain::TransferId;
use sha2::{Digest, Sha256};
use shared_types::ChainId;

/// Derive the identifier for one transfer attempt.
pub fn derive_transfer_id(name: &str, source: ChainId, target: ChainId, nonce: u64) -> TransferId {
    let mut hasher = Sha256::new();
    hasher.update((name.len() as u64).to_be_bytes());
    hasher.update(name.as_bytes());
    hasher.update(source.value().to_be_bytes());
    hasher.update(target.value().to_be_bytes());
    hasher.update(nonce.to_be_bytes());
    TransferId(hasher.finalize().into())
}
