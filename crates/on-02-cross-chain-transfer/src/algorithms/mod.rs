//! # Algorithms Module
//!
//! Transfer identifiers, wire encoding and the idempotency ledger.

pub mod codec;
pub mod execution_ledger;
pub mod transfer_id;

pub use codec::{decode_payload, decode_revert, encode_payload, encode_revert};
pub use execution_ledger::ExecutionLedger;
pub use transfer_id::derive_transfer_id;
