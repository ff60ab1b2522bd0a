//! # Error Types
//!
//! Errors shared across components.

use thiserror::Error;

use crate::entities::{Address, Amount};

/// Failure to parse a textual account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// Wrong number of hex digits (expected 40).
    #[error("Invalid address length: {0} hex digits, expected 40")]
    InvalidLength(usize),

    /// Non-hex characters.
    #[error("Invalid address hex: {0}")]
    InvalidHex(String),
}

/// Errors from the native-currency ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Crediting would overflow the recipient balance.
    #[error("Balance overflow crediting {amount} to {account}")]
    Overflow {
        /// Recipient.
        account: Address,
        /// Amount that could not be credited.
        amount: Amount,
    },

    /// Payments to the zero sentinel are refused.
    #[error("Cannot pay the zero address")]
    ZeroRecipient,
}
