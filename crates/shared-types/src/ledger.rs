//! # Native Currency Ledger
//!
//! Outbound payment primitive of a chain: value attached to a call is held
//! by the receiving component, which pays out through this port (sale
//! proceeds, refunds, fee sweeps).

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

use crate::entities::{Address, Amount};
use crate::errors::LedgerError;

/// Per-chain native currency transfers.
pub trait NativeLedger: Send + Sync {
    /// Credit `amount` to `to`.
    fn credit(&self, to: Address, amount: Amount) -> Result<(), LedgerError>;

    /// Credit every `(account, amount)` pair, or none of them.
    fn credit_all(&self, payouts: &[(Address, Amount)]) -> Result<(), LedgerError>;

    /// Current balance of `account`.
    fn balance_of(&self, account: &Address) -> Amount;
}

/// In-memory ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: RwLock<HashMap<Address, Amount>>,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn check(
        balances: &HashMap<Address, Amount>,
        pending: &HashMap<Address, Amount>,
        to: Address,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::ZeroRecipient);
        }
        let current = pending
            .get(&to)
            .or_else(|| balances.get(&to))
            .copied()
            .unwrap_or(0);
        current
            .checked_add(amount)
            .ok_or(LedgerError::Overflow { account: to, amount })
    }
}

impl NativeLedger for InMemoryLedger {
    fn credit(&self, to: Address, amount: Amount) -> Result<(), LedgerError> {
        self.credit_all(&[(to, amount)])
    }

    fn credit_all(&self, payouts: &[(Address, Amount)]) -> Result<(), LedgerError> {
        let mut balances = self.balances.write();
        let mut pending: HashMap<Address, Amount> = HashMap::new();
        for (to, amount) in payouts.iter().filter(|(_, amount)| *amount > 0) {
            let next = Self::check(&balances, &pending, *to, *amount)?;
            pending.insert(*to, next);
        }
        for (to, balance) in pending {
            debug!(account = %to, balance, "ledger credit");
            balances.insert(to, balance);
        }
        Ok(())
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.read().get(account).copied().unwrap_or(0)
    }
}
