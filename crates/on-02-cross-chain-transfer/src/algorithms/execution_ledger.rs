//! # Execution Ledger
//!
//! Remembers which `(transfer, phase)` handlers already ran on this chain.
//! Callers check before acting and record only after the action succeeded,
//! inside the same chain transaction.

use crate::domain::{TransferError, TransferId, TransferPhase};
use std::collections::HashSet;

/// Idempotency ledger.
#[derive(Debug, Default)]
pub struct ExecutionLedger {
    executed: HashSet<(TransferId, TransferPhase)>,
}

impl ExecutionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `DuplicateExecution` if the handler already ran.
    pub fn check(&self, id: TransferId, phase: TransferPhase) -> Result<(), TransferError> {
        if self.executed.contains(&(id, phase)) {
            return Err(TransferError::DuplicateExecution(id));
        }
        Ok(())
    }

    /// Record a successful execution.
    pub fn record(&mut self, id: TransferId, phase: TransferPhase) {
        self.executed.insert((id, phase));
    }

    /// Whether the handler already ran.
    pub fn is_executed(&self, id: TransferId, phase: TransferPhase) -> bool {
        self.executed.contains(&(id, phase))
    }

    /// Number of recorded executions.
    pub fn len(&self) -> usize {
        self.executed.len()
    }

    /// True if nothing ran yet.
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_execution_rejected() {
        let mut ledger = ExecutionLedger::new();
        let id = TransferId([1; 32]);
        ledger.check(id, TransferPhase::Mint).unwrap();
        ledger.record(id, TransferPhase::Mint);
        assert_eq!(
            ledger.check(id, TransferPhase::Mint),
            Err(TransferError::DuplicateExecution(id))
        );
    }

    #[test]
    fn test_phases_are_independent() {
        let mut ledger = ExecutionLedger::new();
        let id = TransferId([1; 32]);
        ledger.record(id, TransferPhase::Mint);
        assert!(ledger.check(id, TransferPhase::Resolve).is_ok());
        assert!(ledger.is_executed(id, TransferPhase::Mint));
        assert_eq!(ledger.len(), 1);
    }
}
