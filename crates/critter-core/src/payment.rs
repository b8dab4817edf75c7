//! Payment collaborator consumed by feeding.
//!
//! Token transfer mechanics live outside the engine. Feeding only needs to
//! know whether `amount` was successfully moved from the payer into the
//! game; [`PaymentChannel`] is that contract.

use std::collections::HashMap;

use thiserror::Error;

use crate::components::Identity;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("{payer} holds {available}, needs {needed}")]
    InsufficientFunds {
        payer: Identity,
        needed: u64,
        available: u64,
    },
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

pub trait PaymentChannel {
    /// Move `amount` from `payer` into the game. Must not partially succeed.
    fn transfer_into(&mut self, payer: &Identity, amount: u64) -> Result<(), PaymentError>;
}

impl<P: PaymentChannel + ?Sized> PaymentChannel for &mut P {
    fn transfer_into(&mut self, payer: &Identity, amount: u64) -> Result<(), PaymentError> {
        (**self).transfer_into(payer, amount)
    }
}

/// Accepts every transfer. For hosts that settle payment elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeFood;

impl PaymentChannel for FreeFood {
    fn transfer_into(&mut self, _payer: &Identity, _amount: u64) -> Result<(), PaymentError> {
        Ok(())
    }
}

/// In-memory balances, used by tests and the headless harness.
#[derive(Debug, Clone, Default)]
pub struct LedgerPayments {
    balances: HashMap<Identity, u64>,
    collected: u64,
}

impl LedgerPayments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deposit(&mut self, holder: &Identity, amount: u64) {
        let balance = self.balances.entry(holder.clone()).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, holder: &Identity) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Total moved into the game so far.
    pub fn collected(&self) -> u64 {
        self.collected
    }
}

impl PaymentChannel for LedgerPayments {
    fn transfer_into(&mut self, payer: &Identity, amount: u64) -> Result<(), PaymentError> {
        let available = self.balance_of(payer);
        if available < amount {
            return Err(PaymentError::InsufficientFunds {
                payer: payer.clone(),
                needed: amount,
                available,
            });
        }
        self.balances.insert(payer.clone(), available - amount);
        self.collected = self.collected.saturating_add(amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_moves_funds() {
        let alice = Identity::new("alice");
        let mut ledger = LedgerPayments::new();
        ledger.deposit(&alice, 25);
        ledger.transfer_into(&alice, 10).unwrap();
        assert_eq!(ledger.balance_of(&alice), 15);
        assert_eq!(ledger.collected(), 10);
    }

    #[test]
    fn ledger_refuses_overdraft_untouched() {
        let bob = Identity::new("bob");
        let mut ledger = LedgerPayments::new();
        ledger.deposit(&bob, 3);
        let err = ledger.transfer_into(&bob, 4).unwrap_err();
        assert!(matches!(err, PaymentError::InsufficientFunds { available: 3, .. }));
        assert_eq!(ledger.balance_of(&bob), 3);
        assert_eq!(ledger.collected(), 0);
    }
}
