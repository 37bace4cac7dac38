//! Player balance ledger
//!
//! Explicitly owned by the session and passed around by reference; there is
//! no ambient global balance. Debits are all-or-nothing: a refused debit
//! leaves the balance untouched.
//!
//! CRITICAL: All money values are i64 (whole coins)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Starting balance for a fresh player
pub const DEFAULT_OPENING_BALANCE: i64 = 1000;

/// Errors that can occur during ledger operations
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: i64, available: i64 },

    #[error("Amount must be positive (got {amount})")]
    NonPositiveAmount { amount: i64 },

    #[error("Balance overflow: {balance} + {amount} does not fit in i64")]
    Overflow { balance: i64, amount: i64 },
}

/// Balance plus running totals for auditing
///
/// # Example
/// ```
/// use plinko_payout_core::Ledger;
///
/// let mut ledger = Ledger::new(1000);
/// ledger.debit(10).unwrap();
/// ledger.credit(25).unwrap();
/// assert_eq!(ledger.balance(), 1015);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    balance: i64,
    total_debited: i64,
    total_credited: i64,
}

impl Ledger {
    pub fn new(opening_balance: i64) -> Self {
        Self {
            balance: opening_balance,
            total_debited: 0,
            total_credited: 0,
        }
    }

    /// Current balance
    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn has_enough(&self, amount: i64) -> bool {
        amount <= self.balance
    }

    /// Decrease balance
    ///
    /// # Errors
    /// - `NonPositiveAmount` for amounts ≤ 0
    /// - `InsufficientBalance` if `amount > balance` (no state change)
    pub fn debit(&mut self, amount: i64) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::NonPositiveAmount { amount });
        }

        if !self.has_enough(amount) {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: self.balance,
            });
        }

        let total_debited = self
            .total_debited
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                balance: self.balance,
                amount,
            })?;
        self.balance -= amount;
        self.total_debited = total_debited;
        Ok(())
    }

    /// Increase balance
    ///
    /// A zero credit (a 0.0x slot on a tiny stake) is accepted and recorded
    /// as a no-op; only negative amounts are refused. A credit that would
    /// overflow the balance is refused with no state change.
    pub fn credit(&mut self, amount: i64) -> Result<(), LedgerError> {
        if amount < 0 {
            return Err(LedgerError::NonPositiveAmount { amount });
        }

        let overflow = LedgerError::Overflow {
            balance: self.balance,
            amount,
        };
        let balance = self.balance.checked_add(amount).ok_or(overflow.clone())?;
        let total_credited = self.total_credited.checked_add(amount).ok_or(overflow)?;
        self.balance = balance;
        self.total_credited = total_credited;
        Ok(())
    }

    /// Sum of all successful debits since creation
    pub fn total_debited(&self) -> i64 {
        self.total_debited
    }

    /// Sum of all credits since creation
    pub fn total_credited(&self) -> i64 {
        self.total_credited
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(DEFAULT_OPENING_BALANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_refused_leaves_balance() {
        let mut ledger = Ledger::new(50);
        let result = ledger.debit(51);

        assert_eq!(
            result,
            Err(LedgerError::InsufficientBalance {
                required: 51,
                available: 50
            })
        );
        assert_eq!(ledger.balance(), 50);
        assert_eq!(ledger.total_debited(), 0);
    }

    #[test]
    fn test_zero_debit_rejected() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.debit(0), Err(LedgerError::NonPositiveAmount { amount: 0 }));
    }

    #[test]
    fn test_zero_credit_accepted() {
        let mut ledger = Ledger::default();
        assert!(ledger.credit(0).is_ok());
        assert_eq!(ledger.balance(), DEFAULT_OPENING_BALANCE);
    }

    #[test]
    fn test_overflowing_credit_refused() {
        let mut ledger = Ledger::new(i64::MAX - 5);
        assert_eq!(
            ledger.credit(10),
            Err(LedgerError::Overflow {
                balance: i64::MAX - 5,
                amount: 10
            })
        );
        assert_eq!(ledger.balance(), i64::MAX - 5);
        assert_eq!(ledger.total_credited(), 0);

        assert!(ledger.credit(5).is_ok());
        assert_eq!(ledger.balance(), i64::MAX);
    }
}
