//! Context provided to amount checks.

use crate::core::TransactionKind;
use crate::types::Money;

/// What an amount check gets to look at.
#[derive(Clone, Debug)]
pub struct AmountContext {
    pub kind: TransactionKind,
    pub amount: Money,
    /// Notes loaded in the dispenser, when the hardware reports them
    pub notes: Option<Vec<Money>>,
}

impl AmountContext {
    pub fn withdrawal(amount: Money, notes: Option<Vec<Money>>) -> Self {
        Self {
            kind: TransactionKind::Withdrawal,
            amount,
            notes,
        }
    }

    pub fn deposit(amount: Money) -> Self {
        Self {
            kind: TransactionKind::Deposit,
            amount,
            notes: None,
        }
    }

    pub fn is_withdrawal(&self) -> bool {
        self.kind == TransactionKind::Withdrawal
    }
}
