//! Amount rule violations.

use crate::types::Money;
use thiserror::Error;

/// Reasons an amount is refused before any collaborator is touched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AmountViolation {
    #[error("Amount must be greater than zero")]
    Zero,

    #[error("Amount {amount} cannot be made from the loaded notes {notes:?}")]
    NotDispensable { amount: Money, notes: Vec<Money> },

    #[error("Amount {amount} exceeds the per-transaction limit of {limit}")]
    ExceedsLimit { amount: Money, limit: Money },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
