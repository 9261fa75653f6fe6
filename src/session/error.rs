//! Errors surfaced by session controller operations.

use crate::core::{Operation, Phase};
use crate::enforcement::AmountViolation;
use crate::services::ServiceError;
use crate::types::{AccountId, CardId, Money};
use thiserror::Error;

/// Everything a controller operation can fail with.
///
/// Insufficient funds is deliberately absent: it is a normal
/// [`WithdrawalOutcome`](crate::session::WithdrawalOutcome).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Operation '{operation}' is not allowed in state '{state}'")]
    InvalidState { operation: Operation, state: Phase },

    #[error("Incorrect PIN ({attempts_remaining} attempts remaining)")]
    InvalidPin { attempts_remaining: u32 },

    #[error("Too many incorrect PIN attempts; session for card {card} was terminated")]
    CardRetained { card: CardId },

    #[error("Account {account} is not available for this card")]
    AccountNotFound { account: AccountId },

    #[error("Invalid amount {amount}: {}", join(.violations))]
    InvalidAmount {
        amount: Money,
        violations: Vec<AmountViolation>,
    },

    #[error("Hardware failure during {operation}: {reason}")]
    Hardware { operation: Operation, reason: String },

    #[error(transparent)]
    BackendUnavailable(#[from] ServiceError),

    #[error("Bank declined {operation} on account {account}")]
    Declined {
        operation: Operation,
        account: AccountId,
    },

    #[error("Could not reverse debit of {amount} on account {account}: {reason}")]
    RollbackFailed {
        account: AccountId,
        amount: Money,
        reason: String,
    },
}

impl SessionError {
    /// Whether the caller can carry on with the same card.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::CardRetained { .. } | Self::RollbackFailed { .. })
    }
}

fn join(violations: &[AmountViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
