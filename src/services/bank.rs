//! Bank backend contract.

use super::error::ServiceError;
use crate::types::{Account, AccountId, CardId, Money, Pin};
use std::sync::Arc;

/// Capabilities the controller needs from the bank.
///
/// A single bank may serve many machines at once, so every method takes
/// `&self` and `debit`/`credit` must apply atomically: either the whole
/// amount moves or nothing does.
pub trait BankService: Send + Sync {
    /// Check a PIN for a card. `Ok(false)` means the PIN is wrong.
    fn verify_pin(&self, card: &CardId, pin: &Pin) -> Result<bool, ServiceError>;

    /// Accounts linked to a card, in display order.
    fn get_accounts(&self, card: &CardId) -> Result<Vec<Account>, ServiceError>;

    fn get_balance(&self, account: &AccountId) -> Result<Money, ServiceError>;

    /// Remove `amount` from the account. `Ok(false)` if funds are insufficient.
    fn debit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError>;

    fn credit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError>;
}

impl<T: BankService + ?Sized> BankService for Arc<T> {
    fn verify_pin(&self, card: &CardId, pin: &Pin) -> Result<bool, ServiceError> {
        (**self).verify_pin(card, pin)
    }

    fn get_accounts(&self, card: &CardId) -> Result<Vec<Account>, ServiceError> {
        (**self).get_accounts(card)
    }

    fn get_balance(&self, account: &AccountId) -> Result<Money, ServiceError> {
        (**self).get_balance(account)
    }

    fn debit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError> {
        (**self).debit(account, amount)
    }

    fn credit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError> {
        (**self).credit(account, amount)
    }
}

impl<T: BankService + ?Sized> BankService for &T {
    fn verify_pin(&self, card: &CardId, pin: &Pin) -> Result<bool, ServiceError> {
        (**self).verify_pin(card, pin)
    }

    fn get_accounts(&self, card: &CardId) -> Result<Vec<Account>, ServiceError> {
        (**self).get_accounts(card)
    }

    fn get_balance(&self, account: &AccountId) -> Result<Money, ServiceError> {
        (**self).get_balance(account)
    }

    fn debit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError> {
        (**self).debit(account, amount)
    }

    fn credit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError> {
        (**self).credit(account, amount)
    }
}
