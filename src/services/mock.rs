//! In-memory collaborators for tests and demos.

use super::bank::BankService;
use super::error::ServiceError;
use super::hardware::Hardware;
use crate::types::{Account, AccountId, CardId, Money, Pin};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Ledger {
    cards: HashMap<CardId, CardRecord>,
    accounts: HashMap<AccountId, Account>,
}

struct CardRecord {
    pin: String,
    accounts: Vec<AccountId>,
}

/// Bank backed by a mutex-guarded map.
///
/// Safe to share between several controllers through an `Arc`; each
/// debit/credit holds the lock for its whole check-and-update.
#[derive(Default)]
pub struct InMemoryBank {
    ledger: Mutex<Ledger>,
    offline: AtomicBool,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference data set: two cards, three accounts.
    pub fn sample() -> Self {
        Self::new()
            .with_card(
                "1234567890",
                "1234",
                vec![
                    Account::new("1001", "Checking", Money::from_minor(1000)),
                    Account::new("1002", "Savings", Money::from_minor(5000)),
                ],
            )
            .with_card(
                "0987654321",
                "4321",
                vec![Account::new("2001", "Checking", Money::from_minor(2500))],
            )
    }

    /// Register a card with its PIN and accounts.
    pub fn with_card(self, card: impl Into<String>, pin: impl Into<String>, accounts: Vec<Account>) -> Self {
        {
            let mut ledger = self
                .ledger
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let ids = accounts.iter().map(|a| a.id.clone()).collect();
            for account in accounts {
                ledger.accounts.insert(account.id.clone(), account);
            }
            ledger.cards.insert(
                CardId::new(card),
                CardRecord {
                    pin: pin.into(),
                    accounts: ids,
                },
            );
        }
        self
    }

    /// Simulate the backend becoming unreachable (or reachable again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Current balance, bypassing the offline switch.
    pub fn balance_of(&self, account: &AccountId) -> Option<Money> {
        self.ledger
            .lock()
            .ok()
            .and_then(|ledger| ledger.accounts.get(account).map(|a| a.balance))
    }

    fn ledger(&self) -> Result<MutexGuard<'_, Ledger>, ServiceError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::bank("backend offline"));
        }
        self.ledger
            .lock()
            .map_err(|_| ServiceError::bank("ledger lock poisoned"))
    }
}

impl BankService for InMemoryBank {
    fn verify_pin(&self, card: &CardId, pin: &Pin) -> Result<bool, ServiceError> {
        let ledger = self.ledger()?;
        Ok(ledger
            .cards
            .get(card)
            .is_some_and(|record| record.pin == pin.as_str()))
    }

    fn get_accounts(&self, card: &CardId) -> Result<Vec<Account>, ServiceError> {
        let ledger = self.ledger()?;
        let Some(record) = ledger.cards.get(card) else {
            return Ok(Vec::new());
        };
        Ok(record
            .accounts
            .iter()
            .filter_map(|id| ledger.accounts.get(id).cloned())
            .collect())
    }

    fn get_balance(&self, account: &AccountId) -> Result<Money, ServiceError> {
        let ledger = self.ledger()?;
        ledger
            .accounts
            .get(account)
            .map(|a| a.balance)
            .ok_or_else(|| ServiceError::bank(format!("unknown account {account}")))
    }

    fn debit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError> {
        let mut ledger = self.ledger()?;
        let Some(entry) = ledger.accounts.get_mut(account) else {
            return Ok(false);
        };
        match entry.balance.checked_sub(amount) {
            Some(remaining) if !amount.is_zero() => {
                entry.balance = remaining;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn credit(&self, account: &AccountId, amount: Money) -> Result<bool, ServiceError> {
        let mut ledger = self.ledger()?;
        let Some(entry) = ledger.accounts.get_mut(account) else {
            return Ok(false);
        };
        match entry.balance.checked_add(amount) {
            Some(total) if !amount.is_zero() => {
                entry.balance = total;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Scriptable hardware that records everything asked of it.
#[derive(Debug, Default)]
pub struct MockHardware {
    pub retained: Option<CardId>,
    pub ejected: Vec<CardId>,
    pub dispensed: Vec<Money>,
    pub accepted: Vec<Money>,
    pub messages: Vec<String>,
    /// Dispenser reports it could not hand out cash
    pub jam_dispenser: bool,
    /// Acceptor rejects inserted notes
    pub reject_cash: bool,
    /// Every fallible call fails as unreachable
    pub offline: bool,
    pub notes: Option<Vec<Money>>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_denominations(mut self, notes: Vec<Money>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    fn online(&self) -> Result<(), ServiceError> {
        if self.offline {
            Err(ServiceError::hardware("device not responding"))
        } else {
            Ok(())
        }
    }
}

impl Hardware for MockHardware {
    fn retain_card(&mut self, card: &CardId) -> Result<(), ServiceError> {
        self.online()?;
        self.retained = Some(card.clone());
        Ok(())
    }

    fn eject_card(&mut self) -> Result<(), ServiceError> {
        self.online()?;
        if let Some(card) = self.retained.take() {
            self.ejected.push(card);
        }
        Ok(())
    }

    fn dispense_cash(&mut self, amount: Money) -> Result<bool, ServiceError> {
        self.online()?;
        if self.jam_dispenser {
            return Ok(false);
        }
        self.dispensed.push(amount);
        Ok(true)
    }

    fn accept_cash(&mut self, amount: Money) -> Result<bool, ServiceError> {
        self.online()?;
        if self.reject_cash {
            return Ok(false);
        }
        self.accepted.push(amount);
        Ok(true)
    }

    fn display(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn denominations(&self) -> Option<Vec<Money>> {
        self.notes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checking() -> AccountId {
        AccountId::from("1001")
    }

    #[test]
    fn sample_bank_verifies_pins() {
        let bank = InMemoryBank::sample();
        let card = CardId::from("1234567890");

        assert!(bank.verify_pin(&card, &Pin::from("1234")).unwrap());
        assert!(!bank.verify_pin(&card, &Pin::from("0000")).unwrap());
        assert!(!bank
            .verify_pin(&CardId::from("unknown"), &Pin::from("1234"))
            .unwrap());
    }

    #[test]
    fn accounts_come_back_in_registration_order() {
        let bank = InMemoryBank::sample();
        let accounts = bank.get_accounts(&CardId::from("1234567890")).unwrap();
        let ids: Vec<_> = accounts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1002"]);
        assert!(bank.get_accounts(&CardId::from("nope")).unwrap().is_empty());
    }

    #[test]
    fn debit_refuses_overdraft() {
        let bank = InMemoryBank::sample();
        assert!(!bank.debit(&checking(), Money::from_minor(1001)).unwrap());
        assert_eq!(bank.balance_of(&checking()), Some(Money::from_minor(1000)));

        assert!(bank.debit(&checking(), Money::from_minor(1000)).unwrap());
        assert_eq!(bank.balance_of(&checking()), Some(Money::ZERO));
    }

    #[test]
    fn credit_adds_to_balance() {
        let bank = InMemoryBank::sample();
        assert!(bank.credit(&checking(), Money::from_minor(250)).unwrap());
        assert_eq!(
            bank.get_balance(&checking()).unwrap(),
            Money::from_minor(1250)
        );
        assert!(!bank
            .credit(&AccountId::from("9999"), Money::from_minor(1))
            .unwrap());
    }

    #[test]
    fn offline_bank_reports_unavailable() {
        let bank = InMemoryBank::sample();
        bank.set_offline(true);

        let err = bank.get_balance(&checking()).unwrap_err();
        assert_eq!(err.service(), crate::services::ServiceKind::Bank);
        assert_eq!(bank.balance_of(&checking()), Some(Money::from_minor(1000)));

        bank.set_offline(false);
        assert!(bank.get_balance(&checking()).is_ok());
    }

    #[test]
    fn mock_hardware_tracks_card_and_cash() {
        let mut hw = MockHardware::new();
        hw.retain_card(&CardId::from("C1")).unwrap();
        assert_eq!(hw.retained, Some(CardId::from("C1")));

        assert!(hw.dispense_cash(Money::from_minor(200)).unwrap());
        assert!(hw.accept_cash(Money::from_minor(50)).unwrap());
        hw.eject_card().unwrap();

        assert!(hw.retained.is_none());
        assert_eq!(hw.ejected, vec![CardId::from("C1")]);
        assert_eq!(hw.dispensed, vec![Money::from_minor(200)]);
        assert_eq!(hw.accepted, vec![Money::from_minor(50)]);
    }

    #[test]
    fn jammed_dispenser_hands_out_nothing() {
        let mut hw = MockHardware {
            jam_dispenser: true,
            ..MockHardware::default()
        };
        assert!(!hw.dispense_cash(Money::from_minor(100)).unwrap());
        assert!(hw.dispensed.is_empty());
    }

    #[test]
    fn offline_hardware_still_displays() {
        let mut hw = MockHardware {
            offline: true,
            ..MockHardware::default()
        };
        assert!(hw.retain_card(&CardId::from("C1")).is_err());
        hw.display("Out of service");
        assert_eq!(hw.last_message(), Some("Out of service"));
    }
}
