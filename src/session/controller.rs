//! Session controller: drives one customer session against the bank and the hardware.

use crate::config::DEFAULT_MAX_PIN_ATTEMPTS;
use crate::core::{
    Operation, Phase, PhaseTransition, SessionHistory, SessionState, TransactionJournal,
    TransactionKind, TransactionOutcome, TransactionRecord,
};
use crate::enforcement::{AmountContext, AmountRules};
use crate::services::{BankService, Hardware};
use crate::session::error::SessionError;
use crate::types::{AccountId, AccountSummary, CardId, Money, Pin};
use chrono::Utc;
use tracing::{debug, error, info, warn};

/// Result of a withdrawal that passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WithdrawalOutcome {
    /// Cash was dispensed; `balance` is the balance after the debit
    Dispensed { balance: Money },

    /// Not enough money in the account; nothing changed
    InsufficientFunds { balance: Money },
}

impl WithdrawalOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Dispensed { .. })
    }

    pub fn balance(&self) -> Money {
        match self {
            Self::Dispensed { balance } | Self::InsufficientFunds { balance } => *balance,
        }
    }
}

/// ATM session controller.
///
/// Each operation checks the current phase first, then talks to the
/// collaborators, and only updates the session once they have answered. An
/// operation that fails leaves the session exactly as it found it, except
/// for PIN exhaustion, which ends the session.
pub struct SessionController<B, H> {
    bank: B,
    hardware: H,
    rules: AmountRules,
    max_pin_attempts: u32,
    state: SessionState,
    history: SessionHistory<Phase>,
    journal: TransactionJournal,
}

impl<B: BankService, H: Hardware> SessionController<B, H> {
    /// Create an idle controller with default configuration.
    pub fn new(bank: B, hardware: H) -> Self {
        Self::from_parts(bank, hardware, AmountRules::default(), DEFAULT_MAX_PIN_ATTEMPTS)
    }

    pub(crate) fn from_parts(bank: B, hardware: H, rules: AmountRules, max_pin_attempts: u32) -> Self {
        Self {
            bank,
            hardware,
            rules,
            max_pin_attempts,
            state: SessionState::Idle,
            history: SessionHistory::new(),
            journal: TransactionJournal::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn current_card(&self) -> Option<&CardId> {
        self.state.card()
    }

    pub fn selected_account(&self) -> Option<&AccountId> {
        self.state.selected_account()
    }

    /// PIN attempts left, while a card is waiting for its PIN.
    pub fn attempts_remaining(&self) -> Option<u32> {
        self.state.attempts_remaining()
    }

    pub fn max_pin_attempts(&self) -> u32 {
        self.max_pin_attempts
    }

    pub fn history(&self) -> &SessionHistory<Phase> {
        &self.history
    }

    pub fn journal(&self) -> &TransactionJournal {
        &self.journal
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    /// Accept a card and start a session.
    pub fn insert_card(&mut self, card: impl Into<CardId>) -> Result<(), SessionError> {
        let operation = Operation::InsertCard;
        self.guard(operation)?;
        let card = card.into();

        self.hardware.retain_card(&card)?;
        info!(card = %card, "card inserted");
        self.transition(
            SessionState::CardInserted {
                card,
                attempts_remaining: self.max_pin_attempts,
            },
            operation,
        );
        self.hardware.display("Please enter your PIN");
        Ok(())
    }

    /// Verify the PIN for the inserted card.
    ///
    /// A wrong PIN costs one attempt. When the last attempt is used the card
    /// is ejected, the session resets to idle and `CardRetained` is returned.
    /// An unreachable bank costs nothing.
    pub fn enter_pin(&mut self, pin: impl Into<Pin>) -> Result<(), SessionError> {
        let operation = Operation::EnterPin;
        self.guard(operation)?;
        let SessionState::CardInserted {
            card,
            attempts_remaining,
        } = &self.state
        else {
            return Err(self.invalid(operation));
        };
        let card = card.clone();
        let attempts_remaining = *attempts_remaining;
        let pin = pin.into();

        debug!(card = %card, "verifying PIN");
        if self.bank.verify_pin(&card, &pin)? {
            let accounts: Vec<AccountSummary> = self
                .bank
                .get_accounts(&card)?
                .into_iter()
                .map(AccountSummary::from)
                .collect();
            info!(card = %card, accounts = accounts.len(), "PIN verified");
            self.transition(SessionState::Authenticated { card, accounts }, operation);
            self.hardware.display("Please select an account");
            return Ok(());
        }

        let remaining = attempts_remaining.saturating_sub(1);
        if remaining > 0 {
            warn!(card = %card, attempts_remaining = remaining, "incorrect PIN");
            self.state = SessionState::CardInserted {
                card,
                attempts_remaining: remaining,
            };
            self.hardware
                .display(&format!("Incorrect PIN. {remaining} attempts remaining"));
            return Err(SessionError::InvalidPin {
                attempts_remaining: remaining,
            });
        }

        error!(card = %card, "PIN attempts exhausted, ending session");
        if let Err(err) = self.hardware.eject_card() {
            error!(card = %card, error = %err, "card could not be ejected and stays in the machine");
        }
        self.hardware.display("Too many incorrect PIN attempts");
        self.transition(SessionState::Idle, operation);
        Err(SessionError::CardRetained { card })
    }

    /// Accounts linked to the authenticated card, as loaded at PIN time.
    pub fn get_available_accounts(&self) -> Result<&[AccountSummary], SessionError> {
        let operation = Operation::GetAvailableAccounts;
        self.guard(operation)?;
        self.state.accounts().ok_or_else(|| self.invalid(operation))
    }

    /// Choose the account for subsequent transactions. May be repeated.
    pub fn select_account(&mut self, account: impl Into<AccountId>) -> Result<(), SessionError> {
        let operation = Operation::SelectAccount;
        self.guard(operation)?;
        let account = account.into();
        let (card, accounts) = match &self.state {
            SessionState::Authenticated { card, accounts }
            | SessionState::AccountSelected { card, accounts, .. } => (card.clone(), accounts.clone()),
            _ => return Err(self.invalid(operation)),
        };

        if !accounts.iter().any(|a| a.id == account) {
            warn!(card = %card, account = %account, "account not linked to card");
            return Err(SessionError::AccountNotFound { account });
        }

        info!(card = %card, account = %account, "account selected");
        self.transition(
            SessionState::AccountSelected {
                card,
                accounts,
                selected: account,
            },
            operation,
        );
        Ok(())
    }

    /// Current balance of the selected account, straight from the bank.
    pub fn check_balance(&mut self) -> Result<Money, SessionError> {
        let operation = Operation::CheckBalance;
        let account = self.selected(operation)?;

        let balance = self.bank.get_balance(&account)?;
        self.log_transaction(
            TransactionKind::BalanceInquiry,
            &account,
            Money::ZERO,
            TransactionOutcome::Completed,
        );
        self.hardware.display(&format!("Balance: {balance}"));
        Ok(balance)
    }

    /// Withdraw cash from the selected account.
    ///
    /// Order: validate amount, re-read balance, debit, dispense. A failed
    /// dispense is compensated with a credit before the error is returned.
    pub fn withdraw(&mut self, amount: Money) -> Result<WithdrawalOutcome, SessionError> {
        let operation = Operation::Withdraw;
        let account = self.selected(operation)?;

        let context = AmountContext::withdrawal(amount, self.hardware.denominations());
        if let Err(violations) = self.rules.check(&context) {
            warn!(account = %account, amount = %amount, violations = violations.len(), "withdrawal amount rejected");
            return Err(SessionError::InvalidAmount { amount, violations });
        }

        let balance = self.bank.get_balance(&account)?;
        if amount > balance {
            return Ok(self.decline_withdrawal(&account, amount, balance));
        }

        if !self.bank.debit(&account, amount)? {
            // Another writer got there first
            let balance = self.bank.get_balance(&account)?;
            return Ok(self.decline_withdrawal(&account, amount, balance));
        }
        debug!(account = %account, amount = %amount, "debit applied");

        let failure = match self.hardware.dispense_cash(amount) {
            Ok(true) => None,
            Ok(false) => Some(SessionError::Hardware {
                operation,
                reason: "dispenser could not supply the notes".to_string(),
            }),
            Err(err) => Some(SessionError::BackendUnavailable(err)),
        };
        if let Some(err) = failure {
            warn!(account = %account, amount = %amount, error = %err, "dispense failed, reversing debit");
            self.log_transaction(
                TransactionKind::Withdrawal,
                &account,
                amount,
                TransactionOutcome::Failed,
            );
            self.reverse_debit(&account, amount)?;
            self.hardware
                .display("Unable to dispense cash. Your account has not been charged");
            return Err(err);
        }

        let balance = match self.bank.get_balance(&account) {
            Ok(balance) => balance,
            Err(err) => {
                warn!(account = %account, error = %err, "balance refresh failed after withdrawal");
                balance.saturating_sub(amount)
            }
        };
        self.log_transaction(
            TransactionKind::Withdrawal,
            &account,
            amount,
            TransactionOutcome::Completed,
        );
        info!(account = %account, amount = %amount, balance = %balance, "withdrawal completed");
        self.hardware
            .display(&format!("Please take your cash. New balance: {balance}"));
        Ok(WithdrawalOutcome::Dispensed { balance })
    }

    /// Deposit cash into the selected account and return the new balance.
    ///
    /// The bank is only credited after the acceptor has taken the notes.
    /// Once the credit is applied the deposit succeeds, even if the new
    /// balance cannot be read back.
    pub fn deposit(&mut self, amount: Money) -> Result<Money, SessionError> {
        let operation = Operation::Deposit;
        let account = self.selected(operation)?;

        if let Err(violations) = self.rules.check(&AmountContext::deposit(amount)) {
            warn!(account = %account, amount = %amount, "deposit amount rejected");
            return Err(SessionError::InvalidAmount { amount, violations });
        }

        let before = self.bank.get_balance(&account)?;
        if !self.hardware.accept_cash(amount)? {
            warn!(account = %account, amount = %amount, "cash acceptor rejected the notes");
            self.hardware.display("Notes rejected. Please take them back");
            return Err(SessionError::Hardware {
                operation,
                reason: "cash acceptor rejected the notes".to_string(),
            });
        }

        let credited = self.bank.credit(&account, amount);
        if !matches!(credited, Ok(true)) {
            error!(account = %account, amount = %amount, "accepted cash was not credited; hold for reconciliation");
            self.log_transaction(
                TransactionKind::Deposit,
                &account,
                amount,
                TransactionOutcome::Failed,
            );
            return Err(match credited {
                Err(err) => err.into(),
                Ok(_) => SessionError::Declined { operation, account },
            });
        }

        self.log_transaction(
            TransactionKind::Deposit,
            &account,
            amount,
            TransactionOutcome::Completed,
        );
        // The credit is committed, so a failed refresh must not report failure
        let balance = match self.bank.get_balance(&account) {
            Ok(balance) => balance,
            Err(err) => {
                warn!(account = %account, error = %err, "balance refresh failed after deposit");
                before.saturating_add(amount)
            }
        };
        info!(account = %account, amount = %amount, balance = %balance, "deposit completed");
        self.hardware
            .display(&format!("Deposit accepted. New balance: {balance}"));
        Ok(balance)
    }

    /// Return the card and clear the session.
    pub fn eject_card(&mut self) -> Result<(), SessionError> {
        let operation = Operation::EjectCard;
        self.guard(operation)?;

        self.hardware.eject_card()?;
        if let Some(card) = self.state.card() {
            info!(card = %card, "card ejected");
        }
        self.hardware.display("Please take your card");
        self.transition(SessionState::Idle, operation);
        Ok(())
    }

    /// Customer pressed cancel: same as ejecting the card.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.eject_card()
    }

    fn guard(&self, operation: Operation) -> Result<(), SessionError> {
        if operation.permits(self.state.phase()) {
            Ok(())
        } else {
            if operation.moves_money() {
                warn!(operation = %operation, state = %self.state.phase(), "money operation refused");
            } else {
                debug!(operation = %operation, state = %self.state.phase(), "operation refused");
            }
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: Operation) -> SessionError {
        SessionError::InvalidState {
            operation,
            state: self.state.phase(),
        }
    }

    fn selected(&self, operation: Operation) -> Result<AccountId, SessionError> {
        self.guard(operation)?;
        self.state
            .selected_account()
            .cloned()
            .ok_or_else(|| self.invalid(operation))
    }

    fn transition(&mut self, next: SessionState, operation: Operation) {
        let from = self.state.phase();
        let to = next.phase();
        self.state = next;
        if from != to {
            debug!(from = %from, to = %to, operation = %operation, "session transition");
            self.history.push(PhaseTransition {
                from,
                to,
                operation,
                timestamp: Utc::now(),
            });
        }
    }

    fn decline_withdrawal(&mut self, account: &AccountId, amount: Money, balance: Money) -> WithdrawalOutcome {
        warn!(account = %account, amount = %amount, balance = %balance, "insufficient funds");
        self.log_transaction(
            TransactionKind::Withdrawal,
            account,
            amount,
            TransactionOutcome::Declined,
        );
        self.hardware.display("Insufficient funds");
        WithdrawalOutcome::InsufficientFunds { balance }
    }

    fn reverse_debit(&mut self, account: &AccountId, amount: Money) -> Result<(), SessionError> {
        let reason = match self.bank.credit(account, amount) {
            Ok(true) => {
                info!(account = %account, amount = %amount, "debit reversed");
                return Ok(());
            }
            Ok(false) => "bank refused the reversing credit".to_string(),
            Err(err) => err.to_string(),
        };
        error!(account = %account, amount = %amount, reason = %reason, "debit reversal failed");
        Err(SessionError::RollbackFailed {
            account: account.clone(),
            amount,
            reason,
        })
    }

    fn log_transaction(
        &mut self,
        kind: TransactionKind,
        account: &AccountId,
        amount: Money,
        outcome: TransactionOutcome,
    ) {
        self.journal.record(TransactionRecord::new(
            kind,
            account.clone(),
            amount,
            outcome,
        ));
    }
}
