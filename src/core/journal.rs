//! Transaction journal.
//!
//! Every balance inquiry the bank answers leaves one record here. So does
//! every withdrawal or deposit that reaches the bank or moves cash, whatever
//! its outcome.

use crate::types::{AccountId, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    BalanceInquiry,
    Withdrawal,
    Deposit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionOutcome {
    /// Bank and hardware both completed their part
    Completed,
    /// Refused for a business reason, such as insufficient funds
    Declined,
    /// A collaborator failed; any applied bank mutation was reversed
    Failed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub account: AccountId,
    pub amount: Money,
    pub outcome: TransactionOutcome,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        kind: TransactionKind,
        account: AccountId,
        amount: Money,
        outcome: TransactionOutcome,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            account,
            amount,
            outcome,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only list of transaction records.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransactionJournal {
    entries: Vec<TransactionRecord>,
}

impl TransactionJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: TransactionRecord) {
        self.entries.push(record);
    }

    pub fn entries(&self) -> &[TransactionRecord] {
        &self.entries
    }

    pub fn for_account<'a>(
        &'a self,
        account: &'a AccountId,
    ) -> impl Iterator<Item = &'a TransactionRecord> + 'a {
        self.entries.iter().filter(move |r| &r.account == account)
    }

    pub fn last(&self) -> Option<&TransactionRecord> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_keep_insertion_order() {
        let mut journal = TransactionJournal::new();
        journal.record(TransactionRecord::new(
            TransactionKind::BalanceInquiry,
            AccountId::from("1001"),
            Money::ZERO,
            TransactionOutcome::Completed,
        ));
        journal.record(TransactionRecord::new(
            TransactionKind::Withdrawal,
            AccountId::from("1001"),
            Money::from_minor(100),
            TransactionOutcome::Declined,
        ));

        assert_eq!(journal.len(), 2);
        assert_eq!(journal.entries()[0].kind, TransactionKind::BalanceInquiry);
        assert_eq!(
            journal.last().map(|r| r.outcome),
            Some(TransactionOutcome::Declined)
        );
    }

    #[test]
    fn filters_by_account() {
        let mut journal = TransactionJournal::new();
        for account in ["1001", "1002", "1001"] {
            journal.record(TransactionRecord::new(
                TransactionKind::Deposit,
                AccountId::from(account),
                Money::from_minor(50),
                TransactionOutcome::Completed,
            ));
        }

        let checking = AccountId::from("1001");
        assert_eq!(journal.for_account(&checking).count(), 2);
    }

    #[test]
    fn record_ids_are_unique() {
        let a = TransactionRecord::new(
            TransactionKind::Deposit,
            AccountId::from("1001"),
            Money::from_minor(1),
            TransactionOutcome::Completed,
        );
        let b = TransactionRecord::new(
            TransactionKind::Deposit,
            AccountId::from("1001"),
            Money::from_minor(1),
            TransactionOutcome::Completed,
        );
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_journal() {
        let journal = TransactionJournal::new();
        assert!(journal.is_empty());
        assert!(journal.last().is_none());
    }
}
