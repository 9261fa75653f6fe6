//! Customer operations and the phases each one is legal from.
//!
//! The legality table is a pure function of the phase, so it can be checked
//! before any collaborator is touched.

use super::state::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation a customer can request from the session controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    InsertCard,
    EnterPin,
    GetAvailableAccounts,
    SelectAccount,
    CheckBalance,
    Withdraw,
    Deposit,
    EjectCard,
}

impl Operation {
    pub const ALL: [Operation; 8] = [
        Operation::InsertCard,
        Operation::EnterPin,
        Operation::GetAvailableAccounts,
        Operation::SelectAccount,
        Operation::CheckBalance,
        Operation::Withdraw,
        Operation::Deposit,
        Operation::EjectCard,
    ];

    /// Phases from which this operation may be issued.
    pub fn allowed_phases(self) -> &'static [Phase] {
        match self {
            Self::InsertCard => &[Phase::Idle],
            Self::EnterPin => &[Phase::CardInserted],
            Self::GetAvailableAccounts | Self::SelectAccount => {
                &[Phase::Authenticated, Phase::AccountSelected]
            }
            Self::CheckBalance | Self::Withdraw | Self::Deposit => &[Phase::AccountSelected],
            Self::EjectCard => &[
                Phase::CardInserted,
                Phase::Authenticated,
                Phase::AccountSelected,
            ],
        }
    }

    /// Check whether the operation is legal from `phase` (pure).
    pub fn permits(self, phase: Phase) -> bool {
        self.allowed_phases().contains(&phase)
    }

    /// Whether the operation can change an account balance.
    pub fn moves_money(self) -> bool {
        matches!(self, Self::Withdraw | Self::Deposit)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::InsertCard => "insert_card",
            Self::EnterPin => "enter_pin",
            Self::GetAvailableAccounts => "get_available_accounts",
            Self::SelectAccount => "select_account",
            Self::CheckBalance => "check_balance",
            Self::Withdraw => "withdraw",
            Self::Deposit => "deposit",
            Self::EjectCard => "eject_card",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
