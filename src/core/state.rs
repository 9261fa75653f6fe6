//! Session phases and the per-phase session data.
//!
//! `SessionState` is a tagged enumeration whose variants carry exactly the
//! fields that are meaningful in that phase, so a selected account without an
//! authenticated card cannot be represented. `Phase` is its data-free tag.

use crate::types::{AccountId, AccountSummary, CardId};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for state machine states.
///
/// All methods are pure. Implementors describe a position in a state machine
/// and are cheap to clone, compare and serialize for audit records.
///
/// # Example
///
/// ```rust
/// use atm_session::core::{Phase, State};
///
/// assert_eq!(Phase::CardInserted.name(), "CardInserted");
/// assert!(!Phase::Idle.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Phase of an ATM session.
///
/// A session always returns to `Idle`, so no phase is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    CardInserted,
    Authenticated,
    AccountSelected,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Idle,
        Phase::CardInserted,
        Phase::Authenticated,
        Phase::AccountSelected,
    ];
}

impl State for Phase {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::CardInserted => "CardInserted",
            Self::Authenticated => "Authenticated",
            Self::AccountSelected => "AccountSelected",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transient state of one customer's session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    /// No card in the reader.
    #[default]
    Idle,

    /// Card present, PIN not yet verified.
    CardInserted {
        card: CardId,
        attempts_remaining: u32,
    },

    /// PIN verified; accounts loaded from the bank.
    Authenticated {
        card: CardId,
        accounts: Vec<AccountSummary>,
    },

    /// Account chosen for balance, withdrawal and deposit.
    AccountSelected {
        card: CardId,
        accounts: Vec<AccountSummary>,
        selected: AccountId,
    },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::CardInserted { .. } => Phase::CardInserted,
            Self::Authenticated { .. } => Phase::Authenticated,
            Self::AccountSelected { .. } => Phase::AccountSelected,
        }
    }

    pub fn card(&self) -> Option<&CardId> {
        match self {
            Self::Idle => None,
            Self::CardInserted { card, .. }
            | Self::Authenticated { card, .. }
            | Self::AccountSelected { card, .. } => Some(card),
        }
    }

    /// Accounts available to the authenticated card.
    pub fn accounts(&self) -> Option<&[AccountSummary]> {
        match self {
            Self::Authenticated { accounts, .. } | Self::AccountSelected { accounts, .. } => {
                Some(accounts)
            }
            _ => None,
        }
    }

    pub fn selected_account(&self) -> Option<&AccountId> {
        match self {
            Self::AccountSelected { selected, .. } => Some(selected),
            _ => None,
        }
    }

    pub fn attempts_remaining(&self) -> Option<u32> {
        match self {
            Self::CardInserted {
                attempts_remaining, ..
            } => Some(*attempts_remaining),
            _ => None,
        }
    }
}

impl State for SessionState {
    fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::CardInserted { .. } => "CardInserted",
            Self::Authenticated { .. } => "Authenticated",
            Self::AccountSelected { .. } => "AccountSelected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checking() -> AccountSummary {
        AccountSummary {
            id: AccountId::from("1001"),
            label: "Checking".to_string(),
        }
    }

    #[test]
    fn phase_names_match_variants() {
        assert_eq!(Phase::Idle.name(), "Idle");
        assert_eq!(Phase::CardInserted.name(), "CardInserted");
        assert_eq!(Phase::Authenticated.name(), "Authenticated");
        assert_eq!(Phase::AccountSelected.name(), "AccountSelected");
    }

    #[test]
    fn no_phase_is_final_or_error() {
        for phase in Phase::ALL {
            assert!(!phase.is_final());
            assert!(!phase.is_error());
        }
    }

    #[test]
    fn session_state_reports_its_phase_and_fields() {
        let state = SessionState::AccountSelected {
            card: CardId::from("C1"),
            accounts: vec![checking()],
            selected: AccountId::from("1001"),
        };

        assert_eq!(state.phase(), Phase::AccountSelected);
        assert_eq!(state.name(), state.phase().name());
        assert_eq!(state.card(), Some(&CardId::from("C1")));
        assert_eq!(state.accounts().map(<[_]>::len), Some(1));
        assert_eq!(state.selected_account(), Some(&AccountId::from("1001")));
        assert_eq!(state.attempts_remaining(), None);
    }

    #[test]
    fn idle_state_holds_nothing() {
        let state = SessionState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.card().is_none());
        assert!(state.accounts().is_none());
        assert!(state.selected_account().is_none());
    }

    #[test]
    fn card_inserted_tracks_attempts() {
        let state = SessionState::CardInserted {
            card: CardId::from("C1"),
            attempts_remaining: 2,
        };
        assert_eq!(state.attempts_remaining(), Some(2));
        assert!(state.accounts().is_none());
    }

    #[test]
    fn session_state_serializes_correctly() {
        let state = SessionState::CardInserted {
            card: CardId::from("C1"),
            attempts_remaining: 3,
        };
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
