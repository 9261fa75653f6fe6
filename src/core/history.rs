//! Phase transition history.
//!
//! Records every phase change the controller makes, across sessions, so an
//! operator can reconstruct what the machine did.

use super::operation::Operation;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single phase change.
///
/// # Example
///
/// ```rust
/// use atm_session::core::{Operation, Phase, PhaseTransition};
/// use chrono::Utc;
///
/// let transition = PhaseTransition {
///     from: Phase::Idle,
///     to: Phase::CardInserted,
///     operation: Operation::InsertCard,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.operation, Operation::InsertCard);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PhaseTransition<S: State> {
    pub from: S,
    pub to: S,
    /// Operation that caused the change
    pub operation: Operation,
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of phase transitions.
///
/// `record` returns a new history, leaving the receiver untouched.
///
/// # Example
///
/// ```rust
/// use atm_session::core::{Operation, Phase, PhaseTransition, SessionHistory};
/// use chrono::Utc;
///
/// let history = SessionHistory::new()
///     .record(PhaseTransition {
///         from: Phase::Idle,
///         to: Phase::CardInserted,
///         operation: Operation::InsertCard,
///         timestamp: Utc::now(),
///     })
///     .record(PhaseTransition {
///         from: Phase::CardInserted,
///         to: Phase::Idle,
///         operation: Operation::EjectCard,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.path(), vec![&Phase::Idle, &Phase::CardInserted, &Phase::Idle]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct SessionHistory<S: State> {
    transitions: Vec<PhaseTransition<S>>,
}

impl<S: State> Default for SessionHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> SessionHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: PhaseTransition<S>) -> Self {
        let mut history = self.clone();
        history.push(transition);
        history
    }

    /// Append in place; the owner of a long-lived history uses this.
    pub(crate) fn push(&mut self, transition: PhaseTransition<S>) {
        self.transitions.push(transition);
    }

    /// States traversed: the first `from`, then every `to` in order.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Number of times `operation` caused a transition.
    pub fn count(&self, operation: Operation) -> usize {
        self.transitions
            .iter()
            .filter(|t| t.operation == operation)
            .count()
    }

    pub fn transitions(&self) -> &[PhaseTransition<S>] {
        &self.transitions
    }

    pub fn last(&self) -> Option<&PhaseTransition<S>> {
        self.transitions.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Phase;

    fn transition(from: Phase, to: Phase, operation: Operation) -> PhaseTransition<Phase> {
        PhaseTransition {
            from,
            to,
            operation,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: SessionHistory<Phase> = SessionHistory::new();
        assert!(history.transitions().is_empty());
        assert!(history.path().is_empty());
        assert!(history.duration().is_none());
        assert!(history.last().is_none());
    }

    #[test]
    fn record_leaves_original_untouched() {
        let history = SessionHistory::new();
        let updated = history.record(transition(
            Phase::Idle,
            Phase::CardInserted,
            Operation::InsertCard,
        ));

        assert_eq!(history.transitions().len(), 0);
        assert_eq!(updated.transitions().len(), 1);
    }

    #[test]
    fn push_appends_like_record() {
        let first = transition(Phase::Idle, Phase::CardInserted, Operation::InsertCard);
        let second = transition(Phase::CardInserted, Phase::Idle, Operation::EjectCard);
        let recorded = SessionHistory::new()
            .record(first.clone())
            .record(second.clone());

        let mut pushed = SessionHistory::new();
        pushed.push(first);
        pushed.push(second);

        assert_eq!(pushed.transitions(), recorded.transitions());
    }

    #[test]
    fn path_follows_a_full_session() {
        let history = SessionHistory::new()
            .record(transition(Phase::Idle, Phase::CardInserted, Operation::InsertCard))
            .record(transition(
                Phase::CardInserted,
                Phase::Authenticated,
                Operation::EnterPin,
            ))
            .record(transition(
                Phase::Authenticated,
                Phase::AccountSelected,
                Operation::SelectAccount,
            ))
            .record(transition(Phase::AccountSelected, Phase::Idle, Operation::EjectCard));

        assert_eq!(
            history.path(),
            vec![
                &Phase::Idle,
                &Phase::CardInserted,
                &Phase::Authenticated,
                &Phase::AccountSelected,
                &Phase::Idle,
            ]
        );
        assert_eq!(history.count(Operation::EjectCard), 1);
        assert_eq!(history.last().map(|t| t.to), Some(Phase::Idle));
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let history = SessionHistory::new()
            .record(PhaseTransition {
                from: Phase::Idle,
                to: Phase::CardInserted,
                operation: Operation::InsertCard,
                timestamp: start,
            })
            .record(PhaseTransition {
                from: Phase::CardInserted,
                to: Phase::Idle,
                operation: Operation::EjectCard,
                timestamp: start + chrono::Duration::seconds(30),
            });

        assert_eq!(history.duration(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn history_serializes() {
        let history = SessionHistory::new().record(transition(
            Phase::Idle,
            Phase::CardInserted,
            Operation::InsertCard,
        ));
        let json = serde_json::to_string(&history).unwrap();
        let restored: SessionHistory<Phase> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.transitions(), history.transitions());
    }
}
