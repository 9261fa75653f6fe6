//! Core session types.
//!
//! This module contains the pure part of the controller:
//! - Session phases and per-phase data via `SessionState`
//! - The operation legality table
//! - Phase history and the transaction journal
//!
//! Nothing in here talks to the bank or the hardware.

mod history;
mod journal;
mod operation;
mod state;

pub use history::{PhaseTransition, SessionHistory};
pub use journal::{TransactionJournal, TransactionKind, TransactionOutcome, TransactionRecord};
pub use operation::Operation;
pub use state::{Phase, SessionState, State};
