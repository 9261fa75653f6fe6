//! The session controller and its error type.

mod controller;
mod error;

pub use controller::{SessionController, WithdrawalOutcome};
pub use error::SessionError;
