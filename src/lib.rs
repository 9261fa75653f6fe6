//! ATM session: the session logic of an automated teller machine.
//!
//! The crate models what a customer may do at an ATM, in what order, and
//! what happens when something goes wrong. The bank and the machine's
//! hardware are collaborators behind traits; the crate owns no logic of
//! theirs.
//!
//! # Core Concepts
//!
//! - **Session state**: a tagged enum, `Idle → CardInserted → Authenticated →
//!   AccountSelected`, carrying only the data valid in each phase
//! - **Operation table**: every operation lists the phases it is legal from;
//!   anything else fails with `InvalidState` and changes nothing
//! - **Amount rules**: zero, non-dispensable and over-limit amounts are all
//!   reported together before money moves
//! - **Compensation**: a failed dispense reverses the debit before the error
//!   reaches the caller
//!
//! # Example
//!
//! ```rust
//! use atm_session::services::{InMemoryBank, MockHardware};
//! use atm_session::session::{SessionController, WithdrawalOutcome};
//! use atm_session::types::Money;
//! use atm_session::core::Phase;
//!
//! let mut atm = SessionController::new(InMemoryBank::sample(), MockHardware::new());
//!
//! atm.insert_card("1234567890")?;
//! atm.enter_pin("1234")?;
//! atm.select_account("1001")?;
//! assert_eq!(atm.check_balance()?, Money::from_minor(1000));
//!
//! let outcome = atm.withdraw(Money::from_minor(100))?;
//! assert_eq!(outcome, WithdrawalOutcome::Dispensed { balance: Money::from_minor(900) });
//!
//! atm.eject_card()?;
//! assert_eq!(atm.phase(), Phase::Idle);
//! # Ok::<(), atm_session::session::SessionError>(())
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod enforcement;
pub mod services;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use builder::{BuildError, ControllerBuilder};
pub use config::AtmConfig;
pub use self::core::{Operation, Phase, SessionState, State};
pub use services::{BankService, Hardware, ServiceError};
pub use session::{SessionController, SessionError, WithdrawalOutcome};
pub use types::{Account, AccountId, AccountSummary, CardId, Money, Pin};
