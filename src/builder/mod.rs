//! Builder API for assembling a session controller.
//!
//! ```
//! use atm_session::builder::ControllerBuilder;
//! use atm_session::services::{InMemoryBank, MockHardware};
//! use atm_session::types::Money;
//!
//! let atm = ControllerBuilder::new()
//!     .bank(InMemoryBank::sample())
//!     .hardware(MockHardware::new())
//!     .max_pin_attempts(3)
//!     .withdrawal_limit(Money::from_minor(50_000))
//!     .build()
//!     .unwrap();
//!
//! assert!(atm.current_card().is_none());
//! ```

pub mod controller;
pub mod error;

pub use controller::ControllerBuilder;
pub use error::BuildError;
