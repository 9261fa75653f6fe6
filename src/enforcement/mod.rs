//! Amount enforcement for withdrawals and deposits.
//!
//! Every rule runs and every violation is reported, using Stillwater's
//! `Validation` to accumulate failures instead of stopping at the first one.
//! A customer asking for 30 from a machine loaded with 20s and 50s, over a
//! limit of 20, learns both problems at once.
//!
//! # Example
//!
//! ```rust
//! use atm_session::enforcement::{AmountContext, AmountRulesBuilder};
//! use atm_session::types::Money;
//!
//! let rules = AmountRulesBuilder::new()
//!     .withdrawal_limit(Money::from_minor(500))
//!     .build();
//!
//! let notes = Some(vec![Money::from_minor(20)]);
//! assert!(rules.check(&AmountContext::withdrawal(Money::from_minor(100), notes.clone())).is_ok());
//! assert_eq!(
//!     rules.check(&AmountContext::withdrawal(Money::from_minor(510), notes)).map_err(|v| v.len()),
//!     Err(2)
//! );
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

pub use builder::AmountRulesBuilder;
pub use context::AmountContext;
pub use rules::{is_dispensable, AmountRules};
pub use violations::AmountViolation;
