//! Collaborator contracts consumed by the session controller.
//!
//! - [`BankService`]: PIN verification, account lookup, balance reads and
//!   atomic debit/credit. Shared across machines.
//! - [`Hardware`]: card reader, dispenser, acceptor and display. Owned by one
//!   machine.
//!
//! Both report an unreachable device as [`ServiceError`], keeping negative
//! answers (wrong PIN, refused debit) in their `Ok` values.

mod bank;
mod error;
mod hardware;
pub mod mock;

pub use bank::BankService;
pub use error::{ServiceError, ServiceKind};
pub use hardware::Hardware;
pub use mock::{InMemoryBank, MockHardware};
