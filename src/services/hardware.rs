//! Machine hardware contract: card reader, cash dispenser, cash acceptor, display.

use super::error::ServiceError;
use crate::types::{CardId, Money};

/// Capabilities the controller needs from the physical machine.
///
/// Hardware belongs to exactly one controller, hence `&mut self`.
pub trait Hardware {
    /// Pull the card in and hold it for the session.
    fn retain_card(&mut self, card: &CardId) -> Result<(), ServiceError>;

    fn eject_card(&mut self) -> Result<(), ServiceError>;

    /// Hand out `amount` in notes. `Ok(false)` if the dispenser could not.
    fn dispense_cash(&mut self, amount: Money) -> Result<bool, ServiceError>;

    /// Take in `amount` in notes. `Ok(false)` if the acceptor rejected them.
    fn accept_cash(&mut self, amount: Money) -> Result<bool, ServiceError>;

    /// Show a message to the customer. Best effort.
    fn display(&mut self, message: &str);

    /// Note denominations loaded in the dispenser, if the hardware reports them.
    fn denominations(&self) -> Option<Vec<Money>> {
        None
    }
}
