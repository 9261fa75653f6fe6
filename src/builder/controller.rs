//! Builder for constructing session controllers.

use crate::builder::error::BuildError;
use crate::config::AtmConfig;
use crate::enforcement::{AmountRules, AmountRulesBuilder};
use crate::services::{BankService, Hardware};
use crate::session::SessionController;
use crate::types::Money;

/// Builder for constructing a [`SessionController`] with a fluent API.
pub struct ControllerBuilder<B, H> {
    bank: Option<B>,
    hardware: Option<H>,
    config: AtmConfig,
    rules: Option<AmountRules>,
}

impl<B: BankService, H: Hardware> ControllerBuilder<B, H> {
    pub fn new() -> Self {
        Self {
            bank: None,
            hardware: None,
            config: AtmConfig::default(),
            rules: None,
        }
    }

    /// Set the bank service (required).
    pub fn bank(mut self, bank: B) -> Self {
        self.bank = Some(bank);
        self
    }

    /// Set the hardware (required).
    pub fn hardware(mut self, hardware: H) -> Self {
        self.hardware = Some(hardware);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: AtmConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_pin_attempts(mut self, attempts: u32) -> Self {
        self.config.max_pin_attempts = attempts;
        self
    }

    pub fn withdrawal_limit(mut self, limit: Money) -> Self {
        self.config.withdrawal_limit = Some(limit);
        self
    }

    /// Use custom amount rules. These replace the rules derived from the
    /// config, including its withdrawal limit.
    pub fn amount_rules(mut self, rules: AmountRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Build the controller.
    /// Returns an error if a collaborator is missing or the config is invalid.
    pub fn build(self) -> Result<SessionController<B, H>, BuildError> {
        let bank = self.bank.ok_or(BuildError::MissingBank)?;
        let hardware = self.hardware.ok_or(BuildError::MissingHardware)?;
        self.config.validate()?;

        let rules = match self.rules {
            Some(rules) => rules,
            None => AmountRulesBuilder::new()
                .maybe_withdrawal_limit(self.config.withdrawal_limit)
                .build(),
        };

        Ok(SessionController::from_parts(
            bank,
            hardware,
            rules,
            self.config.max_pin_attempts,
        ))
    }
}

impl<B: BankService, H: Hardware> Default for ControllerBuilder<B, H> {
    fn default() -> Self {
        Self::new()
    }
}
