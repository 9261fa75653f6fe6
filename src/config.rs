//! Machine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use crate::types::Money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_PIN_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("max_pin_attempts must be at least 1")]
    NoPinAttempts,

    #[error("withdrawal_limit must be greater than zero")]
    ZeroWithdrawalLimit,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AtmConfig {
    /// Wrong PINs tolerated before the session is terminated
    pub max_pin_attempts: u32,

    /// Largest single withdrawal, in minor units
    pub withdrawal_limit: Option<Money>,
}

impl Default for AtmConfig {
    fn default() -> Self {
        Self {
            max_pin_attempts: DEFAULT_MAX_PIN_ATTEMPTS,
            withdrawal_limit: None,
        }
    }
}

impl AtmConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pin_attempts == 0 {
            return Err(ConfigError::NoPinAttempts);
        }
        if self.withdrawal_limit.is_some_and(Money::is_zero) {
            return Err(ConfigError::ZeroWithdrawalLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = AtmConfig::from_json("{}").unwrap();
        assert_eq!(config, AtmConfig::default());
        assert_eq!(config.max_pin_attempts, 3);
        assert!(config.withdrawal_limit.is_none());
    }

    #[test]
    fn fields_are_read() {
        let config =
            AtmConfig::from_json(r#"{"max_pin_attempts": 5, "withdrawal_limit": 40000}"#).unwrap();
        assert_eq!(config.max_pin_attempts, 5);
        assert_eq!(config.withdrawal_limit, Some(Money::from_minor(40000)));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let err = AtmConfig::from_json(r#"{"max_pin_attempts": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoPinAttempts));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = AtmConfig::from_json(r#"{"withdrawal_limit": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroWithdrawalLimit));
    }

    #[test]
    fn unknown_fields_are_parse_errors() {
        let err = AtmConfig::from_json(r#"{"max_pin_attempt": 4}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
