//! Errors raised while assembling a session controller.

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Bank service not specified. Call .bank(service) before .build()")]
    MissingBank,

    #[error("Hardware not specified. Call .hardware(device) before .build()")]
    MissingHardware,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
