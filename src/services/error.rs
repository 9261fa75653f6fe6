//! Collaborator error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which collaborator an error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    Bank,
    Hardware,
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => f.write_str("bank service"),
            Self::Hardware => f.write_str("hardware"),
        }
    }
}

/// A collaborator could not be reached or did not answer.
///
/// Distinct from a negative answer such as a wrong PIN or a refused debit,
/// which collaborators report through their `Ok` values.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: ServiceKind, reason: String },
}

impl ServiceError {
    pub fn bank(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            service: ServiceKind::Bank,
            reason: reason.into(),
        }
    }

    pub fn hardware(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            service: ServiceKind::Hardware,
            reason: reason.into(),
        }
    }

    pub fn service(&self) -> ServiceKind {
        match self {
            Self::Unavailable { service, .. } => *service,
        }
    }
}
