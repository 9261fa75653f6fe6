//! Builder API for amount rules.

use crate::enforcement::context::AmountContext;
use crate::enforcement::rules::{AmountCheck, AmountRules};
use crate::enforcement::violations::AmountViolation;
use crate::types::Money;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating amount rules
pub struct AmountRulesBuilder {
    withdrawal_limit: Option<Money>,
    required_checks: Vec<AmountCheck>,
}

impl AmountRulesBuilder {
    pub fn new() -> Self {
        Self {
            withdrawal_limit: None,
            required_checks: Vec::new(),
        }
    }

    /// Largest amount a single withdrawal may request
    pub fn withdrawal_limit(mut self, limit: Money) -> Self {
        self.withdrawal_limit = Some(limit);
        self
    }

    /// Same as [`withdrawal_limit`](Self::withdrawal_limit) but accepts "no limit".
    pub fn maybe_withdrawal_limit(mut self, limit: Option<Money>) -> Self {
        self.withdrawal_limit = limit;
        self
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&AmountContext) -> Validation<(), NonEmptyVec<AmountViolation>>
            + Send
            + Sync
            + 'static,
    {
        self.required_checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&AmountContext) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &AmountContext| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(AmountViolation::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.required_checks.push(Box::new(check));
        self
    }

    pub fn build(self) -> AmountRules {
        AmountRules {
            withdrawal_limit: self.withdrawal_limit,
            required_checks: self.required_checks,
        }
    }
}

impl Default for AmountRulesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
