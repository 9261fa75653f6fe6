//! Amount rules evaluated with `Validation`.

use crate::enforcement::context::AmountContext;
use crate::enforcement::violations::AmountViolation;
use crate::types::Money;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for amount check functions
pub type AmountCheck =
    Box<dyn Fn(&AmountContext) -> Validation<(), NonEmptyVec<AmountViolation>> + Send + Sync>;

/// Rules an amount must satisfy before any money moves.
/// Uses Validation to accumulate ALL violations.
pub struct AmountRules {
    pub(crate) withdrawal_limit: Option<Money>,
    pub(crate) required_checks: Vec<AmountCheck>,
}

impl AmountRules {
    /// Enforce all rules, accumulating ALL violations.
    pub fn enforce(&self, context: &AmountContext) -> Validation<(), NonEmptyVec<AmountViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<AmountViolation>>> = Vec::new();

        checks.push(if context.amount.is_zero() {
            Validation::fail(AmountViolation::Zero)
        } else {
            Validation::success(())
        });

        if context.is_withdrawal() {
            if let Some(notes) = &context.notes {
                let check = if context.amount.is_zero() || is_dispensable(context.amount, notes) {
                    Validation::success(())
                } else {
                    Validation::fail(AmountViolation::NotDispensable {
                        amount: context.amount,
                        notes: notes.clone(),
                    })
                };
                checks.push(check);
            }

            if let Some(limit) = self.withdrawal_limit {
                let check = if context.amount > limit {
                    Validation::fail(AmountViolation::ExceedsLimit {
                        amount: context.amount,
                        limit,
                    })
                } else {
                    Validation::success(())
                };
                checks.push(check);
            }
        }

        for check_fn in &self.required_checks {
            checks.push(check_fn(context));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Same as [`enforce`](Self::enforce), flattened into a `Result`.
    pub fn check(&self, context: &AmountContext) -> Result<(), Vec<AmountViolation>> {
        match self.enforce(context) {
            Validation::Success(_) => Ok(()),
            Validation::Failure(errors) => Err(errors.iter().cloned().collect()),
        }
    }

    pub fn withdrawal_limit(&self) -> Option<Money> {
        self.withdrawal_limit
    }
}

impl Default for AmountRules {
    fn default() -> Self {
        Self {
            withdrawal_limit: None,
            required_checks: Vec::new(),
        }
    }
}

/// Whether `amount` is a sum of the given notes, any number of each.
///
/// Amounts are reduced by the notes' gcd first. Past the Schur bound
/// `(min - 1) * (max - 1)` every reduced amount is representable. Below it,
/// the smallest representable value of each residue class modulo the
/// smallest note decides, so memory follows the notes and never the amount.
pub fn is_dispensable(amount: Money, notes: &[Money]) -> bool {
    let notes: Vec<u64> = notes
        .iter()
        .map(|n| n.minor_units())
        .filter(|&n| n > 0)
        .collect();
    let amount = amount.minor_units();
    if amount == 0 {
        return true;
    }
    let Some(divisor) = notes.iter().copied().reduce(gcd) else {
        return false;
    };
    if amount % divisor != 0 {
        return false;
    }

    let target = amount / divisor;
    let reduced: Vec<u64> = notes.iter().map(|n| n / divisor).collect();
    let smallest = reduced.iter().copied().min().unwrap_or(1);
    let largest = reduced.iter().copied().max().unwrap_or(1);
    let bound = u128::from(smallest - 1) * u128::from(largest - 1);
    if u128::from(target) >= bound {
        return true;
    }

    let modulus = smallest as usize;
    let mut least = vec![u64::MAX; modulus];
    least[0] = 0;
    for &note in &reduced {
        let step = (note % smallest) as usize;
        if step == 0 {
            continue;
        }
        // Two laps round each residue cycle settle every entry on it
        let cycles = gcd(smallest, step as u64) as usize;
        let laps = 2 * (modulus / cycles);
        for start in 0..cycles {
            let mut residue = start;
            for _ in 0..laps {
                let next = (residue + step) % modulus;
                let candidate = least[residue].saturating_add(note);
                if candidate < least[next] {
                    least[next] = candidate;
                }
                residue = next;
            }
        }
    }
    least[(target % smallest) as usize] <= target
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforcement::builder::AmountRulesBuilder;

    fn money(units: u64) -> Money {
        Money::from_minor(units)
    }

    fn notes(values: &[u64]) -> Vec<Money> {
        values.iter().copied().map(Money::from_minor).collect()
    }

    #[test]
    fn zero_is_always_rejected() {
        let rules = AmountRules::default();

        assert_eq!(
            rules.check(&AmountContext::deposit(Money::ZERO)),
            Err(vec![AmountViolation::Zero])
        );
        assert_eq!(
            rules.check(&AmountContext::withdrawal(Money::ZERO, Some(notes(&[20])))),
            Err(vec![AmountViolation::Zero])
        );
    }

    #[test]
    fn enforcement_accumulates_all_violations() {
        let rules = AmountRulesBuilder::new()
            .withdrawal_limit(money(20))
            .require_pred(|_ctx| false, "Custom check always fails".to_string())
            .build();

        let context = AmountContext::withdrawal(money(30), Some(notes(&[20, 50])));

        match rules.enforce(&context) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AmountViolation::NotDispensable { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AmountViolation::ExceedsLimit { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, AmountViolation::CustomCheckFailed { .. })));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn deposits_ignore_withdrawal_rules() {
        let rules = AmountRulesBuilder::new().withdrawal_limit(money(100)).build();
        assert!(rules.enforce(&AmountContext::deposit(money(5000))).is_success());
    }

    #[test]
    fn withdrawal_without_reported_notes_skips_dispensability() {
        let rules = AmountRules::default();
        assert!(rules
            .enforce(&AmountContext::withdrawal(money(7), None))
            .is_success());
    }

    #[test]
    fn limit_is_inclusive() {
        let rules = AmountRulesBuilder::new().withdrawal_limit(money(100)).build();
        assert!(rules
            .enforce(&AmountContext::withdrawal(money(100), None))
            .is_success());
        assert!(rules
            .enforce(&AmountContext::withdrawal(money(101), None))
            .is_failure());
    }

    #[test]
    fn dispensable_with_single_note() {
        assert!(is_dispensable(money(60), &notes(&[20])));
        assert!(!is_dispensable(money(50), &notes(&[20])));
    }

    #[test]
    fn dispensable_with_mixed_notes() {
        let loaded = notes(&[20, 50]);
        assert!(is_dispensable(money(20), &loaded));
        assert!(is_dispensable(money(70), &loaded));
        assert!(is_dispensable(money(90), &loaded));
        assert!(!is_dispensable(money(10), &loaded));
        assert!(!is_dispensable(money(30), &loaded));
        assert!(!is_dispensable(money(55), &loaded));
        // Beyond the Schur bound every multiple of 10 works
        assert!(is_dispensable(money(1_000_010), &loaded));
    }

    #[test]
    fn nothing_is_dispensable_from_an_empty_cassette() {
        assert!(!is_dispensable(money(20), &[]));
        assert!(!is_dispensable(money(20), &notes(&[0])));
    }

    #[test]
    fn minor_unit_notes_reduce_by_gcd() {
        // $20 and $50 notes expressed in cents
        let loaded = notes(&[2000, 5000]);
        assert!(is_dispensable(money(9000), &loaded));
        assert!(!is_dispensable(money(3000), &loaded));
        assert!(!is_dispensable(money(2050), &loaded));
    }

    #[test]
    fn large_coprime_notes_do_not_scale_with_the_amount() {
        let loaded = notes(&[9973, 10007]);
        assert!(is_dispensable(money(9973 * 3 + 10007 * 5), &loaded));
        // Frobenius number of 9973 and 10007: the largest unreachable amount
        assert!(!is_dispensable(money(99_779_831), &loaded));
        assert!(is_dispensable(money(99_779_832), &loaded));

        let loaded = notes(&[999_983, 1_000_003]);
        assert!(is_dispensable(money(999_983 * 2 + 1_000_003 * 3), &loaded));
        assert!(!is_dispensable(money(999_983_999_963), &loaded));
        assert!(!is_dispensable(money(999_983 + 1), &loaded));
    }
}
