//! CONDITIONAL combinator - branch on the primary verdict
//!
//! The primary rule runs first. If it passes and an `on_success` rule is
//! present, that rule's verdict replaces the primary's; likewise for
//! `on_failure` when the primary fails. A missing branch leaves the primary
//! verdict unchanged.
//!
//! Branch rules receive the same context as the primary. They never see the
//! primary's result.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_rules::combinators::Conditional;
//!
//! // Only check stock for orders that passed basic validation;
//! // fall back to a backorder check otherwise.
//! let rule = Conditional::new(basic_checks)
//!     .on_success(stock_available)
//!     .on_failure(backorder_allowed);
//! ```

use std::future::Future;

use super::guard;
use crate::foundation::{AsyncRule, CancellationToken, Evaluation, Rule};

/// Runs a follow-up rule chosen by the primary rule's verdict.
///
/// # Type Parameters
///
/// * `P` - The primary rule
/// * `S` - The rule run when the primary passes
/// * `F` - The rule run when the primary fails
///
/// Absent branches default to the primary's type and are never evaluated.
#[derive(Debug, Clone)]
pub struct Conditional<P, S = P, F = P> {
    primary: P,
    on_success: Option<S>,
    on_failure: Option<F>,
}

impl<P> Conditional<P> {
    /// Creates a conditional with no branches; it behaves like `primary`.
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            on_success: None,
            on_failure: None,
        }
    }
}

impl<P, S, F> Conditional<P, S, F> {
    /// Creates a conditional with explicit optional branches.
    pub fn with_branches(primary: P, on_success: Option<S>, on_failure: Option<F>) -> Self {
        Self {
            primary,
            on_success,
            on_failure,
        }
    }

    /// Sets the rule evaluated when the primary passes.
    pub fn on_success<S2>(self, rule: S2) -> Conditional<P, S2, F> {
        Conditional {
            primary: self.primary,
            on_success: Some(rule),
            on_failure: self.on_failure,
        }
    }

    /// Sets the rule evaluated when the primary fails.
    pub fn on_failure<F2>(self, rule: F2) -> Conditional<P, S, F2> {
        Conditional {
            primary: self.primary,
            on_success: self.on_success,
            on_failure: Some(rule),
        }
    }

    /// Returns the primary rule.
    pub fn primary(&self) -> &P {
        &self.primary
    }

    /// Returns the success branch, if any.
    pub fn success_branch(&self) -> Option<&S> {
        self.on_success.as_ref()
    }

    /// Returns the failure branch, if any.
    pub fn failure_branch(&self) -> Option<&F> {
        self.on_failure.as_ref()
    }
}

impl<P, S, F> Rule for Conditional<P, S, F>
where
    P: Rule,
    S: Rule<Context = P::Context, Output = P::Output>,
    F: Rule<Context = P::Context, Output = P::Output>,
{
    type Context = P::Context;
    type Output = P::Output;

    fn evaluate(&self, ctx: &Self::Context, cancel: &CancellationToken) -> Evaluation<P::Output> {
        guard(cancel, "conditional", self.primary.name())?;
        let outcome = self.primary.evaluate(ctx, cancel)?;

        if outcome.is_success() {
            if let Some(rule) = &self.on_success {
                guard(cancel, "conditional", rule.name())?;
                return rule.evaluate(ctx, cancel);
            }
        } else if let Some(rule) = &self.on_failure {
            guard(cancel, "conditional", rule.name())?;
            return rule.evaluate(ctx, cancel);
        }

        Ok(outcome)
    }
}

impl<P, S, F> AsyncRule for Conditional<P, S, F>
where
    P: AsyncRule,
    S: AsyncRule<Context = P::Context, Output = P::Output>,
    F: AsyncRule<Context = P::Context, Output = P::Output>,
{
    type Context = P::Context;
    type Output = P::Output;

    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<Self::Output>> + Send {
        async move {
            guard(cancel, "conditional", self.primary.name())?;
            let outcome = self.primary.evaluate(ctx, cancel).await?;

            if outcome.is_success() {
                if let Some(rule) = &self.on_success {
                    guard(cancel, "conditional", rule.name())?;
                    return rule.evaluate(ctx, cancel).await;
                }
            } else if let Some(rule) = &self.on_failure {
                guard(cancel, "conditional", rule.name())?;
                return rule.evaluate(ctx, cancel).await;
            }

            Ok(outcome)
        }
    }
}

/// Creates a `Conditional` from a primary rule and optional branches.
pub fn conditional<P, S, F>(
    primary: P,
    on_success: Option<S>,
    on_failure: Option<F>,
) -> Conditional<P, S, F> {
    Conditional::with_branches(primary, on_success, on_failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{RuleError, RuleResult, RuleExt};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Passes or fails by fiat, counting evaluations.
    struct Fixed {
        code: Option<&'static str>,
        value: i32,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn pass(value: i32) -> Self {
            Self {
                code: None,
                value,
                calls: AtomicUsize::new(0),
            }
        }

        fn fail(code: &'static str) -> Self {
            Self {
                code: Some(code),
                value: 0,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Rule for Fixed {
        type Context = ();
        type Output = i32;

        fn evaluate(&self, _ctx: &(), _cancel: &CancellationToken) -> Evaluation<i32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match self.code {
                Some(code) => RuleError::failure(code, "fixed failure").into(),
                None => RuleResult::success(self.value),
            })
        }
    }

    fn run<R: Rule<Context = ()>>(rule: &R) -> RuleResult<R::Output> {
        rule.evaluate(&(), &CancellationToken::new()).unwrap()
    }

    #[test]
    fn test_success_branch_replaces_outcome() {
        let rule = Fixed::pass(1).on_success(Fixed::pass(2));
        assert_eq!(run(&rule).value(), Ok(&2));

        let rule = Fixed::pass(1).on_success(Fixed::fail("branch"));
        assert_eq!(run(&rule).first_error().unwrap().code(), "branch");
    }

    #[test]
    fn test_missing_success_branch_keeps_primary() {
        let rule = Fixed::pass(1).on_failure(Fixed::pass(99));
        assert_eq!(run(&rule).value(), Ok(&1));
        assert_eq!(rule.failure_branch().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_branch_replaces_outcome() {
        let rule = Fixed::fail("primary").on_failure(Fixed::pass(7));
        assert_eq!(run(&rule).value(), Ok(&7));
    }

    #[test]
    fn test_missing_failure_branch_keeps_primary_failure() {
        let rule = Fixed::fail("primary").on_success(Fixed::pass(7));
        let result = run(&rule);
        assert_eq!(result.first_error().unwrap().code(), "primary");
        assert_eq!(rule.success_branch().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_both_branches() {
        let rule = conditional(
            Fixed::fail("primary"),
            Some(Fixed::pass(1)),
            Some(Fixed::fail("fallback")),
        );
        assert_eq!(run(&rule).first_error().unwrap().code(), "fallback");
        assert_eq!(rule.success_branch().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cancelled_between_primary_and_branch() {
        struct CancelOnRun(CancellationToken);

        impl Rule for CancelOnRun {
            type Context = ();
            type Output = i32;

            fn evaluate(&self, _ctx: &(), _cancel: &CancellationToken) -> Evaluation<i32> {
                self.0.cancel();
                Ok(RuleResult::success(0))
            }
        }

        let cancel = CancellationToken::new();
        let branch = Fixed::pass(1);
        let rule = CancelOnRun(cancel.clone()).on_success(&branch);

        assert!(rule.evaluate(&(), &cancel).is_err());
        assert_eq!(branch.calls.load(Ordering::SeqCst), 0);
    }
}
