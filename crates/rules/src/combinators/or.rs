//! OR combinator - at least one child rule must pass
//!
//! Children run in order and evaluation stops at the first success, whose
//! result is returned unchanged. When every child fails, the combined
//! failure carries the errors of every child, concatenated in evaluation
//! order and without deduplication, so callers see every alternative that
//! was tried.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_rules::combinators::or_any;
//!
//! let can_edit = or_any([is_owner.boxed(), is_admin.boxed()])?;
//! ```

use std::future::Future;

use super::guard;
use crate::foundation::outcome::ErrorList;
use crate::foundation::{AsyncRule, CancellationToken, Evaluation, Rule, RuleResult, UsageError};

/// Logical disjunction over an ordered, non-empty list of rules.
#[derive(Debug, Clone)]
pub struct Or<R> {
    first: R,
    rest: Vec<R>,
}

impl<R> Or<R> {
    /// Creates an `Or` from an ordered list of rules.
    ///
    /// Returns [`UsageError::EmptyComposition`] if `rules` is empty.
    pub fn new(rules: impl IntoIterator<Item = R>) -> Result<Self, UsageError> {
        let mut rules = rules.into_iter();
        let first = rules
            .next()
            .ok_or(UsageError::EmptyComposition { combinator: "or" })?;
        Ok(Self {
            first,
            rest: rules.collect(),
        })
    }

    /// Creates an `Or` of exactly two rules.
    pub fn pair(first: R, second: R) -> Self {
        Self {
            first,
            rest: vec![second],
        }
    }

    /// Appends an alternative.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, rule: R) -> Self {
        self.rest.push(rule);
        self
    }

    /// Iterates the alternatives in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &R> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    /// Number of alternatives (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always false; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<R: Rule> Rule for Or<R> {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(&self, ctx: &Self::Context, cancel: &CancellationToken) -> Evaluation<R::Output> {
        let mut errors = ErrorList::new();

        for rule in self.rules() {
            guard(cancel, "or", rule.name())?;
            let outcome = rule.evaluate(ctx, cancel)?;
            if outcome.is_success() {
                tracing::trace!(combinator = "or", rule = rule.name(), "short-circuit on success");
                return Ok(outcome);
            }
            errors.extend(outcome.into_errors());
        }

        Ok(RuleResult::from_failures(errors))
    }
}

impl<R: AsyncRule> AsyncRule for Or<R> {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<Self::Output>> + Send {
        async move {
            let mut errors = ErrorList::new();

            for rule in self.rules() {
                guard(cancel, "or", rule.name())?;
                let outcome = rule.evaluate(ctx, cancel).await?;
                if outcome.is_success() {
                    tracing::trace!(combinator = "or", rule = rule.name(), "short-circuit on success");
                    return Ok(outcome);
                }
                errors.extend(outcome.into_errors());
            }

            Ok(RuleResult::from_failures(errors))
        }
    }
}

/// Creates an `Or` combinator from a list of alternatives.
pub fn or_any<R>(rules: impl IntoIterator<Item = R>) -> Result<Or<R>, UsageError> {
    Or::new(rules)
}
