//! AND combinator - every child rule must pass
//!
//! Children run in order and evaluation stops at the first failure, whose
//! result is returned unchanged. When every child passes, the verdict of the
//! last child is returned, so in a value-carrying chain the last rule
//! produces the value.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_rules::combinators::and_all;
//!
//! let checkout = and_all([has_items.boxed(), positive_total.boxed(), in_stock.boxed()])?;
//! let verdict = checkout.evaluate(&order, &cancel)?;
//! ```

use std::future::Future;

use super::guard;
use crate::foundation::{AsyncRule, CancellationToken, Evaluation, Rule, UsageError};

/// Logical conjunction over an ordered, non-empty list of rules.
///
/// # Type Parameters
///
/// * `R` - The child rule type (use [`BoxRule`](crate::foundation::BoxRule)
///   or [`BoxAsyncRule`](crate::foundation::BoxAsyncRule) to mix rule types)
#[derive(Debug, Clone)]
pub struct And<R> {
    first: R,
    rest: Vec<R>,
}

impl<R> And<R> {
    /// Creates an `And` from an ordered list of rules.
    ///
    /// Returns [`UsageError::EmptyComposition`] if `rules` is empty.
    pub fn new(rules: impl IntoIterator<Item = R>) -> Result<Self, UsageError> {
        let mut rules = rules.into_iter();
        let first = rules
            .next()
            .ok_or(UsageError::EmptyComposition { combinator: "and" })?;
        Ok(Self {
            first,
            rest: rules.collect(),
        })
    }

    /// Creates an `And` of exactly two rules.
    pub fn pair(first: R, second: R) -> Self {
        Self {
            first,
            rest: vec![second],
        }
    }

    /// Appends a rule to the end of the chain.
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, rule: R) -> Self {
        self.rest.push(rule);
        self
    }

    /// Iterates the child rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &R> {
        std::iter::once(&self.first).chain(&self.rest)
    }

    /// Number of child rules (never zero).
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

impl<R: Rule> Rule for And<R> {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(&self, ctx: &Self::Context, cancel: &CancellationToken) -> Evaluation<R::Output> {
        guard(cancel, "and", self.first.name())?;
        let mut current = &self.first;
        let mut outcome = current.evaluate(ctx, cancel)?;

        for rule in &self.rest {
            if outcome.is_failure() {
                tracing::trace!(
                    combinator = "and",
                    rule = current.name(),
                    "short-circuit on failure"
                );
                return Ok(outcome);
            }
            guard(cancel, "and", rule.name())?;
            outcome = rule.evaluate(ctx, cancel)?;
            current = rule;
        }

        Ok(outcome)
    }
}

impl<R: AsyncRule> AsyncRule for And<R> {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<Self::Output>> + Send {
        async move {
            guard(cancel, "and", self.first.name())?;
            let mut current = &self.first;
            let mut outcome = current.evaluate(ctx, cancel).await?;

            for rule in &self.rest {
                if outcome.is_failure() {
                    tracing::trace!(
                    combinator = "and",
                    rule = current.name(),
                    "short-circuit on failure"
                );
                    return Ok(outcome);
                }
                guard(cancel, "and", rule.name())?;
                outcome = rule.evaluate(ctx, cancel).await?;
                current = rule;
            }

            Ok(outcome)
        }
    }
}

/// Creates an `And` combinator from a list of rules.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::combinators::and_all;
///
/// let rules = vec![min_qty(1), max_qty(100)];
/// let rule = and_all(rules)?;
/// ```
pub fn and_all<R>(rules: impl IntoIterator<Item = R>) -> Result<And<R>, UsageError> {
    And::new(rules)
}
