//! Core traits for the rule engine
//!
//! A rule evaluates a context and yields an [`Evaluation`]: either a
//! [`RuleResult`](crate::foundation::RuleResult) verdict or [`Cancelled`].
//!
//! - [`Rule`] evaluates inline on the caller's thread.
//! - [`AsyncRule`] may suspend (database lookups, remote checks) before
//!   producing its verdict.
//!
//! Both carry the context type and the success value type as associated
//! types. Rules that only pass or fail use `Output = ()`.

use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::combinators::{And, Conditional, Or};
use crate::foundation::{CancellationToken, Evaluation};

#[cfg(doc)]
use crate::foundation::Cancelled;

// ============================================================================
// SYNC RULE
// ============================================================================

/// A business rule evaluated synchronously against a context.
///
/// Implementations must not mutate shared state that affects the verdict:
/// the same rule is evaluated many times, possibly by concurrent callers.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::prelude::*;
///
/// struct PositiveTotal;
///
/// impl Rule for PositiveTotal {
///     type Context = Order;
///     type Output = ();
///
///     fn evaluate(&self, order: &Order, cancel: &CancellationToken) -> Evaluation {
///         checkpoint(cancel)?;
///         if order.total > 0 {
///             Ok(RuleResult::passed())
///         } else {
///             Ok(RuleError::validation("order.total", "Total must be positive").into())
///         }
///     }
/// }
/// ```
pub trait Rule {
    /// The value the rule is evaluated against.
    type Context: ?Sized;

    /// The value carried by a successful verdict.
    type Output;

    /// Evaluates the rule.
    ///
    /// Returns `Err(Cancelled)` only when `cancel` has fired.
    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> Evaluation<Self::Output>;

    /// Returns the name of this rule.
    ///
    /// Used in tracing output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<R: Rule + ?Sized> Rule for &R {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(&self, ctx: &Self::Context, cancel: &CancellationToken) -> Evaluation<R::Output> {
        (**self).evaluate(ctx, cancel)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: Rule + ?Sized> Rule for Box<R> {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(&self, ctx: &Self::Context, cancel: &CancellationToken) -> Evaluation<R::Output> {
        (**self).evaluate(ctx, cancel)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: Rule + ?Sized> Rule for Arc<R> {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(&self, ctx: &Self::Context, cancel: &CancellationToken) -> Evaluation<R::Output> {
        (**self).evaluate(ctx, cancel)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A type-erased synchronous rule.
pub type BoxRule<C, T = ()> = Box<dyn Rule<Context = C, Output = T> + Send + Sync>;

// ============================================================================
// ASYNC RULE
// ============================================================================

/// A business rule whose evaluation may suspend.
///
/// Use this for checks that perform I/O, such as uniqueness lookups.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::prelude::*;
///
/// struct EmailIsFree {
///     users: UserStore,
/// }
///
/// impl AsyncRule for EmailIsFree {
///     type Context = SignUp;
///     type Output = ();
///
///     async fn evaluate(&self, form: &SignUp, cancel: &CancellationToken) -> Evaluation {
///         checkpoint(cancel)?;
///         if self.users.exists(&form.email).await {
///             Ok(RuleError::conflict("email.taken", "Email already registered").into())
///         } else {
///             Ok(RuleResult::passed())
///         }
///     }
/// }
/// ```
pub trait AsyncRule: Send + Sync {
    /// The value the rule is evaluated against.
    type Context: ?Sized + Sync;

    /// The value carried by a successful verdict.
    type Output: Send;

    /// Asynchronously evaluates the rule.
    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<Self::Output>> + Send;

    /// Returns the name of this rule.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<R: AsyncRule + ?Sized> AsyncRule for &R {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<Self::Output>> + Send {
        (**self).evaluate(ctx, cancel)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<R: AsyncRule + ?Sized> AsyncRule for Arc<R> {
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<Self::Output>> + Send {
        (**self).evaluate(ctx, cancel)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Object-safe form of [`AsyncRule`].
///
/// `AsyncRule` returns an opaque future and so cannot be used as a trait
/// object. Every `AsyncRule` implements this trait, which boxes the future;
/// [`BoxAsyncRule`] is built on top of it.
pub trait DynAsyncRule<C: ?Sized, T>: Send + Sync {
    /// Evaluates the rule, boxing the returned future.
    fn evaluate_boxed<'a>(
        &'a self,
        ctx: &'a C,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Evaluation<T>>;

    /// Returns the name of the wrapped rule.
    fn rule_name(&self) -> &str;
}

impl<R: AsyncRule> DynAsyncRule<R::Context, R::Output> for R {
    fn evaluate_boxed<'a>(
        &'a self,
        ctx: &'a R::Context,
        cancel: &'a CancellationToken,
    ) -> BoxFuture<'a, Evaluation<R::Output>> {
        Box::pin(self.evaluate(ctx, cancel))
    }

    fn rule_name(&self) -> &str {
        self.name()
    }
}

/// A type-erased asynchronous rule.
pub type BoxAsyncRule<C, T = ()> = Box<dyn DynAsyncRule<C, T>>;

impl<C, T> AsyncRule for Box<dyn DynAsyncRule<C, T>>
where
    C: ?Sized + Sync,
    T: Send,
{
    type Context = C;
    type Output = T;

    fn evaluate(
        &self,
        ctx: &C,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<T>> + Send {
        async move { (**self).evaluate_boxed(ctx, cancel).await }
    }

    fn name(&self) -> &str {
        (**self).rule_name()
    }
}

// ============================================================================
// EXTENSION TRAITS
// ============================================================================

/// Fluent composition for synchronous rules.
///
/// Automatically implemented for every [`Rule`].
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::prelude::*;
///
/// let checkout = has_items
///     .and(positive_total)
///     .on_success(stock_available)
///     .on_failure(log_rejection);
/// ```
pub trait RuleExt: Rule + Sized {
    /// Erases the concrete type of this rule.
    fn boxed(self) -> BoxRule<Self::Context, Self::Output>
    where
        Self: Send + Sync + 'static,
    {
        Box::new(self)
    }

    /// Both rules must pass; the second is skipped if the first fails.
    fn and<R>(self, other: R) -> And<BoxRule<Self::Context, Self::Output>>
    where
        Self: Send + Sync + 'static,
        R: Rule<Context = Self::Context, Output = Self::Output> + Send + Sync + 'static,
    {
        And::pair(RuleExt::boxed(self), RuleExt::boxed(other))
    }

    /// Either rule must pass; the second runs only if the first fails.
    fn or<R>(self, other: R) -> Or<BoxRule<Self::Context, Self::Output>>
    where
        Self: Send + Sync + 'static,
        R: Rule<Context = Self::Context, Output = Self::Output> + Send + Sync + 'static,
    {
        Or::pair(RuleExt::boxed(self), RuleExt::boxed(other))
    }

    /// Replaces a successful verdict with the verdict of `rule`.
    fn on_success<S>(self, rule: S) -> Conditional<Self, S, Self>
    where
        S: Rule<Context = Self::Context, Output = Self::Output>,
    {
        Conditional::new(self).on_success(rule)
    }

    /// Replaces a failed verdict with the verdict of `rule`.
    fn on_failure<F>(self, rule: F) -> Conditional<Self, Self, F>
    where
        F: Rule<Context = Self::Context, Output = Self::Output>,
    {
        Conditional::new(self).on_failure(rule)
    }
}

impl<T: Rule> RuleExt for T {}

/// Fluent composition for asynchronous rules.
///
/// Automatically implemented for every [`AsyncRule`].
pub trait AsyncRuleExt: AsyncRule + Sized {
    /// Erases the concrete type of this rule.
    fn boxed(self) -> BoxAsyncRule<Self::Context, Self::Output>
    where
        Self: 'static,
    {
        Box::new(self)
    }

    /// Both rules must pass; the second is not started if the first fails.
    fn and<R>(self, other: R) -> And<BoxAsyncRule<Self::Context, Self::Output>>
    where
        Self: 'static,
        R: AsyncRule<Context = Self::Context, Output = Self::Output> + 'static,
    {
        And::pair(AsyncRuleExt::boxed(self), AsyncRuleExt::boxed(other))
    }

    /// Either rule must pass; the second is not started if the first passes.
    fn or<R>(self, other: R) -> Or<BoxAsyncRule<Self::Context, Self::Output>>
    where
        Self: 'static,
        R: AsyncRule<Context = Self::Context, Output = Self::Output> + 'static,
    {
        Or::pair(AsyncRuleExt::boxed(self), AsyncRuleExt::boxed(other))
    }

    /// Replaces a successful verdict with the verdict of `rule`.
    fn on_success<S>(self, rule: S) -> Conditional<Self, S, Self>
    where
        S: AsyncRule<Context = Self::Context, Output = Self::Output>,
    {
        Conditional::new(self).on_success(rule)
    }

    /// Replaces a failed verdict with the verdict of `rule`.
    fn on_failure<F>(self, rule: F) -> Conditional<Self, Self, F>
    where
        F: AsyncRule<Context = Self::Context, Output = Self::Output>,
    {
        Conditional::new(self).on_failure(rule)
    }
}

impl<T: AsyncRule> AsyncRuleExt for T {}

// ============================================================================
// TESTS
// ============================================================================
