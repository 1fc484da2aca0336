//! Function adapters - plain functions as rules
//!
//! Building a dedicated type for every leaf check is heavy. The adapters in
//! this module wrap a closure so it satisfies [`Rule`] or [`AsyncRule`]:
//!
//! - [`rule_fn`] - `Fn(&C, &CancellationToken) -> Evaluation<T>`
//! - [`async_rule_fn`] - the same, returning a boxed future
//! - [`ensure`] - a boolean predicate plus the error to report when it is false
//! - [`Lifted`] - runs a synchronous rule inside an async tree
//!
//! Construction never calls the wrapped function. Evaluation forwards the
//! context and token unchanged and returns the function's result verbatim.
//! [`Ensure`] checks the token before calling its predicate.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_rules::prelude::*;
//!
//! let adult = ensure(|u: &User| u.age >= 18, RuleError::validation("age.min", "Must be 18+"));
//!
//! let lookup = async_rule_fn(|u: &User, _cancel| {
//!     Box::pin(async move {
//!         let account = accounts.find(u.id).await;
//!         Ok(RuleResult::success(account))
//!     })
//! });
//! ```

use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use futures::future::BoxFuture;

use crate::foundation::{
    AsyncRule, CancellationToken, Evaluation, Rule, RuleError, RuleResult, checkpoint,
};

// ============================================================================
// SYNC FUNCTION ADAPTER
// ============================================================================

/// A synchronous rule backed by a closure.
pub struct FnRule<F, C: ?Sized, T = ()> {
    f: F,
    name: Option<Cow<'static, str>>,
    _marker: PhantomData<fn(&C) -> T>,
}

impl<F, C: ?Sized, T> FnRule<F, C, T>
where
    F: Fn(&C, &CancellationToken) -> Evaluation<T>,
{
    /// Wraps `f` without calling it.
    pub fn new(f: F) -> Self {
        Self {
            f,
            name: None,
            _marker: PhantomData,
        }
    }

    /// Sets the name reported by [`Rule::name`].
    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<F, C: ?Sized, T> Rule for FnRule<F, C, T>
where
    F: Fn(&C, &CancellationToken) -> Evaluation<T>,
{
    type Context = C;
    type Output = T;

    fn evaluate(&self, ctx: &C, cancel: &CancellationToken) -> Evaluation<T> {
        (self.f)(ctx, cancel)
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("fn_rule")
    }
}

impl<F: Clone, C: ?Sized, T> Clone for FnRule<F, C, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<F, C: ?Sized, T> fmt::Debug for FnRule<F, C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Wraps a closure as a synchronous [`Rule`].
///
/// # Examples
///
/// ```rust,ignore
/// let parse_qty = rule_fn(|raw: &str, _cancel| match raw.parse::<u32>() {
///     Ok(qty) => Ok(RuleResult::success(qty)),
///     Err(_) => Ok(RuleError::validation("qty.parse", "Not a number").into()),
/// });
/// ```
pub fn rule_fn<C: ?Sized, T, F>(f: F) -> FnRule<F, C, T>
where
    F: Fn(&C, &CancellationToken) -> Evaluation<T>,
{
    FnRule::new(f)
}

// ============================================================================
// ASYNC FUNCTION ADAPTER
// ============================================================================

/// An asynchronous rule backed by a closure returning a boxed future.
pub struct AsyncFnRule<F, C: ?Sized, T = ()> {
    f: F,
    name: Option<Cow<'static, str>>,
    _marker: PhantomData<fn(&C) -> T>,
}

impl<F, C, T> AsyncFnRule<F, C, T>
where
    C: ?Sized,
    F: for<'a> Fn(&'a C, &'a CancellationToken) -> BoxFuture<'a, Evaluation<T>>,
{
    /// Wraps `f` without calling it.
    pub fn new(f: F) -> Self {
        Self {
            f,
            name: None,
            _marker: PhantomData,
        }
    }

    /// Sets the name reported by [`AsyncRule::name`].
    #[must_use = "builder methods must be chained or built"]
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<F, C, T> AsyncRule for AsyncFnRule<F, C, T>
where
    C: ?Sized + Sync,
    T: Send,
    F: for<'a> Fn(&'a C, &'a CancellationToken) -> BoxFuture<'a, Evaluation<T>> + Send + Sync,
{
    type Context = C;
    type Output = T;

    fn evaluate(
        &self,
        ctx: &C,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<T>> + Send {
        async move { (self.f)(ctx, cancel).await }
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("async_fn_rule")
    }
}

impl<F, C: ?Sized, T> fmt::Debug for AsyncFnRule<F, C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFnRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Wraps a closure returning a boxed future as an [`AsyncRule`].
pub fn async_rule_fn<C, T, F>(f: F) -> AsyncFnRule<F, C, T>
where
    C: ?Sized,
    F: for<'a> Fn(&'a C, &'a CancellationToken) -> BoxFuture<'a, Evaluation<T>>,
{
    AsyncFnRule::new(f)
}

// ============================================================================
// PREDICATE ADAPTER
// ============================================================================

/// Passes when a predicate holds, otherwise fails with a fixed error.
pub struct Ensure<F, C: ?Sized> {
    predicate: F,
    error: RuleError,
    _marker: PhantomData<fn(&C)>,
}

impl<F, C: ?Sized> Ensure<F, C>
where
    F: Fn(&C) -> bool,
{
    /// Creates the rule; `error` is reported each time the predicate is false.
    pub fn new(predicate: F, error: RuleError) -> Self {
        Self {
            predicate,
            error,
            _marker: PhantomData,
        }
    }

    /// The error reported on failure.
    pub fn error(&self) -> &RuleError {
        &self.error
    }
}

impl<F, C: ?Sized> Rule for Ensure<F, C>
where
    F: Fn(&C) -> bool,
{
    type Context = C;
    type Output = ();

    fn evaluate(&self, ctx: &C, cancel: &CancellationToken) -> Evaluation {
        checkpoint(cancel)?;
        if (self.predicate)(ctx) {
            Ok(RuleResult::passed())
        } else {
            Ok(RuleResult::failure(self.error.clone()))
        }
    }

    fn name(&self) -> &str {
        self.error.code()
    }
}

impl<F, C: ?Sized> fmt::Debug for Ensure<F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ensure")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// Creates an [`Ensure`] rule.
pub fn ensure<C: ?Sized, F>(predicate: F, error: RuleError) -> Ensure<F, C>
where
    F: Fn(&C) -> bool,
{
    Ensure::new(predicate, error)
}

// ============================================================================
// SYNC-IN-ASYNC ADAPTER
// ============================================================================

/// Runs a synchronous rule as an [`AsyncRule`].
///
/// The wrapped rule executes inline when the future is first polled; it
/// never suspends.
#[derive(Debug, Clone)]
pub struct Lifted<R>(pub R);

impl<R> AsyncRule for Lifted<R>
where
    R: Rule + Send + Sync,
    R::Context: Sync,
    R::Output: Send,
{
    type Context = R::Context;
    type Output = R::Output;

    fn evaluate(
        &self,
        ctx: &Self::Context,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Evaluation<Self::Output>> + Send {
        async move { self.0.evaluate(ctx, cancel) }
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// Wraps a synchronous rule for use in async trees.
pub fn lift<R: Rule>(rule: R) -> Lifted<R> {
    Lifted(rule)
}
