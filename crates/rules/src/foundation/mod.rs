//! Core rule types and traits
//!
//! This module contains the building blocks every other part of the crate
//! is made from:
//!
//! - **Traits**: `Rule`, `AsyncRule`, `RuleExt`, `AsyncRuleExt`
//! - **Verdicts**: `RuleResult`, `RuleError`, `ErrorKind`
//! - **Cancellation**: `CancellationToken`, `Cancelled`, `checkpoint`
//! - **Misuse**: `UsageError`
//!
//! # Architecture
//!
//! ## 1. Verdicts are values
//!
//! A failed business rule is not an exceptional condition. It is an
//! ordinary `RuleResult` carrying one or more `RuleError`s, so callers can
//! collect, compare and report every violation at once:
//!
//! ```rust,ignore
//! let verdict = rule.evaluate(&order, &cancel)?;
//! for error in verdict.errors() {
//!     println!("{}: {}", error.code(), error.description());
//! }
//! ```
//!
//! ## 2. Cancellation is not a verdict
//!
//! Evaluation returns `Result<RuleResult<T>, Cancelled>`. Aborting because
//! the caller gave up is reported on the `Err` side and never mixed with
//! rule failures.
//!
//! ## 3. Misuse is loud
//!
//! Reading the value of a failure, or building a failure from zero errors,
//! returns `UsageError` instead of quietly producing a default.

pub mod cancel;
pub mod error;
pub mod outcome;
pub mod traits;
pub mod usage;

pub use cancel::{CancellationToken, Cancelled, Evaluation, checkpoint};
pub use error::{ErrorKind, RuleError};
pub use outcome::RuleResult;
pub use traits::{AsyncRule, AsyncRuleExt, BoxAsyncRule, BoxRule, DynAsyncRule, Rule, RuleExt};
pub use usage::UsageError;

// ============================================================================
// PRELUDE
// ============================================================================

/// Common imports for implementing rules.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::foundation::prelude::*;
///
/// struct NonEmpty;
///
/// impl Rule for NonEmpty {
///     type Context = str;
///     type Output = ();
///
///     fn evaluate(&self, s: &str, _cancel: &CancellationToken) -> Evaluation {
///         // ...
///     }
/// }
/// ```
pub mod prelude {
    pub use super::{
        AsyncRule, AsyncRuleExt, CancellationToken, Cancelled, ErrorKind, Evaluation, Rule,
        RuleError, RuleExt, RuleResult, UsageError, checkpoint,
    };
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Evaluates a rule once with its own fresh cancellation token.
///
/// Convenient for one-off checks and tests; long-running callers should
/// pass their own token to [`Rule::evaluate`] so they can abort it.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::foundation::evaluate;
///
/// let verdict = evaluate(&positive_total, &order)?;
/// assert!(verdict.is_success());
/// ```
pub fn evaluate<R>(rule: &R, ctx: &R::Context) -> Evaluation<R::Output>
where
    R: Rule + ?Sized,
{
    rule.evaluate(ctx, &CancellationToken::new())
}

/// Evaluates an async rule once with its own fresh cancellation token.
pub async fn evaluate_async<R>(rule: &R, ctx: &R::Context) -> Evaluation<R::Output>
where
    R: AsyncRule + ?Sized,
{
    rule.evaluate(ctx, &CancellationToken::new()).await
}

// ============================================================================
// TESTS
// ============================================================================
