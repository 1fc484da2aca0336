//! Cooperative cancellation
//!
//! Every evaluation receives a [`CancellationToken`]. Combinators check it
//! before starting each child; when it has fired, evaluation stops and the
//! whole tree reports [`Cancelled`] instead of a success or failure.

pub use tokio_util::sync::CancellationToken;

use crate::foundation::RuleResult;

/// Evaluation was aborted because its cancellation token fired.
///
/// Distinct from both outcomes of a [`RuleResult`]: a cancelled evaluation
/// never produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, thiserror::Error)]
#[error("rule evaluation was cancelled")]
pub struct Cancelled;

/// What evaluating a rule yields: a verdict, or a cancellation.
pub type Evaluation<T = ()> = Result<RuleResult<T>, Cancelled>;

/// Returns `Err(Cancelled)` if the token has fired.
///
/// Leaf rules call this at the top of `evaluate` (or before expensive work)
/// to honor cancellation the same way combinators do:
///
/// ```rust,ignore
/// fn evaluate(&self, ctx: &Order, cancel: &CancellationToken) -> Evaluation {
///     checkpoint(cancel)?;
///     // ...
/// }
/// ```
#[inline]
pub fn checkpoint(cancel: &CancellationToken) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}
