//! Structural combinators
//!
//! Combinators compose rules into decision trees. Each combinator is itself
//! a rule, so trees nest to any depth:
//!
//! - [`And`] - every child must pass; stops at the first failure
//! - [`Or`] - one child must pass; stops at the first success
//! - [`Conditional`] - runs a follow-up rule depending on the primary verdict
//!
//! Every combinator implements [`Rule`](crate::foundation::Rule) when its
//! children do, and [`AsyncRule`](crate::foundation::AsyncRule) when its
//! children do. Children are always evaluated one at a time, in order, and
//! the cancellation token is checked before each child starts.

pub mod and;
pub mod conditional;
pub mod or;

pub use and::{And, and_all};
pub use conditional::{Conditional, conditional};
pub use or::{Or, or_any};

use crate::foundation::{Cancelled, CancellationToken, checkpoint};

/// Checks the token before a child starts, logging the abort.
fn guard(cancel: &CancellationToken, combinator: &'static str, rule: &str) -> Result<(), Cancelled> {
    checkpoint(cancel).inspect_err(|_| {
        tracing::debug!(combinator, rule, "evaluation cancelled before child");
    })
}
