//! # nebula-rules
//!
//! Composable business-rule evaluation for the Nebula workflow engine.
//!
//! A rule inspects a context and produces a verdict: success, optionally
//! carrying a value, or failure carrying one or more structured errors.
//! Rules compose into decision trees with AND, OR and conditional
//! branching, in synchronous and asynchronous flavours.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nebula_rules::prelude::*;
//!
//! let has_items = ensure(|o: &Order| !o.items.is_empty(), RuleError::validation("order.empty", "Order has no items"));
//! let positive = ensure(|o: &Order| o.total > 0, RuleError::validation("order.total", "Total must be positive"));
//!
//! let checkout = has_items.and(positive);
//! let verdict = checkout.evaluate(&order, &CancellationToken::new())?;
//! if verdict.is_failure() {
//!     for error in verdict.errors() {
//!         eprintln!("{error}");
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`foundation`] - verdicts, errors, the `Rule`/`AsyncRule` traits, cancellation
//! - [`combinators`] - [`And`](combinators::And), [`Or`](combinators::Or),
//!   [`Conditional`](combinators::Conditional)
//! - [`adapters`] - closures and predicates as rules
//! - [`tree`] - runtime-assembled rule trees
//!
//! ## Feature flags
//!
//! - `serde` - `Serialize`/`Deserialize` for errors and JSON rendering of verdicts

// Combinator nesting (Conditional<And<BoxRule<..>>, Or<..>, ..>) produces
// complex types that are inherent to the generic combinator design.
#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod combinators;
pub mod foundation;
pub mod prelude;
pub mod tree;
