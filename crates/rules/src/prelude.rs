//! Prelude module for convenient imports.
//!
//! Provides a single `use nebula_rules::prelude::*;` import that brings in
//! the traits, verdict types, combinators and adapters needed to write and
//! compose rules.
//!
//! # Examples
//!
//! ```rust,ignore
//! use nebula_rules::prelude::*;
//!
//! let adult = ensure(|u: &User| u.age >= 18, RuleError::validation("age", "Must be 18+"));
//! let verified = ensure(|u: &User| u.verified, RuleError::forbidden("verified", "Unverified"));
//! let rule = adult.and(verified);
//! ```

// ============================================================================
// FOUNDATION: Core traits, verdicts, cancellation
// ============================================================================

pub use crate::foundation::{
    AsyncRule, AsyncRuleExt, BoxAsyncRule, BoxRule, CancellationToken, Cancelled, ErrorKind,
    Evaluation, Rule, RuleError, RuleExt, RuleResult, UsageError, checkpoint, evaluate,
    evaluate_async,
};

// ============================================================================
// COMBINATORS: Composition functions and types
// ============================================================================

pub use crate::combinators::{And, Conditional, Or, and_all, conditional, or_any};

// ============================================================================
// ADAPTERS: Closures and predicates as rules
// ============================================================================

pub use crate::adapters::{
    AsyncFnRule, Ensure, FnRule, Lifted, async_rule_fn, ensure, lift, rule_fn,
};

// ============================================================================
// TREES
// ============================================================================

pub use crate::tree::{AsyncRuleTree, RuleTree};
