//! The multi-error outcome of evaluating a rule
//!
//! [`RuleResult<T>`] is either a success carrying a value of type `T`, or a
//! failure carrying one or more [`RuleError`]s. The non-value form is simply
//! `RuleResult<()>`.
//!
//! The representation is private, so the only ways to build a result are
//! [`RuleResult::success`], [`RuleResult::passed`], [`RuleResult::failure`]
//! and [`RuleResult::try_failures`]. This keeps the core invariant: a success
//! has no errors, a failure has at least one.
//!
//! # Equality
//!
//! Two results are equal when both succeeded with equal values, or both
//! failed with the same multiset of error codes. Error order, description
//! and kind are ignored:
//!
//! ```rust,ignore
//! let a = RuleResult::<()>::try_failures([err("A"), err("B")])?;
//! let b = RuleResult::<()>::try_failures([err("B"), err("A")])?;
//! assert_eq!(a, b);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

use crate::foundation::{RuleError, UsageError};

/// Error storage; a single error is the overwhelmingly common case.
pub(crate) type ErrorList = SmallVec<[RuleError; 1]>;

#[derive(Debug, Clone)]
enum Outcome<T> {
    Success(T),
    Failure(ErrorList),
}

/// Immutable success/failure outcome of a rule.
///
/// # Examples
///
/// ```rust,ignore
/// use nebula_rules::foundation::{RuleError, RuleResult};
///
/// let ok = RuleResult::success(42);
/// assert_eq!(ok.value(), Ok(&42));
///
/// let failed: RuleResult<i32> = RuleError::validation("qty.zero", "Quantity is zero").into();
/// assert_eq!(failed.first_error().map(|e| e.code()), Ok("qty.zero"));
/// ```
#[derive(Debug, Clone)]
#[must_use = "a rule result should be inspected or propagated"]
pub struct RuleResult<T = ()> {
    outcome: Outcome<T>,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl RuleResult<()> {
    /// Successful outcome without a value.
    pub const fn passed() -> Self {
        Self {
            outcome: Outcome::Success(()),
        }
    }

    /// Aggregates many results into one.
    ///
    /// Succeeds iff every input succeeded. Otherwise fails with the errors
    /// of every failed input, concatenated in input order. Values are
    /// discarded.
    pub fn combine<U, I>(results: I) -> Self
    where
        I: IntoIterator<Item = RuleResult<U>>,
    {
        let errors: ErrorList = results
            .into_iter()
            .flat_map(RuleResult::into_errors)
            .collect();

        if errors.is_empty() {
            Self::passed()
        } else {
            Self::from_failures(errors)
        }
    }
}

impl<T> RuleResult<T> {
    /// Successful outcome carrying `value`.
    pub const fn success(value: T) -> Self {
        Self {
            outcome: Outcome::Success(value),
        }
    }

    /// Failed outcome with a single error.
    pub fn failure(error: RuleError) -> Self {
        let mut errors = ErrorList::new();
        errors.push(error);
        Self::from_failures(errors)
    }

    /// Failed outcome with one or more errors, kept in the given order.
    ///
    /// Returns [`UsageError::EmptyErrors`] when `errors` is empty.
    pub fn try_failures<I>(errors: I) -> Result<Self, UsageError>
    where
        I: IntoIterator<Item = RuleError>,
    {
        let errors: ErrorList = errors.into_iter().collect();
        if errors.is_empty() {
            Err(UsageError::EmptyErrors)
        } else {
            Ok(Self::from_failures(errors))
        }
    }

    /// Builds a failure from a list the caller knows to be non-empty.
    pub(crate) fn from_failures(errors: ErrorList) -> Self {
        debug_assert!(!errors.is_empty(), "failure without errors");
        Self {
            outcome: Outcome::Failure(errors),
        }
    }
}

impl<T> From<RuleError> for RuleResult<T> {
    fn from(error: RuleError) -> Self {
        Self::failure(error)
    }
}

// ============================================================================
// INSPECTION
// ============================================================================

impl<T> RuleResult<T> {
    /// Returns true if the rule succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    /// Returns true if the rule failed.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The errors of a failure, or an empty slice on success.
    #[must_use]
    pub fn errors(&self) -> &[RuleError] {
        match &self.outcome {
            Outcome::Success(_) => &[],
            Outcome::Failure(errors) => errors,
        }
    }

    /// The first error of a failure.
    pub fn first_error(&self) -> Result<&RuleError, UsageError> {
        self.errors()
            .first()
            .ok_or(UsageError::invalid_state("first_error", true))
    }

    /// The last error of a failure.
    pub fn last_error(&self) -> Result<&RuleError, UsageError> {
        self.errors()
            .last()
            .ok_or(UsageError::invalid_state("last_error", true))
    }

    /// The value of a success.
    pub fn value(&self) -> Result<&T, UsageError> {
        match &self.outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(_) => Err(UsageError::invalid_state("value", false)),
        }
    }

    /// Consumes the result and returns the value of a success.
    pub fn into_value(self) -> Result<T, UsageError> {
        match self.outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(_) => Err(UsageError::invalid_state("value", false)),
        }
    }

    /// Consumes the result and returns its errors (empty on success).
    #[must_use]
    pub fn into_errors(self) -> Vec<RuleError> {
        match self.outcome {
            Outcome::Success(_) => Vec::new(),
            Outcome::Failure(errors) => errors.into_vec(),
        }
    }

    /// Converts into a standard `Result`.
    pub fn into_result(self) -> Result<T, Vec<RuleError>> {
        match self.outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(errors) => Err(errors.into_vec()),
        }
    }
}

// ============================================================================
// TRANSFORMATION
// ============================================================================

impl<T> RuleResult<T> {
    /// Transforms the value of a success; failures pass through.
    pub fn map<U, F>(self, f: F) -> RuleResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self.outcome {
            Outcome::Success(value) => RuleResult::success(f(value)),
            Outcome::Failure(errors) => RuleResult::from_failures(errors),
        }
    }

    /// Chains a value-dependent check after a success; failures pass through.
    pub fn and_then<U, F>(self, f: F) -> RuleResult<U>
    where
        F: FnOnce(T) -> RuleResult<U>,
    {
        match self.outcome {
            Outcome::Success(value) => f(value),
            Outcome::Failure(errors) => RuleResult::from_failures(errors),
        }
    }

    /// Drops the value, keeping only the verdict.
    pub fn discard(self) -> RuleResult<()> {
        self.map(|_| ())
    }

    /// Renders the result as JSON for presentation boundaries.
    #[cfg(feature = "serde")]
    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error>
    where
        T: serde::Serialize,
    {
        use serde_json::json;

        Ok(match &self.outcome {
            Outcome::Success(value) => json!({
                "success": true,
                "value": serde_json::to_value(value)?,
            }),
            Outcome::Failure(errors) => json!({
                "success": false,
                "errors": serde_json::to_value(errors.as_slice())?,
            }),
        })
    }
}

// ============================================================================
// EQUALITY & HASHING
// ============================================================================

/// Error codes sorted, so comparisons and hashes ignore order.
fn sorted_codes(errors: &[RuleError]) -> SmallVec<[&str; 4]> {
    let mut codes: SmallVec<[&str; 4]> = errors.iter().map(RuleError::code).collect();
    codes.sort_unstable();
    codes
}

impl<T: PartialEq> PartialEq for RuleResult<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.outcome, &other.outcome) {
            (Outcome::Success(left), Outcome::Success(right)) => left == right,
            (Outcome::Failure(left), Outcome::Failure(right)) => {
                left.len() == right.len() && sorted_codes(left) == sorted_codes(right)
            }
            _ => false,
        }
    }
}

impl<T: Eq> Eq for RuleResult<T> {}

impl<T> Hash for RuleResult<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.outcome {
            Outcome::Success(_) => true.hash(state),
            Outcome::Failure(errors) => {
                false.hash(state);
                for code in sorted_codes(errors) {
                    code.hash(state);
                }
            }
        }
    }
}

impl<T> fmt::Display for RuleResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Success(_) => write!(f, "Rule evaluation succeeded"),
            Outcome::Failure(errors) => {
                write!(f, "Rule evaluation failed with {} error(s):", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    write!(f, "\n  {}. {}", i + 1, error)?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
