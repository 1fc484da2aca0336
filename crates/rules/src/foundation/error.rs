//! Error values produced by failing rules
//!
//! A [`RuleError`] describes exactly one business-rule violation. It is the
//! unit carried inside a failed [`RuleResult`](crate::foundation::RuleResult)
//! and the value handed to presentation boundaries (problem responses, logs).
//!
//! All string fields use `Cow<'static, str>` so that the common case of
//! static codes and descriptions never allocates.
//!
//! # Identity
//!
//! Two errors are equal when their `code` matches, regardless of description
//! or kind. The code is the stable identifier; the description is prose.
//!
//! ```rust,ignore
//! use nebula_rules::foundation::RuleError;
//!
//! let a = RuleError::validation("user.name.empty", "Name is required");
//! let b = RuleError::validation("user.name.empty", "Please enter a name");
//! assert_eq!(a, b);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::UsageError;

// ============================================================================
// ERROR KIND
// ============================================================================

/// Category of a rule error.
///
/// The engine never interprets the kind; consumers at a presentation boundary
/// use it to pick a status or severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[non_exhaustive]
pub enum ErrorKind {
    /// Generic business failure (default).
    #[default]
    Failure,
    /// Something that should not have happened.
    Unexpected,
    /// Input did not satisfy a validation rule.
    Validation,
    /// The operation conflicts with existing state.
    Conflict,
    /// A referenced entity does not exist.
    NotFound,
    /// The caller is not authenticated.
    Unauthorized,
    /// The caller is authenticated but not allowed.
    Forbidden,
}

impl ErrorKind {
    /// Returns a stable snake_case label for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Unexpected => "unexpected",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RULE ERROR
// ============================================================================

/// A single business-rule violation.
///
/// Immutable once built: fields are private and exposed through accessors.
/// Cloning is cheap for static strings.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRuleError"))]
pub struct RuleError {
    /// Stable identifier, e.g. `"order.total.negative"`.
    code: Cow<'static, str>,
    /// Human-readable message.
    description: Cow<'static, str>,
    /// Error category.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    kind: ErrorKind,
}

impl RuleError {
    /// Creates an error with an explicit kind.
    ///
    /// `code` must not be empty; debug builds assert it. Use
    /// [`try_new`](Self::try_new) when the code comes from outside the program.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use nebula_rules::foundation::{ErrorKind, RuleError};
    ///
    /// let error = RuleError::new("stock.low", "Not enough stock", ErrorKind::Conflict);
    /// assert_eq!(error.kind(), ErrorKind::Conflict);
    /// ```
    pub fn new(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        kind: ErrorKind,
    ) -> Self {
        let code = code.into();
        debug_assert!(!code.is_empty(), "rule error code must not be empty");
        Self {
            code,
            description: description.into(),
            kind,
        }
    }

    /// Creates an error with an explicit kind, rejecting an empty code.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::EmptyCode`] if `code` is empty.
    pub fn try_new(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
        kind: ErrorKind,
    ) -> Result<Self, UsageError> {
        let code = code.into();
        if code.is_empty() {
            return Err(UsageError::EmptyCode);
        }
        Ok(Self {
            code,
            description: description.into(),
            kind,
        })
    }

    /// Creates a [`ErrorKind::Failure`] error.
    pub fn failure(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, description, ErrorKind::Failure)
    }

    /// Creates an [`ErrorKind::Unexpected`] error.
    pub fn unexpected(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, description, ErrorKind::Unexpected)
    }

    /// Creates an [`ErrorKind::Validation`] error.
    pub fn validation(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, description, ErrorKind::Validation)
    }

    /// Creates an [`ErrorKind::Conflict`] error.
    pub fn conflict(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, description, ErrorKind::Conflict)
    }

    /// Creates an [`ErrorKind::NotFound`] error.
    pub fn not_found(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, description, ErrorKind::NotFound)
    }

    /// Creates an [`ErrorKind::Unauthorized`] error.
    pub fn unauthorized(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, description, ErrorKind::Unauthorized)
    }

    /// Creates an [`ErrorKind::Forbidden`] error.
    pub fn forbidden(
        code: impl Into<Cow<'static, str>>,
        description: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::new(code, description, ErrorKind::Forbidden)
    }

    /// Returns a copy with a different description. The code is kept.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Stable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRuleError {
    code: Cow<'static, str>,
    description: Cow<'static, str>,
    #[serde(rename = "type")]
    kind: ErrorKind,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRuleError> for RuleError {
    type Error = UsageError;

    fn try_from(raw: RawRuleError) -> Result<Self, Self::Error> {
        Self::try_new(raw.code, raw.description, raw.kind)
    }
}

impl PartialEq for RuleError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for RuleError {}

impl Hash for RuleError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

impl std::error::Error for RuleError {}

// ============================================================================
// TESTS
// ============================================================================
