//! Programmer-error reporting
//!
//! Misuse of the engine (an empty failure, an empty combinator, reading the
//! value of a failed result) is a bug in the calling code, not a business
//! outcome. It is reported through [`UsageError`] so the caller fails fast
//! with `?` instead of the library panicking.

/// Misuse of the rule engine API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum UsageError {
    /// A failure was built from an empty error collection.
    #[error("a failed result must carry at least one error")]
    EmptyErrors,

    /// A rule error was built with an empty code.
    #[error("a rule error code must not be empty")]
    EmptyCode,

    /// A combinator was built without child rules.
    #[error("{combinator} combinator requires at least one rule")]
    EmptyComposition {
        /// Name of the combinator being built.
        combinator: &'static str,
    },

    /// An accessor was used on the wrong kind of outcome.
    #[error("cannot read {accessor} of a {outcome} result")]
    InvalidState {
        /// The accessor that was called.
        accessor: &'static str,
        /// The outcome the result actually holds.
        outcome: &'static str,
    },
}

impl UsageError {
    pub(crate) const fn invalid_state(accessor: &'static str, success: bool) -> Self {
        Self::InvalidState {
            accessor,
            outcome: if success { "successful" } else { "failed" },
        }
    }
}
