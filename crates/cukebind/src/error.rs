//! Errors raised by step handlers and by step registration.

use crate::StepKeyword;
use crate::pattern::PatternError;
use std::fmt;
use thiserror::Error;

/// Failure reported by a step handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StepError {
    /// An expectation on scenario state did not hold.
    #[error("assertion failed: expected {expected}, got {actual}")]
    Assertion {
        /// Rendered expected value.
        expected: String,
        /// Rendered actual value.
        actual: String,
    },
    /// The handler failed for a reason other than an assertion.
    #[error("{0}")]
    Failed(String),
    /// The handler panicked; the payload is rendered as text.
    #[error("panic in step handler: {0}")]
    Panic(String),
}

impl StepError {
    /// Build an assertion failure from the expected and actual values.
    #[must_use]
    pub fn assertion(expected: impl fmt::Debug, actual: impl fmt::Debug) -> Self {
        Self::Assertion {
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        }
    }

    /// Build a generic handler failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result returned by step handlers.
pub type StepResult = Result<(), StepError>;

/// Compare `actual` with `expected`, failing the step when they differ.
///
/// # Errors
/// Returns [`StepError::Assertion`] when the values are not equal.
///
/// # Examples
///
/// ```
/// use cukebind::{StepError, ensure_eq};
///
/// assert!(ensure_eq(8, 8).is_ok());
/// assert_eq!(
///     ensure_eq(8, 9),
///     Err(StepError::Assertion { expected: "9".into(), actual: "8".into() }),
/// );
/// ```
pub fn ensure_eq<T>(actual: T, expected: T) -> StepResult
where
    T: PartialEq + fmt::Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(StepError::assertion(expected, actual))
    }
}

/// Error raised while registering a step definition.
///
/// Registration happens before any scenario runs; callers treat these errors
/// as fatal to startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistrationError {
    /// The pattern is not a valid regular expression.
    #[error("invalid {keyword} step pattern at {location}: {source}")]
    InvalidPattern {
        /// Keyword the definition was registered under.
        keyword: StepKeyword,
        /// Registration site (`file:line`).
        location: String,
        /// Underlying compilation failure.
        #[source]
        source: PatternError,
    },
    /// `And`/`But` were used as a definition keyword.
    #[error("{keyword} at {location} cannot own step definitions; use Given, When or Then")]
    ConjunctionKeyword {
        /// The rejected keyword.
        keyword: StepKeyword,
        /// Registration site (`file:line`).
        location: String,
    },
    /// The handler's parameter count differs from the pattern's groups.
    #[error(
        "pattern '{pattern}' at {location} has {captures} capture group(s) but its handler takes {parameters}"
    )]
    ArityMismatch {
        /// Pattern text.
        pattern: String,
        /// Registration site (`file:line`).
        location: String,
        /// Capture groups in the pattern.
        captures: usize,
        /// Parameters declared by the handler.
        parameters: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        StepError::assertion(9, 8),
        "assertion failed: expected 9, got 8"
    )]
    #[case(StepError::failed("no calculator"), "no calculator")]
    #[case(
        StepError::Panic("boom".into()),
        "panic in step handler: boom"
    )]
    fn step_error_display_formats(#[case] err: StepError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn ensure_eq_renders_strings_with_quotes() {
        assert_eq!(
            ensure_eq("left", "right"),
            Err(StepError::Assertion {
                expected: "\"right\"".into(),
                actual: "\"left\"".into(),
            })
        );
    }

    #[test]
    fn arity_mismatch_names_both_counts() {
        let err = RegistrationError::ArityMismatch {
            pattern: r"^Given value (\d+)$".into(),
            location: "steps.rs:3".into(),
            captures: 1,
            parameters: 2,
        };
        assert_eq!(
            err.to_string(),
            r"pattern '^Given value (\d+)$' at steps.rs:3 has 1 capture group(s) but its handler takes 2"
        );
    }
}
