//! Error types for step execution failures.

use thiserror::Error;

use crate::reporting::FailureKind;
use crate::step_args::StepArgsError;
use crate::{StepError, StepKeyword};

/// Error type for step execution failures.
///
/// Each variant records the zero-based index and text of the step that
/// failed, so reports can point at the exact line of the scenario.
///
/// # Examples
///
/// ```
/// use cukebind::execution::ExecutionError;
/// use cukebind::reporting::FailureKind;
///
/// let error = ExecutionError::StepNotFound {
///     index: 0,
///     keyword: None,
///     text: "Given value abc".into(),
/// };
/// assert_eq!(error.kind(), FailureKind::Undefined);
/// assert_eq!(error.index(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ExecutionError {
    /// No registered definition matches the step.
    #[error("undefined step {index}: '{text}' matches no step definition")]
    StepNotFound {
        /// Zero-based step index.
        index: usize,
        /// Resolved keyword, or `None` when the text carried no keyword.
        keyword: Option<StepKeyword>,
        /// The step text.
        text: String,
    },
    /// A captured group could not be converted to the handler's argument.
    #[error("step {index} '{text}' matched '{pattern}' but {source}")]
    ParameterConversion {
        /// Zero-based step index.
        index: usize,
        /// The step text.
        text: String,
        /// Pattern of the matched definition.
        pattern: String,
        /// Conversion failure.
        #[source]
        source: StepArgsError,
    },
    /// The handler reported a failure or panicked.
    #[error("step {index} '{text}' failed: {error}")]
    HandlerFailed {
        /// Zero-based step index.
        index: usize,
        /// The step text.
        text: String,
        /// Pattern of the matched definition.
        pattern: String,
        /// The error returned by the handler.
        #[source]
        error: StepError,
    },
}

impl ExecutionError {
    /// Classify the failure for reports.
    ///
    /// Handler panics count as assertion failures since `assert!` and
    /// friends report through panics.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::StepNotFound { .. } => FailureKind::Undefined,
            Self::ParameterConversion { .. } => FailureKind::ParameterConversion,
            Self::HandlerFailed {
                error: StepError::Assertion { .. } | StepError::Panic(_),
                ..
            } => FailureKind::Assertion,
            Self::HandlerFailed { .. } => FailureKind::Error,
        }
    }

    /// Zero-based index of the failing step.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::StepNotFound { index, .. }
            | Self::ParameterConversion { index, .. }
            | Self::HandlerFailed { index, .. } => *index,
        }
    }

    /// Text of the failing step.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::StepNotFound { text, .. }
            | Self::ParameterConversion { text, .. }
            | Self::HandlerFailed { text, .. } => text,
        }
    }
}
