//! Execution of a single scenario step against a registry.
//!
//! [`execute_step`] looks the step up, converts its captures and runs the
//! handler, folding every failure mode into an [`ExecutionError`] that the
//! scenario runner records.

mod error;

use crate::context::ScenarioContext;
use crate::registry::{InvokeError, StepRegistry};
use crate::StepKeyword;

pub use error::ExecutionError;

/// Groups step identification for execution.
#[derive(Debug, Clone, Copy)]
pub struct StepExecutionRequest<'a> {
    /// Zero-based step index for error messages.
    pub index: usize,
    /// Resolved keyword. When `None`, the keyword is read from the leading
    /// word of `text`.
    pub keyword: Option<StepKeyword>,
    /// The full step line matched against patterns.
    pub text: &'a str,
}

impl<'a> StepExecutionRequest<'a> {
    /// Build a request that takes its keyword from the step text.
    #[must_use]
    pub fn from_line(index: usize, text: &'a str) -> Self {
        Self {
            index,
            keyword: None,
            text,
        }
    }
}

/// Execute a single step.
///
/// 1. Look up the step in the registry.
/// 2. Convert the captured groups to the handler's arguments.
/// 3. Run the handler against `ctx`.
///
/// # Errors
///
/// - [`ExecutionError::StepNotFound`] when no definition matches.
/// - [`ExecutionError::ParameterConversion`] when a capture cannot be
///   converted.
/// - [`ExecutionError::HandlerFailed`] when the handler fails or panics.
///
/// # Examples
///
/// ```
/// use cukebind::execution::{ExecutionError, StepExecutionRequest, execute_step};
/// use cukebind::{ScenarioContext, StepRegistry};
///
/// let registry = StepRegistry::new();
/// let mut ctx = ScenarioContext::new();
/// let request = StepExecutionRequest::from_line(0, "Given undefined step");
/// assert!(matches!(
///     execute_step(&registry, &request, &mut ctx),
///     Err(ExecutionError::StepNotFound { .. })
/// ));
/// ```
pub fn execute_step(
    registry: &StepRegistry,
    request: &StepExecutionRequest<'_>,
    ctx: &mut ScenarioContext,
) -> Result<(), ExecutionError> {
    let keyword = request.keyword.or_else(|| {
        StepKeyword::split_line(request.text).map(|(keyword, _)| keyword.resolve(&mut None))
    });
    let text = request.text.trim();
    let not_found = || ExecutionError::StepNotFound {
        index: request.index,
        keyword,
        text: text.to_string(),
    };
    let step = keyword
        .and_then(|keyword| {
            registry.find(keyword, &StepKeyword::normalise_line(text, keyword))
        })
        .ok_or_else(not_found)?;
    let pattern = || step.definition().pattern().as_str().to_string();
    step.invoke(ctx).map_err(|err| match err {
        InvokeError::Arguments(source) => ExecutionError::ParameterConversion {
            index: request.index,
            text: text.to_string(),
            pattern: pattern(),
            source,
        },
        InvokeError::Step(error) => ExecutionError::HandlerFailed {
            index: request.index,
            text: text.to_string(),
            pattern: pattern(),
            error,
        },
    })
}

#[cfg(test)]
mod tests;
