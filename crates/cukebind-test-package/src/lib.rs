//! Calculator step definitions for `cukebind`.
//!
//! The package registers three steps against a [`CalculatorContext`]:
//! `Given value N` stores `N`, `When I add N` adds `N`, and
//! `Then it equals N` fails the scenario unless the running result equals
//! `N`. The `test_package` binary builds the same registry at startup and
//! prints the package name.

pub mod config;
pub mod error;
pub mod logging;

use cukebind::{RegistrationError, ScenarioContext, StepError, StepRegistry, ensure_eq};

pub use error::AppError;

/// Pattern of the step that sets the starting value.
pub const GIVEN_VALUE: &str = r"^Given value (\d+)$";
/// Pattern of the step that adds to the result.
pub const WHEN_ADD: &str = r"^When I add (\d+)$";
/// Pattern of the step that checks the result.
pub const THEN_EQUALS: &str = r"^Then it equals (\d+)$";

/// Scenario state shared by the calculator steps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CalculatorContext {
    /// Running result.
    pub result: i32,
}

/// Register the calculator steps with `registry`.
///
/// # Errors
///
/// Returns [`RegistrationError`] if a pattern fails to compile.
///
/// # Examples
///
/// ```
/// use cukebind::{Scenario, ScenarioRunner, StepRegistry};
/// use cukebind_test_package::{CalculatorContext, register_calculator_steps};
///
/// let mut registry = StepRegistry::new();
/// register_calculator_steps(&mut registry).expect("patterns compile");
/// let outcome = ScenarioRunner::new(&registry)
///     .run(&Scenario::from_lines("sum", ["Given value 5", "When I add 3", "Then it equals 8"]));
/// assert!(outcome.passed());
/// assert_eq!(outcome.context().get::<CalculatorContext>().map(|c| c.result), Some(8));
/// ```
pub fn register_calculator_steps(registry: &mut StepRegistry) -> Result<(), RegistrationError> {
    registry
        .given(GIVEN_VALUE, |ctx: &mut ScenarioContext, (val,): (i32,)| {
            ctx.scope::<CalculatorContext>().result = val;
            Ok(())
        })?
        .when(WHEN_ADD, |ctx: &mut ScenarioContext, (val,): (i32,)| {
            let calculator = ctx.scope::<CalculatorContext>();
            calculator.result = calculator
                .result
                .checked_add(val)
                .ok_or_else(|| StepError::failed("result overflowed i32"))?;
            Ok(())
        })?
        .then(THEN_EQUALS, |ctx: &mut ScenarioContext, (val,): (i32,)| {
            ensure_eq(ctx.scope::<CalculatorContext>().result, val)
        })?;
    Ok(())
}

/// Build a registry holding only the calculator steps.
///
/// # Errors
///
/// Returns [`RegistrationError`] if a pattern fails to compile.
pub fn calculator_registry() -> Result<StepRegistry, RegistrationError> {
    let mut registry = StepRegistry::new();
    register_calculator_steps(&mut registry)?;
    Ok(registry)
}
