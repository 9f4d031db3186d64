//! Core library for `cukebind`.
//!
//! Step definitions bind a regular expression to a handler. Handlers receive
//! the scenario's [`ScenarioContext`] and the pattern's capture groups
//! converted to typed arguments. A [`StepRegistry`] is populated explicitly
//! before any scenario runs; a [`ScenarioRunner`] then executes
//! [`Scenario`]s, built from raw step lines or from Gherkin text via
//! [`parse_feature`], and records their outcomes in a [`Report`].
//!
//! ```
//! use cukebind::{Scenario, ScenarioContext, ScenarioRunner, StepRegistry, ensure_eq};
//!
//! #[derive(Default)]
//! struct Calculator {
//!     result: i32,
//! }
//!
//! let mut registry = StepRegistry::new();
//! registry
//!     .given(r"^Given value (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
//!         ctx.scope::<Calculator>().result = val;
//!         Ok(())
//!     })?
//!     .when(r"^When I add (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
//!         ctx.scope::<Calculator>().result += val;
//!         Ok(())
//!     })?
//!     .then(r"^Then it equals (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
//!         ensure_eq(ctx.scope::<Calculator>().result, val)
//!     })?;
//!
//! let scenario = Scenario::from_lines("adding", ["Given value 5", "When I add 3", "Then it equals 8"]);
//! let outcome = ScenarioRunner::new(&registry).run(&scenario);
//! assert!(outcome.passed());
//! # Ok::<(), cukebind::RegistrationError>(())
//! ```

pub mod capture;
pub mod config;
mod context;
mod error;
pub mod execution;
mod feature;
mod keyword;
mod panic;
mod pattern;
mod registry;
pub mod reporting;
mod scenario;
pub mod step_args;

pub use context::ScenarioContext;
pub use error::{RegistrationError, StepError, StepResult, ensure_eq};
pub use feature::{FeatureError, parse_feature};
pub use keyword::{StepKeyword, StepKeywordParseError};
pub use panic::panic_message;
pub use pattern::{PatternError, StepPattern};
pub use registry::{InvokeError, StepDefinition, StepMatch, StepRegistry};
pub use reporting::{Report, ScenarioRecord, ScenarioStatus};
pub use scenario::{
    Scenario, ScenarioExecution, ScenarioOutcome, ScenarioPhase, ScenarioRunner, ScenarioStep,
};
