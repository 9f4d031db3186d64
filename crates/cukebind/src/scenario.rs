//! Scenario model and runner.
//!
//! A [`Scenario`] is an ordered list of step lines. Running one moves it
//! through [`ScenarioPhase::NotStarted`], [`ScenarioPhase::Running`] and
//! [`ScenarioPhase::Finished`]: a fresh [`ScenarioContext`] is created when
//! the first step runs, steps execute in document order, and the first
//! failure finishes the scenario with the remaining steps skipped.

use std::any::Any;
use std::num::NonZeroUsize;
use std::thread;

use crate::context::ScenarioContext;
use crate::execution::{ExecutionError, StepExecutionRequest, execute_step};
use crate::keyword::StepKeyword;
use crate::panic::panic_message;
use crate::registry::StepRegistry;
use crate::reporting::{FailedScenario, FailureKind, Report, ScenarioRecord, ScenarioStatus};

/// One step line of a scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioStep {
    keyword: Option<StepKeyword>,
    text: String,
    line: u32,
}

impl ScenarioStep {
    /// Create a step with an already resolved keyword.
    #[must_use]
    pub fn new(keyword: Option<StepKeyword>, text: impl Into<String>, line: u32) -> Self {
        Self {
            keyword,
            text: text.into(),
            line,
        }
    }

    /// Resolved primary keyword, or `None` when the text has no keyword.
    #[must_use]
    pub fn keyword(&self) -> Option<StepKeyword> {
        self.keyword
    }

    /// Full step text, keyword included.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Line in the source document, or `0` when unknown.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// A named, ordered list of steps.
///
/// # Examples
///
/// ```
/// use cukebind::{Scenario, StepKeyword};
///
/// let scenario = Scenario::from_lines("adding", ["Given value 5", "And value 6", "Then it equals 6"]);
/// let keywords: Vec<_> = scenario.steps().iter().map(|s| s.keyword()).collect();
/// assert_eq!(
///     keywords,
///     [Some(StepKeyword::Given), Some(StepKeyword::Given), Some(StepKeyword::Then)]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    feature_path: String,
    line: u32,
    steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Create an empty scenario.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Build a scenario from raw step lines.
    ///
    /// Each line's keyword is read from its first word; `And`/`But` take the
    /// keyword of the preceding primary step.
    #[must_use]
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut previous = None;
        let steps = lines
            .into_iter()
            .map(|line| {
                let line = line.as_ref().trim();
                let keyword = StepKeyword::split_line(line)
                    .map(|(keyword, _)| keyword.resolve(&mut previous));
                ScenarioStep::new(keyword, line, 0)
            })
            .collect();
        Self {
            steps,
            ..Self::new(name)
        }
    }

    /// Set the label of the feature this scenario belongs to.
    #[must_use]
    pub fn with_feature_path(mut self, feature_path: impl Into<String>) -> Self {
        self.feature_path = feature_path.into();
        self
    }

    /// Set the declaration line.
    #[must_use]
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Append a step.
    pub fn push_step(&mut self, step: ScenarioStep) {
        self.steps.push(step);
    }

    /// Scenario name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label of the owning feature; empty for ad-hoc scenarios.
    #[must_use]
    pub fn feature_path(&self) -> &str {
        &self.feature_path
    }

    /// Declaration line, or `0` when unknown.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Steps in document order.
    #[must_use]
    pub fn steps(&self) -> &[ScenarioStep] {
        &self.steps
    }
}

/// Lifecycle of a scenario execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioPhase {
    /// No step has run and no context exists yet.
    NotStarted,
    /// Steps are executing against the scenario's context.
    Running,
    /// Every step ran, or one failed and the rest were skipped.
    Finished,
}

/// Step-by-step execution of one scenario.
///
/// Most callers use [`ScenarioRunner::run`]; this type lets a caller drive
/// the steps one at a time and inspect the context in between.
#[derive(Debug)]
pub struct ScenarioExecution<'a> {
    registry: &'a StepRegistry,
    scenario: &'a Scenario,
    phase: ScenarioPhase,
    context: ScenarioContext,
    next_step: usize,
    failure: Option<ExecutionError>,
}

impl<'a> ScenarioExecution<'a> {
    /// Prepare `scenario` for execution against `registry`.
    #[must_use]
    pub fn new(registry: &'a StepRegistry, scenario: &'a Scenario) -> Self {
        Self {
            registry,
            scenario,
            phase: ScenarioPhase::NotStarted,
            context: ScenarioContext::new(),
            next_step: 0,
            failure: None,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> ScenarioPhase {
        self.phase
    }

    /// The scenario's context as left by the steps run so far.
    #[must_use]
    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Run the next step.
    ///
    /// Returns `None` once the scenario has finished. A failing step
    /// finishes the scenario immediately.
    pub fn step(&mut self) -> Option<Result<(), ExecutionError>> {
        match self.phase {
            ScenarioPhase::Finished => return None,
            ScenarioPhase::NotStarted => {
                log::debug!("scenario '{}' started", self.scenario.name);
                self.context = ScenarioContext::new();
                self.phase = ScenarioPhase::Running;
            }
            ScenarioPhase::Running => {}
        }
        let Some(step) = self.scenario.steps.get(self.next_step) else {
            self.phase = ScenarioPhase::Finished;
            return None;
        };
        let request = StepExecutionRequest {
            index: self.next_step,
            keyword: step.keyword,
            text: &step.text,
        };
        let result = execute_step(self.registry, &request, &mut self.context);
        self.next_step += 1;
        if let Err(err) = &result {
            self.failure = Some(err.clone());
            self.phase = ScenarioPhase::Finished;
        } else if self.next_step == self.scenario.steps.len() {
            self.phase = ScenarioPhase::Finished;
        }
        Some(result)
    }

    /// Run any remaining steps and record the outcome.
    #[must_use]
    pub fn finish(mut self) -> ScenarioOutcome {
        while self.step().is_some() {}
        let scenario = self.scenario;
        let status = match &self.failure {
            None => {
                log::info!("scenario '{}' passed", scenario.name);
                ScenarioStatus::Passed
            }
            Some(err) => {
                let skipped = scenario.steps.len().saturating_sub(err.index() + 1);
                log::warn!(
                    "scenario '{}' failed ({}): {err}; {skipped} step(s) skipped",
                    scenario.name,
                    err.kind()
                );
                ScenarioStatus::Failed(FailedScenario::new(
                    err.index(),
                    err.text(),
                    err.kind(),
                    err.to_string(),
                    skipped,
                ))
            }
        };
        ScenarioOutcome {
            record: ScenarioRecord::new(
                &scenario.feature_path,
                &scenario.name,
                scenario.line,
                status,
            ),
            context: self.context,
            error: self.failure,
        }
    }
}

/// Result of running one scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    record: ScenarioRecord,
    context: ScenarioContext,
    error: Option<ExecutionError>,
}

impl ScenarioOutcome {
    /// Return `true` when every step passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }

    /// The report record for this scenario.
    #[must_use]
    pub fn record(&self) -> &ScenarioRecord {
        &self.record
    }

    /// The failure that finished the scenario, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ExecutionError> {
        self.error.as_ref()
    }

    /// The scenario's context as the last step left it.
    #[must_use]
    pub fn context(&self) -> &ScenarioContext {
        &self.context
    }

    /// Consume the outcome, keeping the record.
    #[must_use]
    pub fn into_record(self) -> ScenarioRecord {
        self.record
    }

    /// Consume the outcome, keeping the context.
    #[must_use]
    pub fn into_context(self) -> ScenarioContext {
        self.context
    }
}

/// Runs scenarios against a populated registry.
///
/// # Examples
///
/// ```
/// use cukebind::{Scenario, ScenarioContext, ScenarioRunner, StepRegistry, ensure_eq};
///
/// let mut registry = StepRegistry::new();
/// registry
///     .given(r"^Given value (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
///         *ctx.scope::<i32>() = val;
///         Ok(())
///     })
///     .and_then(|r| {
///         r.then(r"^Then it equals (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
///             ensure_eq(*ctx.scope::<i32>(), val)
///         })
///     })
///     .expect("valid patterns");
///
/// let runner = ScenarioRunner::new(&registry);
/// let outcome = runner.run(&Scenario::from_lines("s", ["Given value 4", "Then it equals 4"]));
/// assert!(outcome.passed());
/// assert_eq!(outcome.context().get::<i32>(), Some(&4));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScenarioRunner<'r> {
    registry: &'r StepRegistry,
}

impl<'r> ScenarioRunner<'r> {
    /// Create a runner over `registry`.
    #[must_use]
    pub fn new(registry: &'r StepRegistry) -> Self {
        Self { registry }
    }

    /// Start a step-by-step execution of `scenario`.
    #[must_use]
    pub fn execution<'a>(&self, scenario: &'a Scenario) -> ScenarioExecution<'a>
    where
        'r: 'a,
    {
        ScenarioExecution::new(self.registry, scenario)
    }

    /// Run `scenario` to completion with a fresh context.
    #[must_use]
    pub fn run(&self, scenario: &Scenario) -> ScenarioOutcome {
        self.execution(scenario).finish()
    }

    /// Run scenarios one after another.
    ///
    /// When [`fail_fast`](crate::config::fail_fast) is enabled the run stops
    /// after the first failed scenario and later scenarios are not recorded.
    #[must_use]
    pub fn run_all<'s, I>(&self, scenarios: I) -> Report
    where
        I: IntoIterator<Item = &'s Scenario>,
    {
        let fail_fast = crate::config::fail_fast();
        let mut report = Report::new();
        for scenario in scenarios {
            let outcome = self.run(scenario);
            let passed = outcome.passed();
            report.record(outcome.into_record());
            if !passed && fail_fast {
                log::info!("fail-fast enabled; stopping after '{}'", scenario.name);
                break;
            }
        }
        report
    }

    /// Run scenarios on scoped worker threads.
    ///
    /// Scenarios run in batches no larger than the available parallelism,
    /// one thread per scenario in the batch. Every scenario gets its own
    /// context and records keep the input order. A scenario whose thread
    /// cannot be spawned runs on the calling thread instead.
    #[must_use]
    pub fn run_parallel(&self, scenarios: &[Scenario]) -> Report {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        scenarios
            .chunks(workers)
            .flat_map(|batch| self.run_batch(batch))
            .collect()
    }

    fn run_batch(&self, batch: &[Scenario]) -> Vec<ScenarioRecord> {
        thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|scenario| {
                    let spawned = thread::Builder::new()
                        .spawn_scoped(scope, move || self.run(scenario).into_record());
                    (scenario, spawned)
                })
                .collect();
            handles
                .into_iter()
                .map(|(scenario, spawned)| match spawned {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or_else(|payload| panicked_record(scenario, payload.as_ref())),
                    Err(err) => {
                        log::warn!(
                            "could not spawn a thread for scenario '{}': {err}; running inline",
                            scenario.name
                        );
                        self.run(scenario).into_record()
                    }
                })
                .collect()
        })
    }
}

fn panicked_record(scenario: &Scenario, payload: &(dyn Any + Send)) -> ScenarioRecord {
    let message = panic_message(payload);
    log::error!("scenario '{}' thread panicked: {message}", scenario.name);
    ScenarioRecord::new(
        &scenario.feature_path,
        &scenario.name,
        scenario.line,
        ScenarioStatus::Failed(FailedScenario::new(
            0,
            "",
            FailureKind::Error,
            message,
            scenario.steps.len(),
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ensure_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    #[expect(clippy::expect_used, reason = "fixture patterns are known to be valid")]
    fn registry() -> StepRegistry {
        let mut registry = StepRegistry::new();
        registry
            .given(r"^Given value (\d+)$", |ctx: &mut ScenarioContext, (val,): (i64,)| {
                *ctx.scope::<i64>() = val;
                Ok(())
            })
            .and_then(|r| {
                r.when(r"^When I add (\d+)$", |ctx: &mut ScenarioContext, (val,): (i64,)| {
                    *ctx.scope::<i64>() += val;
                    Ok(())
                })
            })
            .and_then(|r| {
                r.then(r"^Then it equals (\d+)$", |ctx: &mut ScenarioContext, (val,): (i64,)| {
                    ensure_eq(*ctx.scope::<i64>(), val)
                })
            })
            .expect("steps register");
        registry
    }

    #[test]
    fn from_lines_resolves_conjunctions() {
        let scenario = Scenario::from_lines(
            "s",
            ["When I add 1", "  And I add 2 ", "But I add 3", "Then it equals 6", "nothing"],
        );
        let keywords: Vec<_> = scenario.steps().iter().map(ScenarioStep::keyword).collect();
        assert_eq!(
            keywords,
            [
                Some(StepKeyword::When),
                Some(StepKeyword::When),
                Some(StepKeyword::When),
                Some(StepKeyword::Then),
                None
            ]
        );
        assert_eq!(scenario.steps().get(1).map(ScenarioStep::text), Some("And I add 2"));
    }

    #[rstest]
    fn execution_moves_through_phases(registry: StepRegistry) {
        let scenario = Scenario::from_lines("s", ["Given value 2", "When I add 3"]);
        let mut execution = ScenarioExecution::new(&registry, &scenario);
        assert_eq!(execution.phase(), ScenarioPhase::NotStarted);
        assert_eq!(execution.step(), Some(Ok(())));
        assert_eq!(execution.phase(), ScenarioPhase::Running);
        assert_eq!(execution.context().get::<i64>(), Some(&2));
        assert_eq!(execution.step(), Some(Ok(())));
        assert_eq!(execution.phase(), ScenarioPhase::Finished);
        assert_eq!(execution.step(), None);
        assert!(execution.finish().passed());
    }

    #[rstest]
    #[case(&["when I add 1", "Then it equals 1"])]
    #[case(&["GIVEN value 2", "and value 3", "when I add 1", "then it equals 4"])]
    fn keyword_case_does_not_affect_matching(registry: StepRegistry, #[case] lines: &[&str]) {
        let outcome = ScenarioRunner::new(&registry).run(&Scenario::from_lines("s", lines));
        assert!(outcome.passed(), "{:?}", outcome.error());
    }

    #[rstest]
    fn empty_scenario_passes(registry: StepRegistry) {
        let scenario = Scenario::new("empty");
        let mut execution = ScenarioExecution::new(&registry, &scenario);
        assert_eq!(execution.step(), None);
        assert_eq!(execution.phase(), ScenarioPhase::Finished);
        assert!(execution.finish().passed());
    }

    #[rstest]
    fn failure_skips_remaining_steps(registry: StepRegistry) {
        let scenario = Scenario::from_lines(
            "s",
            ["Given value 1", "Then it equals 2", "When I add 1", "Then it equals 2"],
        );
        let outcome = ScenarioRunner::new(&registry).run(&scenario);
        assert!(!outcome.passed());
        let Some(failure) = outcome.record().status().failure() else {
            panic!("scenario should fail");
        };
        assert_eq!(failure.step_index(), 1);
        assert_eq!(failure.kind(), FailureKind::Assertion);
        assert_eq!(failure.skipped_steps(), 2);
        assert_eq!(outcome.context().get::<i64>(), Some(&1));
    }

    #[rstest]
    fn runs_keep_contexts_apart(registry: StepRegistry) {
        let runner = ScenarioRunner::new(&registry);
        let first = runner.run(&Scenario::from_lines("a", ["Given value 7"]));
        let second = runner.run(&Scenario::from_lines("b", ["When I add 1", "Then it equals 1"]));
        assert_eq!(first.context().get::<i64>(), Some(&7));
        assert!(second.passed());
    }

    #[rstest]
    fn parallel_runs_keep_input_order(registry: StepRegistry) {
        let scenarios: Vec<_> = (0..8_i64)
            .map(|n| {
                Scenario::from_lines(
                    format!("s{n}"),
                    [
                        format!("Given value {n}"),
                        "When I add 1".to_string(),
                        format!("Then it equals {}", if n == 3 { 0 } else { n + 1 }),
                    ],
                )
            })
            .collect();
        let report = ScenarioRunner::new(&registry).run_parallel(&scenarios);
        let names: Vec<_> = report
            .records()
            .iter()
            .map(ScenarioRecord::scenario_name)
            .collect();
        assert_eq!(names, ["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"]);
        assert_eq!((report.passed(), report.failed()), (7, 1));
    }

    #[rstest]
    fn parallel_runs_span_several_batches(registry: StepRegistry) {
        let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
        let count = workers * 3 + 1;
        let scenarios: Vec<_> = (0..count)
            .map(|n| {
                Scenario::from_lines(
                    format!("s{n}"),
                    [format!("Given value {n}"), format!("Then it equals {n}")],
                )
            })
            .collect();
        let report = ScenarioRunner::new(&registry).run_parallel(&scenarios);
        assert_eq!(report.passed(), count);
        let expected: Vec<_> = (0..count).map(|n| format!("s{n}")).collect();
        let names: Vec<_> = report
            .records()
            .iter()
            .map(|record| record.scenario_name().to_owned())
            .collect();
        assert_eq!(names, expected);
    }
}
