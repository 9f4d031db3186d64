//! Scenario outcome records and report writers.
//!
//! The runner produces one [`ScenarioRecord`] per executed scenario and
//! gathers them in a [`Report`]. Writers in [`json`] and [`junit`] render a
//! slice of records in formats CI systems understand.

/// JSON report writer for scenario outcomes.
#[cfg(feature = "diagnostics")]
pub mod json;
/// JUnit XML writer for scenario outcomes.
pub mod junit;

use std::fmt;

/// Classification of a scenario failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A step matched no definition.
    Undefined,
    /// A captured group could not be converted to its declared type.
    ParameterConversion,
    /// An expectation on scenario state did not hold.
    Assertion,
    /// The handler failed for any other reason.
    Error,
}

impl FailureKind {
    /// Lowercase label used in reports.
    ///
    /// # Examples
    /// ```
    /// use cukebind::reporting::FailureKind;
    ///
    /// assert_eq!(FailureKind::ParameterConversion.label(), "parameter-conversion");
    /// ```
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::ParameterConversion => "parameter-conversion",
            Self::Assertion => "assertion",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Details captured when a scenario fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedScenario {
    step_index: usize,
    step_text: String,
    kind: FailureKind,
    message: String,
    skipped_steps: usize,
}

impl FailedScenario {
    /// Create a failure record for the step at `step_index`.
    #[must_use]
    pub fn new(
        step_index: usize,
        step_text: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
        skipped_steps: usize,
    ) -> Self {
        Self {
            step_index,
            step_text: step_text.into(),
            kind,
            message: message.into(),
            skipped_steps,
        }
    }

    /// Zero-based index of the failing step.
    #[must_use]
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Text of the failing step.
    #[must_use]
    pub fn step_text(&self) -> &str {
        &self.step_text
    }

    /// Failure classification.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Rendered error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of steps after the failing one that did not run.
    #[must_use]
    pub fn skipped_steps(&self) -> usize {
        self.skipped_steps
    }
}

/// Status of a finished scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Every step ran without error.
    Passed,
    /// A step failed; later steps were skipped.
    Failed(FailedScenario),
}

impl ScenarioStatus {
    /// Retrieve the lowercase label for the stored status.
    ///
    /// # Examples
    /// ```
    /// use cukebind::reporting::ScenarioStatus;
    ///
    /// assert_eq!(ScenarioStatus::Passed.label(), "passed");
    /// ```
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
        }
    }

    /// Return `true` for [`ScenarioStatus::Passed`].
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Failure details, when the scenario failed.
    #[must_use]
    pub fn failure(&self) -> Option<&FailedScenario> {
        match self {
            Self::Passed => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

/// Outcome recorded for a single scenario execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioRecord {
    feature_path: String,
    scenario_name: String,
    line: u32,
    status: ScenarioStatus,
}

impl ScenarioRecord {
    /// Construct a new record for the provided scenario metadata.
    ///
    /// # Examples
    /// ```
    /// use cukebind::reporting::{ScenarioRecord, ScenarioStatus};
    ///
    /// let record = ScenarioRecord::new(
    ///     "features/calculator.feature",
    ///     "adding",
    ///     3,
    ///     ScenarioStatus::Passed,
    /// );
    /// assert_eq!(record.feature_path(), "features/calculator.feature");
    /// assert_eq!(record.scenario_name(), "adding");
    /// assert_eq!(record.line(), 3);
    /// assert!(record.status().is_passed());
    /// ```
    #[must_use]
    pub fn new(
        feature_path: impl Into<String>,
        scenario_name: impl Into<String>,
        line: u32,
        status: ScenarioStatus,
    ) -> Self {
        Self {
            feature_path: feature_path.into(),
            scenario_name: scenario_name.into(),
            line,
            status,
        }
    }

    /// Access the recorded feature path.
    #[must_use]
    pub fn feature_path(&self) -> &str {
        &self.feature_path
    }

    /// Access the recorded scenario name.
    #[must_use]
    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    /// Line where the scenario is declared, or `0` when unknown.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Access the stored status value.
    #[must_use]
    pub fn status(&self) -> &ScenarioStatus {
        &self.status
    }
}

/// Ordered collection of scenario records from one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    records: Vec<ScenarioRecord>,
}

impl Report {
    /// Construct an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn record(&mut self, record: ScenarioRecord) {
        self.records.push(record);
    }

    /// Records in execution order.
    #[must_use]
    pub fn records(&self) -> &[ScenarioRecord] {
        &self.records
    }

    /// Consume the report, returning its records.
    #[must_use]
    pub fn into_records(self) -> Vec<ScenarioRecord> {
        self.records
    }

    /// Number of passed scenarios.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.status.is_passed())
            .count()
    }

    /// Number of failed scenarios.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.records.len() - self.passed()
    }

    /// Return `true` when no scenario failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl FromIterator<ScenarioRecord> for Report {
    fn from_iter<I: IntoIterator<Item = ScenarioRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<ScenarioRecord> for Report {
    fn extend<I: IntoIterator<Item = ScenarioRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
