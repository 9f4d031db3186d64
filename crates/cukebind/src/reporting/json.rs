//! JSON rendering of a scenario report.
//!
//! The document carries pass and fail totals followed by one object per
//! scenario. A failed scenario adds a `failure` object naming the step, the
//! failure kind and the number of skipped steps. Labels are lowercase.

use std::io::Write;

use serde::Serialize;

use super::ScenarioRecord;

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: usize,
    failed: usize,
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    feature_path: &'a str,
    scenario_name: &'a str,
    status: &'static str,
    line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure: Option<JsonFailure<'a>>,
}

#[derive(Serialize)]
struct JsonFailure<'a> {
    step_index: usize,
    step_text: &'a str,
    kind: &'static str,
    message: &'a str,
    skipped_steps: usize,
}

impl<'a> From<&'a [ScenarioRecord]> for JsonReport<'a> {
    fn from(records: &'a [ScenarioRecord]) -> Self {
        let scenarios: Vec<JsonScenario<'a>> = records.iter().map(Into::into).collect();
        let failed = scenarios.iter().filter(|s| s.failure.is_some()).count();
        Self {
            passed: scenarios.len().saturating_sub(failed),
            failed,
            scenarios,
        }
    }
}

impl<'a> From<&'a ScenarioRecord> for JsonScenario<'a> {
    fn from(record: &'a ScenarioRecord) -> Self {
        let failure = record.status().failure().map(|failed| JsonFailure {
            step_index: failed.step_index(),
            step_text: failed.step_text(),
            kind: failed.kind().label(),
            message: failed.message(),
            skipped_steps: failed.skipped_steps(),
        });
        Self {
            feature_path: record.feature_path(),
            scenario_name: record.scenario_name(),
            status: record.status().label(),
            line: record.line(),
            failure,
        }
    }
}

/// Write the report for `records` to `writer`.
///
/// # Examples
/// ```
/// use cukebind::reporting::{json, ScenarioRecord, ScenarioStatus};
///
/// let records = [ScenarioRecord::new("calc.feature", "adding", 3, ScenarioStatus::Passed)];
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &records)?;
/// assert!(buffer.starts_with(br#"{"passed":1,"failed":0,"#));
/// # Ok::<(), serde_json::Error>(())
/// ```
///
/// # Errors
/// Returns an error when `writer` fails.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(records))
}

/// Render the report for `records` as a string.
///
/// # Errors
/// Returns an error when serialisation fails.
pub fn to_string(records: &[ScenarioRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(records))
}
