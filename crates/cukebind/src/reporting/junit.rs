//! `JUnit` XML rendering of a scenario report.
//!
//! Scenarios become `<testcase>` elements named after the scenario and
//! classed by feature label. A failed scenario gets one `<failure>` element
//! whose `type` is the failure kind and whose body names the failing step.

use std::fmt::{self, Write};

use super::{FailedScenario, ScenarioRecord, ScenarioStatus};

/// Render `records` as a single `<testsuite>` document.
///
/// # Examples
/// ```
/// use cukebind::reporting::{junit, ScenarioRecord, ScenarioStatus};
///
/// let records = [ScenarioRecord::new("calc.feature", "adding", 3, ScenarioStatus::Passed)];
/// let mut xml = String::new();
/// junit::write(&mut xml, &records)?;
/// assert!(xml.contains("<testcase name=\"adding\" classname=\"calc.feature\" />"));
/// # Ok::<(), std::fmt::Error>(())
/// ```
///
/// # Errors
/// Propagates failures of the underlying writer.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> fmt::Result {
    let failures = records
        .iter()
        .filter(|record| record.status().failure().is_some())
        .count();
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        writer,
        r#"<testsuite name="cukebind" tests="{}" failures="{failures}" skipped="0">"#,
        records.len()
    )?;
    records
        .iter()
        .try_for_each(|record| write_testcase(writer, record))?;
    writeln!(writer, "</testsuite>")
}

fn write_testcase<W: Write>(writer: &mut W, record: &ScenarioRecord) -> fmt::Result {
    writer.write_str(r#"  <testcase name=""#)?;
    write_escaped(writer, record.scenario_name())?;
    writer.write_str(r#"" classname=""#)?;
    write_escaped(writer, record.feature_path())?;
    match record.status() {
        ScenarioStatus::Passed => writeln!(writer, r#"" />"#),
        ScenarioStatus::Failed(failure) => {
            writeln!(writer, r#"">"#)?;
            write_failure(writer, failure)?;
            writeln!(writer, "  </testcase>")
        }
    }
}

fn write_failure<W: Write>(writer: &mut W, failure: &FailedScenario) -> fmt::Result {
    write!(writer, r#"    <failure type="{}" message=""#, failure.kind())?;
    write_escaped(writer, failure.message())?;
    write!(writer, r#"">step {}: "#, failure.step_index())?;
    write_escaped(writer, failure.step_text())?;
    writeln!(writer, "</failure>")
}

/// Escape markup and replace characters XML 1.0 cannot carry.
fn write_escaped<W: Write>(writer: &mut W, value: &str) -> fmt::Result {
    value.chars().try_for_each(|c| match c {
        '&' => writer.write_str("&amp;"),
        '<' => writer.write_str("&lt;"),
        '>' => writer.write_str("&gt;"),
        '"' => writer.write_str("&quot;"),
        '\'' => writer.write_str("&apos;"),
        c if is_xml_char(c) => writer.write_char(c),
        _ => writer.write_str("&#xFFFD;"),
    })
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}
