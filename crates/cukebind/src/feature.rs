//! Gherkin feature text to runnable scenarios.
//!
//! [`parse_feature`] flattens a feature into [`Scenario`] values: background
//! steps are prepended to every scenario they govern, scenarios nested in
//! `Rule` blocks are included, and each `Scenario Outline` expands once per
//! examples row with `<column>` placeholders replaced by the row's values.

use std::sync::LazyLock;

use gherkin::GherkinEnv;
use regex::Regex;
use thiserror::Error;

use crate::keyword::StepKeyword;
use crate::scenario::{Scenario, ScenarioStep};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([^>\s][^>]*)>").unwrap_or_else(|_| unreachable!("placeholder regex is valid"))
});

/// Error raised while turning feature text into scenarios.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FeatureError {
    /// The text is not valid Gherkin.
    #[error("failed to parse feature '{path}': {source}")]
    Parse {
        /// Label of the feature.
        path: String,
        /// Parser failure.
        #[source]
        source: gherkin::ParseError,
    },
    /// An outline has no examples table to expand.
    #[error("scenario outline '{scenario}' in '{path}' has no examples table")]
    MissingExamples {
        /// Label of the feature.
        path: String,
        /// Outline name.
        scenario: String,
    },
    /// A step refers to a column the examples table lacks.
    #[error(
        "placeholder '<{placeholder}>' in '{scenario}' is not an examples column; available columns: [{available}]"
    )]
    UnknownPlaceholder {
        /// Outline name.
        scenario: String,
        /// Placeholder without angle brackets.
        placeholder: String,
        /// Comma-separated header names.
        available: String,
    },
    /// An examples row has a different width from its header.
    #[error("examples row {row} of '{scenario}' has {actual} cell(s), expected {expected}")]
    RowWidth {
        /// Outline name.
        scenario: String,
        /// One-based row number, header excluded.
        row: usize,
        /// Header width.
        expected: usize,
        /// Cells in the row.
        actual: usize,
    },
}

/// Parse feature `text` into scenarios labelled with `path`.
///
/// # Errors
/// Returns [`FeatureError`] when the text is not valid Gherkin or an outline
/// cannot be expanded.
///
/// # Examples
///
/// ```
/// use cukebind::parse_feature;
///
/// let text = "\
/// Feature: Calculator
///   Background:
///     Given value 1
///
///   Scenario Outline: adding
///     When I add <n>
///     Then it equals <total>
///
///     Examples:
///       | n | total |
///       | 2 | 3     |
///       | 4 | 5     |
/// ";
/// let scenarios = parse_feature("calculator.feature", text).expect("valid feature");
/// assert_eq!(scenarios.len(), 2);
/// let texts: Vec<_> = scenarios[1].steps().iter().map(|s| s.text()).collect();
/// assert_eq!(texts, ["Given value 1", "When I add 4", "Then it equals 5"]);
/// ```
pub fn parse_feature(path: &str, text: &str) -> Result<Vec<Scenario>, FeatureError> {
    let mut text = text.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    let feature =
        gherkin::Feature::parse(&text, GherkinEnv::default()).map_err(|source| {
            FeatureError::Parse {
                path: path.to_string(),
                source,
            }
        })?;

    let background = background_steps(feature.background.as_ref())?;
    let mut scenarios = Vec::new();
    for scenario in &feature.scenarios {
        scenarios.extend(expand(path, &background, scenario)?);
    }
    for rule in &feature.rules {
        let mut rule_background = background.clone();
        rule_background.extend(background_steps(rule.background.as_ref())?);
        for scenario in &rule.scenarios {
            scenarios.extend(expand(path, &rule_background, scenario)?);
        }
    }
    log::debug!("parsed {} scenario(s) from '{path}'", scenarios.len());
    Ok(scenarios)
}

fn line_of(position: gherkin::LineCol) -> u32 {
    u32::try_from(position.line).unwrap_or(u32::MAX)
}

/// Convert one block of gherkin steps, resolving keywords in order.
///
/// Gherkin types every `*` bullet as `Given` and lets a following `And`
/// inherit that, so bullets and conjunctions are resolved here against the
/// preceding primary step instead. A bullet line is rewritten with its
/// resolved keyword.
fn convert_steps<'s, F>(
    steps: &'s [gherkin::Step],
    mut value_of: F,
) -> Result<Vec<ScenarioStep>, FeatureError>
where
    F: FnMut(&'s gherkin::Step) -> Result<String, FeatureError>,
{
    let mut previous = None;
    steps
        .iter()
        .map(|step| {
            let value = value_of(step)?;
            let word = step.keyword.trim();
            let bullet = word == "*";
            let conjunction =
                bullet || word.parse::<StepKeyword>().is_ok_and(|keyword| !keyword.is_primary());
            let keyword = if conjunction {
                StepKeyword::And
            } else {
                StepKeyword::from(step.ty)
            }
            .resolve(&mut previous);
            let text = if bullet {
                format!("{keyword} {value}")
            } else {
                format!("{word} {value}")
            };
            Ok(ScenarioStep::new(Some(keyword), text, line_of(step.position)))
        })
        .collect()
}

fn background_steps(
    background: Option<&gherkin::Background>,
) -> Result<Vec<ScenarioStep>, FeatureError> {
    background.map_or_else(
        || Ok(Vec::new()),
        |background| convert_steps(&background.steps, |step| Ok(step.value.clone())),
    )
}

fn is_outline(scenario: &gherkin::Scenario) -> bool {
    scenario.keyword.contains("Outline")
        || scenario.keyword.contains("Template")
        || !scenario.examples.is_empty()
}

fn expand(
    path: &str,
    background: &[ScenarioStep],
    scenario: &gherkin::Scenario,
) -> Result<Vec<Scenario>, FeatureError> {
    let build = |name: String, steps: Vec<ScenarioStep>| {
        let mut built = Scenario::new(name)
            .with_feature_path(path)
            .with_line(line_of(scenario.position));
        for step in background.iter().cloned().chain(steps) {
            built.push_step(step);
        }
        built
    };

    if !is_outline(scenario) {
        let steps = convert_steps(&scenario.steps, |step| Ok(step.value.clone()))?;
        return Ok(vec![build(scenario.name.clone(), steps)]);
    }

    let tables: Vec<_> = scenario
        .examples
        .iter()
        .filter_map(|examples| examples.table.as_ref())
        .collect();
    if tables.is_empty() {
        return Err(FeatureError::MissingExamples {
            path: path.to_string(),
            scenario: scenario.name.clone(),
        });
    }

    let mut expanded = Vec::new();
    let mut row_number = 0_usize;
    for table in tables {
        let Some((headers, rows)) = table.rows.split_first() else {
            continue;
        };
        for row in rows {
            row_number += 1;
            if row.len() != headers.len() {
                return Err(FeatureError::RowWidth {
                    scenario: scenario.name.clone(),
                    row: row_number,
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            let steps = convert_steps(&scenario.steps, |step| {
                substitute_placeholders(&scenario.name, &step.value, headers, row)
            })?;
            expanded.push(build(
                format!("{} (example {row_number})", scenario.name),
                steps,
            ));
        }
    }
    Ok(expanded)
}

/// Replace `<column>` tokens in `text` with the matching cells of `row`.
fn substitute_placeholders(
    scenario: &str,
    text: &str,
    headers: &[String],
    row: &[String],
) -> Result<String, FeatureError> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for cap in PLACEHOLDER_RE.captures_iter(text) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = headers
            .iter()
            .position(|header| header == name.as_str())
            .and_then(|idx| row.get(idx))
            .ok_or_else(|| FeatureError::UnknownPlaceholder {
                scenario: scenario.to_string(),
                placeholder: name.as_str().to_string(),
                available: headers.join(", "),
            })?;
        result.push_str(text.get(last..whole.start()).unwrap_or_default());
        result.push_str(value);
        last = whole.end();
    }
    result.push_str(text.get(last..).unwrap_or_default());
    Ok(result)
}
