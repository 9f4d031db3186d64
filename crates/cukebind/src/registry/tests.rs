//! Unit tests for registration, matching, and invocation.

use super::*;
use crate::error::ensure_eq;
use rstest::{fixture, rstest};

#[derive(Debug, Default)]
struct Totals {
    result: i32,
}

#[fixture]
#[expect(clippy::expect_used, reason = "fixture patterns are known to be valid")]
fn calculator() -> StepRegistry {
    let mut registry = StepRegistry::new();
    registry
        .given(r"^Given value (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
            ctx.scope::<Totals>().result = val;
            Ok(())
        })
        .and_then(|r| {
            r.when(r"^When I add (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
                ctx.scope::<Totals>().result += val;
                Ok(())
            })
        })
        .and_then(|r| {
            r.then(r"^Then it equals (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
                ensure_eq(ctx.scope::<Totals>().result, val)
            })
        })
        .expect("calculator steps register");
    registry
}

#[rstest]
fn registers_in_order(calculator: StepRegistry) {
    let keywords: Vec<_> = calculator.iter().map(StepDefinition::keyword).collect();
    assert_eq!(
        keywords,
        [StepKeyword::Given, StepKeyword::When, StepKeyword::Then]
    );
    assert_eq!(calculator.len(), 3);
    assert!(!calculator.is_empty());
}

#[rstest]
fn find_is_limited_to_the_keyword(calculator: StepRegistry) {
    assert!(calculator.find(StepKeyword::Given, "Given value 5").is_some());
    assert!(calculator.find(StepKeyword::When, "Given value 5").is_none());
}

#[rstest]
fn match_line_takes_keyword_from_text(calculator: StepRegistry) {
    let Some(step) = calculator.match_line("When I add 3") else {
        panic!("step should match");
    };
    assert_eq!(step.definition().keyword(), StepKeyword::When);
    assert_eq!(step.captures(), ["3"]);
    assert!(calculator.match_line("Suppose I add 3").is_none());
}

#[rstest]
fn non_numeric_value_is_undefined_for_digit_patterns(calculator: StepRegistry) {
    assert!(calculator.match_line("Given value abc").is_none());
}

#[rstest]
fn invocation_mutates_scenario_context(calculator: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    for line in ["Given value 5", "When I add 3", "Then it equals 8"] {
        let Some(step) = calculator.match_line(line) else {
            panic!("{line} should match");
        };
        assert_eq!(step.invoke(&mut ctx), Ok(()));
    }
    assert_eq!(ctx.get::<Totals>().map(|t| t.result), Some(8));
}

#[rstest]
fn then_step_reports_assertion(calculator: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    ctx.scope::<Totals>().result = 8;
    let Some(step) = calculator.match_line("Then it equals 9") else {
        panic!("step should match");
    };
    assert_eq!(
        step.invoke(&mut ctx),
        Err(InvokeError::Step(StepError::Assertion {
            expected: "9".into(),
            actual: "8".into(),
        }))
    );
}

#[rstest]
fn overflowing_capture_is_a_conversion_error(calculator: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    let Some(step) = calculator.match_line("Given value 99999999999") else {
        panic!("digits should match");
    };
    assert!(matches!(
        step.invoke(&mut ctx),
        Err(InvokeError::Arguments(StepArgsError::Conversion { index: 0, .. }))
    ));
    assert!(ctx.is_empty(), "handler must not run when conversion fails");
}

#[test]
fn first_registered_wins_among_overlapping_patterns() {
    let mut registry = StepRegistry::new();
    let result = registry
        .given(r"^Given value (\d+)$", |ctx: &mut ScenarioContext, (_,): (i32,)| {
            ctx.scope::<Vec<&'static str>>().push("specific");
            Ok(())
        })
        .and_then(|r| {
            r.given(r"^Given (.*)$", |ctx: &mut ScenarioContext, (_,): (String,)| {
                ctx.scope::<Vec<&'static str>>().push("generic");
                Ok(())
            })
        });
    assert!(result.is_ok());

    for _ in 0..3 {
        let Some(step) = registry.match_line("Given value 1") else {
            panic!("step should match");
        };
        assert_eq!(step.definition().pattern().as_str(), r"^Given value (\d+)$");
    }
    let Some(step) = registry.match_line("Given something else") else {
        panic!("generic step should match");
    };
    assert_eq!(step.definition().pattern().as_str(), r"^Given (.*)$");
}

#[test]
fn malformed_pattern_is_rejected() {
    let mut registry = StepRegistry::new();
    let result = registry.given(r"^Given value (\d+$", |_: &mut ScenarioContext, (_,): (i32,)| {
        Ok(())
    });
    assert!(matches!(
        result,
        Err(RegistrationError::InvalidPattern {
            keyword: StepKeyword::Given,
            ..
        })
    ));
    assert!(registry.is_empty());
}

#[test]
fn conjunction_keywords_cannot_own_definitions() {
    let mut registry = StepRegistry::new();
    let result = registry.register(StepKeyword::And, "^And x$", |_: &mut ScenarioContext, (): ()| {
        Ok(())
    });
    assert!(matches!(
        result,
        Err(RegistrationError::ConjunctionKeyword {
            keyword: StepKeyword::And,
            ..
        })
    ));
}

#[test]
fn arity_must_match_capture_groups() {
    let mut registry = StepRegistry::new();
    let result = registry.when(
        r"^When I add (\d+)$",
        |_: &mut ScenarioContext, (_, _): (i32, i32)| Ok(()),
    );
    let Err(RegistrationError::ArityMismatch {
        captures,
        parameters,
        location,
        ..
    }) = result
    else {
        panic!("expected arity mismatch");
    };
    assert_eq!((captures, parameters), (1, 2));
    assert!(location.contains("tests.rs"), "location was {location}");
}

#[test]
fn raw_captures_accept_any_group_count() {
    let mut registry = StepRegistry::new();
    let result = registry.then(
        r"^Then (\w+) and (\w+)$",
        |_: &mut ScenarioContext, words: Vec<String>| ensure_eq(words.len(), 2),
    );
    assert!(result.is_ok());
    let mut ctx = ScenarioContext::new();
    let Some(step) = registry.match_line("Then this and that") else {
        panic!("step should match");
    };
    assert_eq!(step.invoke(&mut ctx), Ok(()));
}

#[test]
fn panicking_handler_is_caught() {
    let mut registry = StepRegistry::new();
    let result = registry.then(r"^Then it explodes$", |_: &mut ScenarioContext, (): ()| {
        assert_eq!(1, 2, "numbers differ");
        Ok(())
    });
    assert!(result.is_ok());
    let mut ctx = ScenarioContext::new();
    let Some(step) = registry.match_line("Then it explodes") else {
        panic!("step should match");
    };
    let Err(InvokeError::Step(StepError::Panic(message))) = step.invoke(&mut ctx) else {
        panic!("expected caught panic");
    };
    assert!(message.contains("numbers differ"), "message was {message}");
}

#[rstest]
fn usage_tracking_and_duplicates(mut calculator: StepRegistry) {
    let result = calculator.given(r"^Given value (\d+)$", |_: &mut ScenarioContext, (_,): (u8,)| {
        Ok(())
    });
    assert!(result.is_ok());

    assert_eq!(calculator.unused_steps().len(), 4);
    let _ = calculator.match_line("When I add 1");
    let unused: Vec<_> = calculator
        .unused_steps()
        .into_iter()
        .map(StepDefinition::keyword)
        .collect();
    assert_eq!(
        unused,
        [StepKeyword::Given, StepKeyword::Then, StepKeyword::Given]
    );

    let duplicates = calculator.duplicate_steps();
    assert_eq!(duplicates.len(), 1);
    let Some(group) = duplicates.first() else {
        panic!("expected one duplicate group");
    };
    assert_eq!(group.len(), 2);
}

#[cfg(feature = "diagnostics")]
#[rstest]
#[expect(clippy::expect_used, reason = "dump must serialise")]
fn dump_lists_every_definition(calculator: StepRegistry) {
    let _ = calculator.match_line("Then it equals 1");
    let json = calculator.dump().expect("registry serialises");
    let value: serde_json::Value = serde_json::from_str(&json).expect("dump is valid JSON");
    let steps = value
        .get("steps")
        .and_then(serde_json::Value::as_array)
        .expect("steps array");
    assert_eq!(steps.len(), 3);
    let field = |pointer: &str| value.pointer(pointer).cloned();
    assert_eq!(field("/steps/2/keyword"), Some(serde_json::json!("Then")));
    assert_eq!(field("/steps/2/used"), Some(serde_json::json!(true)));
    assert_eq!(field("/steps/0/used"), Some(serde_json::json!(false)));
    assert_eq!(
        field("/steps/0/pattern"),
        Some(serde_json::json!(r"^Given value (\d+)$"))
    );
    assert_eq!(field("/steps/0/duplicate"), Some(serde_json::json!(false)));
}
