//! Unit tests for the execution module.

use rstest::{fixture, rstest};

use super::{ExecutionError, StepExecutionRequest, execute_step};
use crate::reporting::FailureKind;
use crate::step_args::StepArgsError;
use crate::{ScenarioContext, StepError, StepKeyword, StepRegistry, ensure_eq};

#[fixture]
#[expect(clippy::expect_used, reason = "fixture patterns are known to be valid")]
fn registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    registry
        .given(r"^Given count (\w+)$", |ctx: &mut ScenarioContext, (n,): (u32,)| {
            *ctx.scope::<u32>() = n;
            Ok(())
        })
        .and_then(|r| {
            r.then(r"^Then count is (\d+)$", |ctx: &mut ScenarioContext, (n,): (u32,)| {
                ensure_eq(*ctx.scope::<u32>(), n)
            })
        })
        .and_then(|r| {
            r.then(r"^Then nothing works$", |_: &mut ScenarioContext, (): ()| {
                Err(StepError::failed("unsupported"))
            })
        })
        .expect("steps register");
    registry
}

#[rstest]
fn executes_matching_step(registry: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    let request = StepExecutionRequest::from_line(0, "Given count 4");
    assert_eq!(execute_step(&registry, &request, &mut ctx), Ok(()));
    assert_eq!(ctx.get::<u32>(), Some(&4));
}

#[rstest]
fn explicit_keyword_overrides_text(registry: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    let request = StepExecutionRequest {
        index: 2,
        keyword: Some(StepKeyword::Then),
        text: "Given count 4",
    };
    let Err(error) = execute_step(&registry, &request, &mut ctx) else {
        panic!("Then definitions should not match a Given line");
    };
    assert_eq!(
        error,
        ExecutionError::StepNotFound {
            index: 2,
            keyword: Some(StepKeyword::Then),
            text: "Given count 4".into(),
        }
    );
    assert_eq!(error.kind(), FailureKind::Undefined);
}

#[rstest]
fn conjunction_lines_match_as_their_resolved_keyword(registry: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    let request = StepExecutionRequest {
        index: 1,
        keyword: Some(StepKeyword::Given),
        text: "And count 9",
    };
    assert_eq!(execute_step(&registry, &request, &mut ctx), Ok(()));
    let then = StepExecutionRequest {
        index: 2,
        keyword: Some(StepKeyword::Then),
        text: "But count is 8",
    };
    let Err(error) = execute_step(&registry, &then, &mut ctx) else {
        panic!("9 is not 8");
    };
    assert_eq!(error.text(), "But count is 8");
    assert_eq!(error.kind(), FailureKind::Assertion);
}

#[rstest]
fn text_without_keyword_is_undefined(registry: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    let request = StepExecutionRequest::from_line(0, "count 4");
    assert!(matches!(
        execute_step(&registry, &request, &mut ctx),
        Err(ExecutionError::StepNotFound { keyword: None, .. })
    ));
}

#[rstest]
fn conversion_failure_is_classified(registry: StepRegistry) {
    let mut ctx = ScenarioContext::new();
    let request = StepExecutionRequest::from_line(1, "Given count abc");
    let Err(error) = execute_step(&registry, &request, &mut ctx) else {
        panic!("non-numeric capture should fail");
    };
    assert_eq!(error.kind(), FailureKind::ParameterConversion);
    assert_eq!(error.index(), 1);
    assert_eq!(error.text(), "Given count abc");
    let ExecutionError::ParameterConversion {
        pattern, source, ..
    } = error
    else {
        panic!("expected parameter conversion");
    };
    assert_eq!(pattern, r"^Given count (\w+)$");
    assert!(matches!(source, StepArgsError::Conversion { value, .. } if value == "abc"));
}

#[rstest]
#[case("Then count is 5", FailureKind::Assertion)]
#[case("Then nothing works", FailureKind::Error)]
fn handler_failures_are_classified(
    registry: StepRegistry,
    #[case] line: &str,
    #[case] expected: FailureKind,
) {
    let mut ctx = ScenarioContext::new();
    let request = StepExecutionRequest::from_line(0, line);
    let Err(error) = execute_step(&registry, &request, &mut ctx) else {
        panic!("{line} should fail");
    };
    assert!(matches!(error, ExecutionError::HandlerFailed { .. }));
    assert_eq!(error.kind(), expected);
}

#[test]
fn error_messages_name_the_step() {
    let error = ExecutionError::HandlerFailed {
        index: 2,
        text: "Then it equals 9".into(),
        pattern: r"^Then it equals (\d+)$".into(),
        error: StepError::assertion(9, 8),
    };
    assert_eq!(
        error.to_string(),
        "step 2 'Then it equals 9' failed: assertion failed: expected 9, got 8"
    );
    let missing = ExecutionError::StepNotFound {
        index: 0,
        keyword: Some(StepKeyword::Given),
        text: "Given value abc".into(),
    };
    assert_eq!(
        missing.to_string(),
        "undefined step 0: 'Given value abc' matches no step definition"
    );
}
