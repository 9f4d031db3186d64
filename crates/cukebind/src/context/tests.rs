//! Tests for scenario-scoped values.

use super::*;
use rstest::{fixture, rstest};

#[derive(Debug, Default, PartialEq, Eq)]
struct Totals {
    result: i32,
}

#[derive(Debug, Default)]
struct Label(String);

#[fixture]
fn ctx() -> ScenarioContext {
    ScenarioContext::new()
}

#[rstest]
fn scope_creates_default_on_first_access(mut ctx: ScenarioContext) {
    assert!(ctx.is_empty());
    assert_eq!(ctx.scope::<Totals>().result, 0);
    assert!(ctx.contains::<Totals>());
    assert_eq!(ctx.len(), 1);
}

#[rstest]
fn scope_returns_same_instance_within_scenario(mut ctx: ScenarioContext) {
    ctx.scope::<Totals>().result = 5;
    ctx.scope::<Totals>().result += 3;
    assert_eq!(ctx.get::<Totals>(), Some(&Totals { result: 8 }));
    assert_eq!(ctx.len(), 1);
}

#[rstest]
fn values_are_keyed_by_type(mut ctx: ScenarioContext) {
    ctx.scope::<Totals>().result = 2;
    ctx.scope::<Label>().0.push_str("sum");
    assert_eq!(ctx.len(), 2);
    assert_eq!(ctx.get::<Label>().map(|label| label.0.as_str()), Some("sum"));
    assert_eq!(ctx.get::<Totals>().map(|t| t.result), Some(2));
}

#[rstest]
fn get_does_not_construct(ctx: ScenarioContext) {
    assert!(ctx.get::<Totals>().is_none());
    assert!(!ctx.contains::<Totals>());
}

#[rstest]
fn insert_and_take_round_out_the_slot(mut ctx: ScenarioContext) {
    assert!(ctx.insert(Totals { result: 1 }).is_none());
    assert_eq!(ctx.insert(Totals { result: 4 }), Some(Totals { result: 1 }));
    if let Some(totals) = ctx.get_mut::<Totals>() {
        totals.result *= 2;
    }
    assert_eq!(ctx.take::<Totals>(), Some(Totals { result: 8 }));
    assert!(ctx.is_empty());
}

#[test]
fn fresh_contexts_do_not_share_values() {
    let mut first = ScenarioContext::new();
    first.scope::<Totals>().result = 42;
    let mut second = ScenarioContext::new();
    assert_eq!(second.scope::<Totals>().result, 0);
}

#[rstest]
fn debug_lists_type_names(mut ctx: ScenarioContext) {
    ctx.scope::<Totals>();
    let rendered = format!("{ctx:?}");
    assert!(rendered.contains("Totals"), "unexpected debug output: {rendered}");
}
