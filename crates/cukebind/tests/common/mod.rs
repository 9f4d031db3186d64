//! Shared running-total steps for behavioural tests.

use cukebind::{RegistrationError, ScenarioContext, StepError, StepRegistry, ensure_eq};

/// Scenario state accumulated by the running-total steps.
#[derive(Debug, Default)]
pub struct RunningTotal {
    pub total: i32,
}

/// Register the running-total steps in declaration order.
pub fn running_total_registry() -> Result<StepRegistry, RegistrationError> {
    let mut registry = StepRegistry::new();
    registry
        .given(r"^Given value (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
            ctx.scope::<RunningTotal>().total = val;
            Ok(())
        })?
        .when(r"^When I add (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
            let total = &mut ctx.scope::<RunningTotal>().total;
            *total = total
                .checked_add(val)
                .ok_or_else(|| StepError::failed("running total overflowed"))?;
            Ok(())
        })?
        .then(r"^Then it equals (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
            ensure_eq(ctx.scope::<RunningTotal>().total, val)
        })?;
    Ok(registry)
}
