//! Scenario-scoped state shared by step handlers.
//!
//! [`ScenarioContext`] stores at most one value per type. A handler asks for
//! the type it needs through [`ScenarioContext::scope`]; the first request in
//! a scenario constructs the value with [`Default`] and later requests return
//! the same instance. The runner creates a fresh context for every scenario,
//! so values never leak between scenarios.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;

/// Type-indexed store of per-scenario values.
///
/// # Examples
///
/// ```
/// use cukebind::ScenarioContext;
///
/// #[derive(Default)]
/// struct Totals {
///     result: i32,
/// }
///
/// let mut ctx = ScenarioContext::new();
/// assert!(ctx.get::<Totals>().is_none());
///
/// ctx.scope::<Totals>().result = 5;
/// ctx.scope::<Totals>().result += 3;
/// assert_eq!(ctx.get::<Totals>().map(|t| t.result), Some(8));
/// ```
#[derive(Default)]
pub struct ScenarioContext {
    values: HashMap<TypeId, Scoped>,
}

struct Scoped {
    name: &'static str,
    value: Box<dyn Any + Send>,
}

impl ScenarioContext {
    /// Construct an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the scenario's `T`, constructing it on first access.
    pub fn scope<T>(&mut self) -> &mut T
    where
        T: Any + Send + Default,
    {
        let scoped = self.values.entry(TypeId::of::<T>()).or_insert_with(|| {
            log::trace!("creating scenario value {}", type_name::<T>());
            Scoped {
                name: type_name::<T>(),
                value: Box::new(T::default()),
            }
        });
        scoped.value.downcast_mut::<T>().map_or_else(
            || unreachable!("scenario values are keyed by their TypeId"),
            |value| value,
        )
    }

    /// Borrow the scenario's `T` without constructing it.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|scoped| scoped.value.downcast_ref::<T>())
    }

    /// Mutably borrow the scenario's `T` without constructing it.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.values
            .get_mut(&TypeId::of::<T>())
            .and_then(|scoped| scoped.value.downcast_mut::<T>())
    }

    /// Replace the scenario's `T`, returning the previous value when present.
    pub fn insert<T: Any + Send>(&mut self, value: T) -> Option<T> {
        let previous = self.values.insert(
            TypeId::of::<T>(),
            Scoped {
                name: type_name::<T>(),
                value: Box::new(value),
            },
        )?;
        previous.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Remove and return the scenario's `T`.
    pub fn take<T: Any>(&mut self) -> Option<T> {
        let scoped = self.values.remove(&TypeId::of::<T>())?;
        scoped.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Return `true` when a `T` has been created in this scenario.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Number of distinct values created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Return `true` when no handler has touched the context yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.values.values().map(|scoped| scoped.name).collect();
        names.sort_unstable();
        f.debug_struct("ScenarioContext")
            .field("values", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests;
