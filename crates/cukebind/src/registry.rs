//! Step registration and lookup.
//!
//! A [`StepRegistry`] is populated explicitly before any scenario runs and is
//! read-only afterwards. Definitions keep their registration order: when more
//! than one pattern of the same keyword matches a step, the first registered
//! definition wins, so matching is deterministic across runs.

use crate::context::ScenarioContext;
use crate::error::{RegistrationError, StepError, StepResult};
use crate::keyword::StepKeyword;
use crate::panic::panic_message;
use crate::pattern::StepPattern;
use crate::step_args::{StepArgs, StepArgsError};
use hashbrown::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, Location, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

#[cfg(feature = "diagnostics")]
mod diagnostics;

type ErasedHandler =
    Box<dyn Fn(&mut ScenarioContext, &[String]) -> Result<(), InvokeError> + Send + Sync>;

/// Failure raised while invoking a matched definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InvokeError {
    /// Captured text could not become the handler's declared arguments.
    #[error(transparent)]
    Arguments(StepArgsError),
    /// The handler reported a failure or panicked.
    #[error(transparent)]
    Step(StepError),
}

/// A single step definition registered with a [`StepRegistry`].
pub struct StepDefinition {
    keyword: StepKeyword,
    pattern: StepPattern,
    handler: ErasedHandler,
    location: &'static Location<'static>,
    used: AtomicBool,
}

impl StepDefinition {
    /// The keyword this definition answers to.
    #[must_use]
    pub fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// The compiled pattern.
    #[must_use]
    pub fn pattern(&self) -> &StepPattern {
        &self.pattern
    }

    /// Source file of the registration call.
    #[must_use]
    pub fn file(&self) -> &'static str {
        self.location.file()
    }

    /// Line of the registration call.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.location.line()
    }

    /// Whether the definition has matched a step since registration.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used.load(Ordering::Relaxed)
    }

    /// Run the handler against `captures` within `ctx`.
    ///
    /// Handler panics are caught and reported as [`StepError::Panic`].
    ///
    /// # Errors
    /// Returns [`InvokeError::Arguments`] when the captures cannot be
    /// converted and [`InvokeError::Step`] when the handler fails.
    pub fn invoke(&self, ctx: &mut ScenarioContext, captures: &[String]) -> Result<(), InvokeError> {
        catch_unwind(AssertUnwindSafe(|| (self.handler)(ctx, captures))).unwrap_or_else(
            |payload| {
                Err(InvokeError::Step(StepError::Panic(panic_message(
                    payload.as_ref(),
                ))))
            },
        )
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("keyword", &self.keyword)
            .field("pattern", &self.pattern.as_str())
            .field("file", &self.file())
            .field("line", &self.line())
            .finish_non_exhaustive()
    }
}

/// A definition selected for a step together with its captured groups.
#[derive(Debug)]
pub struct StepMatch<'r> {
    definition: &'r StepDefinition,
    captures: Vec<String>,
}

impl<'r> StepMatch<'r> {
    /// The selected definition.
    #[must_use]
    pub fn definition(&self) -> &'r StepDefinition {
        self.definition
    }

    /// Captured groups in pattern order.
    #[must_use]
    pub fn captures(&self) -> &[String] {
        &self.captures
    }

    /// Invoke the selected definition with the captured groups.
    ///
    /// # Errors
    /// See [`StepDefinition::invoke`].
    pub fn invoke(&self, ctx: &mut ScenarioContext) -> Result<(), InvokeError> {
        self.definition.invoke(ctx, &self.captures)
    }
}

/// Ordered collection of step definitions.
///
/// # Examples
///
/// ```
/// use cukebind::{ScenarioContext, StepKeyword, StepRegistry};
///
/// #[derive(Default)]
/// struct Totals {
///     result: i32,
/// }
///
/// let mut registry = StepRegistry::new();
/// registry
///     .given(r"^Given value (\d+)$", |ctx: &mut ScenarioContext, (val,): (i32,)| {
///         ctx.scope::<Totals>().result = val;
///         Ok(())
///     })
///     .expect("valid pattern");
///
/// let mut ctx = ScenarioContext::new();
/// let step = registry
///     .find(StepKeyword::Given, "Given value 5")
///     .expect("step is defined");
/// assert_eq!(step.captures(), ["5"]);
/// step.invoke(&mut ctx).expect("step passes");
/// assert_eq!(ctx.get::<Totals>().map(|t| t.result), Some(5));
/// ```
#[derive(Debug, Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Construct an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for steps of `keyword` matching `pattern`.
    ///
    /// The handler declares its parameters through [`StepArgs`]; the
    /// declared count must equal the pattern's capture-group count.
    ///
    /// # Errors
    /// Returns [`RegistrationError`] when the pattern is malformed, the
    /// keyword is `And`/`But`, or the parameter count does not fit the
    /// pattern. Callers treat these as fatal to startup.
    #[track_caller]
    pub fn register<A, F>(
        &mut self,
        keyword: StepKeyword,
        pattern: &str,
        handler: F,
    ) -> Result<&mut Self, RegistrationError>
    where
        A: StepArgs + 'static,
        F: Fn(&mut ScenarioContext, A) -> StepResult + Send + Sync + 'static,
    {
        let location = Location::caller();
        let site = || format!("{}:{}", location.file(), location.line());
        if !keyword.is_primary() {
            return Err(RegistrationError::ConjunctionKeyword {
                keyword,
                location: site(),
            });
        }
        let pattern = StepPattern::new(pattern).map_err(|source| {
            RegistrationError::InvalidPattern {
                keyword,
                location: site(),
                source,
            }
        })?;
        if let Some(parameters) = A::ARITY {
            let captures = pattern.capture_count();
            if captures != parameters {
                return Err(RegistrationError::ArityMismatch {
                    pattern: pattern.as_str().to_string(),
                    location: site(),
                    captures,
                    parameters,
                });
            }
        }
        if let Some(existing) = self
            .definitions
            .iter()
            .find(|d| d.keyword == keyword && d.pattern == pattern)
        {
            log::warn!(
                "duplicate {keyword} step '{pattern}' at {}; the definition at {}:{} takes precedence",
                site(),
                existing.file(),
                existing.line()
            );
        }
        log::debug!("registered {keyword} step '{pattern}' at {}", site());
        self.definitions.push(StepDefinition {
            keyword,
            pattern,
            handler: Box::new(move |ctx: &mut ScenarioContext, captures: &[String]| {
                let args = A::from_captures(captures).map_err(InvokeError::Arguments)?;
                handler(ctx, args).map_err(InvokeError::Step)
            }),
            location,
            used: AtomicBool::new(false),
        });
        Ok(self)
    }

    /// Register a `Given` step. See [`register`](Self::register).
    ///
    /// # Errors
    /// See [`register`](Self::register).
    #[track_caller]
    pub fn given<A, F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RegistrationError>
    where
        A: StepArgs + 'static,
        F: Fn(&mut ScenarioContext, A) -> StepResult + Send + Sync + 'static,
    {
        self.register(StepKeyword::Given, pattern, handler)
    }

    /// Register a `When` step. See [`register`](Self::register).
    ///
    /// # Errors
    /// See [`register`](Self::register).
    #[track_caller]
    pub fn when<A, F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RegistrationError>
    where
        A: StepArgs + 'static,
        F: Fn(&mut ScenarioContext, A) -> StepResult + Send + Sync + 'static,
    {
        self.register(StepKeyword::When, pattern, handler)
    }

    /// Register a `Then` step. See [`register`](Self::register).
    ///
    /// # Errors
    /// See [`register`](Self::register).
    #[track_caller]
    pub fn then<A, F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RegistrationError>
    where
        A: StepArgs + 'static,
        F: Fn(&mut ScenarioContext, A) -> StepResult + Send + Sync + 'static,
    {
        self.register(StepKeyword::Then, pattern, handler)
    }

    /// Find the first definition of `keyword` whose pattern matches `text`.
    ///
    /// `And`/`But` are resolved to `Given` here; callers tracking a scenario
    /// resolve conjunctions against the preceding step first.
    #[must_use]
    pub fn find(&self, keyword: StepKeyword, text: &str) -> Option<StepMatch<'_>> {
        let keyword = keyword.resolve(&mut None);
        let found = self
            .definitions
            .iter()
            .filter(|definition| definition.keyword == keyword)
            .find_map(|definition| {
                definition
                    .pattern
                    .captures(text)
                    .map(|captures| StepMatch {
                        definition,
                        captures,
                    })
            });
        match &found {
            Some(step) => {
                step.definition.used.store(true, Ordering::Relaxed);
                log::debug!(
                    "'{text}' matched {keyword} step '{}'",
                    step.definition.pattern
                );
            }
            None => log::debug!("'{text}' matched no {keyword} step"),
        }
        found
    }

    /// Match a full step line, taking the keyword from its first word.
    ///
    /// A line opening with `And`/`But` has no preceding step here, so it is
    /// matched as a `Given` line. Returns `None` when the line has no keyword
    /// or no definition matches.
    #[must_use]
    pub fn match_line(&self, line: &str) -> Option<StepMatch<'_>> {
        let (keyword, _) = StepKeyword::split_line(line)?;
        let keyword = keyword.resolve(&mut None);
        self.find(keyword, &StepKeyword::normalise_line(line, keyword))
    }

    /// Registered definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.definitions.iter()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Return `true` when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions that have never matched a step.
    #[must_use]
    pub fn unused_steps(&self) -> Vec<&StepDefinition> {
        self.definitions.iter().filter(|d| !d.is_used()).collect()
    }

    /// Group definitions sharing a keyword and pattern.
    ///
    /// Groups are ordered by their first registration; within a group the
    /// first entry is the definition that wins matching.
    #[must_use]
    pub fn duplicate_steps(&self) -> Vec<Vec<&StepDefinition>> {
        let mut groups: HashMap<(StepKeyword, &str), Vec<&StepDefinition>> = HashMap::new();
        let mut order = Vec::new();
        for definition in &self.definitions {
            let key = (definition.keyword, definition.pattern.as_str());
            let group = groups.entry(key).or_insert_with(|| {
                order.push(key);
                Vec::new()
            });
            group.push(definition);
        }
        order
            .into_iter()
            .filter_map(|key| groups.remove(&key))
            .filter(|group| group.len() > 1)
            .collect()
    }

    /// Serialise the registry to a JSON document.
    ///
    /// Each entry records the keyword, pattern, registration site, and
    /// whether the definition has been used.
    ///
    /// # Errors
    /// Returns an error if serialisation fails.
    #[cfg(feature = "diagnostics")]
    pub fn dump(&self) -> serde_json::Result<String> {
        diagnostics::dump(self)
    }
}

#[cfg(test)]
mod tests;
