//! Step keyword type and parsing utilities.
//!
//! Step lines carry their keyword as the leading word (`Given value 5`). The
//! registry files definitions under the primary keywords only; `And` and `But`
//! lines borrow the keyword of the preceding primary step through
//! [`StepKeyword::resolve`].

use gherkin::StepType;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Keyword used to categorise a step definition or a step line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKeyword {
    /// Setup preconditions for a scenario.
    Given,
    /// Perform an action when testing behaviour.
    When,
    /// Assert the expected outcome of a scenario.
    Then,
    /// Additional conditions that share context with the previous step.
    And,
    /// Negative or contrasting conditions.
    But,
}

impl StepKeyword {
    /// Return the keyword as a string slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukebind::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::Given.as_str(), "Given");
    /// assert_eq!(StepKeyword::But.as_str(), "But");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    /// Return `true` for `Given`, `When` and `Then`.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        matches!(self, Self::Given | Self::When | Self::Then)
    }

    /// Resolve conjunctions to the semantic keyword of the previous step.
    ///
    /// When the current keyword is `And` or `But`, returns the value stored in
    /// `prev`, defaulting to `Given` when no primary keyword has been seen.
    /// Primary keywords update `prev` and are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukebind::StepKeyword;
    ///
    /// let mut prev = Some(StepKeyword::Given);
    /// assert_eq!(StepKeyword::And.resolve(&mut prev), StepKeyword::Given);
    /// assert_eq!(StepKeyword::When.resolve(&mut prev), StepKeyword::When);
    /// assert_eq!(prev, Some(StepKeyword::When));
    /// ```
    #[must_use]
    pub fn resolve(self, prev: &mut Option<Self>) -> Self {
        if self.is_primary() {
            *prev = Some(self);
            self
        } else {
            prev.as_ref().copied().unwrap_or(Self::Given)
        }
    }

    /// Split a step line into its leading keyword and the remaining text.
    ///
    /// Returns `None` when the first word is not a step keyword.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukebind::StepKeyword;
    ///
    /// assert_eq!(
    ///     StepKeyword::split_line("  When I add 3"),
    ///     Some((StepKeyword::When, "I add 3")),
    /// );
    /// assert_eq!(StepKeyword::split_line("Suppose x"), None);
    /// ```
    #[must_use]
    pub fn split_line(line: &str) -> Option<(Self, &str)> {
        let trimmed = line.trim_start();
        let (word, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        let keyword = word.parse().ok()?;
        Some((keyword, rest.trim_start()))
    }

    /// Rewrite the leading keyword of `line` in its canonical spelling.
    ///
    /// Patterns spell out the primary keyword (`^When I add (\d+)$`), so a
    /// conjunction line is matched as if it had been written with the keyword
    /// it stands for, and a primary keyword in any letter case is written as
    /// [`as_str`](Self::as_str) returns it. Lines without a keyword are only
    /// trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukebind::StepKeyword;
    ///
    /// assert_eq!(StepKeyword::normalise_line("And I add 2", StepKeyword::When), "When I add 2");
    /// assert_eq!(StepKeyword::normalise_line("then it equals 3 ", StepKeyword::Then), "Then it equals 3");
    /// ```
    #[must_use]
    pub fn normalise_line(line: &str, resolved: Self) -> Cow<'_, str> {
        let trimmed = line.trim();
        let Some((leading, rest)) = Self::split_line(trimmed) else {
            return Cow::Borrowed(trimmed);
        };
        let keyword = if leading.is_primary() { leading } else { resolved };
        let canonical = format!("{keyword} {rest}");
        let canonical = canonical.trim_end();
        if canonical == trimmed {
            Cow::Borrowed(trimmed)
        } else {
            Cow::Owned(canonical.to_owned())
        }
    }
}

impl fmt::Display for StepKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`StepKeyword`] from a string fails.
///
/// Contains the unrecognised keyword text for diagnostic purposes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid step keyword: {0}")]
pub struct StepKeywordParseError(pub String);

impl FromStr for StepKeyword {
    type Err = StepKeywordParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("given") {
            Ok(Self::Given)
        } else if trimmed.eq_ignore_ascii_case("when") {
            Ok(Self::When)
        } else if trimmed.eq_ignore_ascii_case("then") {
            Ok(Self::Then)
        } else if trimmed.eq_ignore_ascii_case("and") {
            Ok(Self::And)
        } else if trimmed.eq_ignore_ascii_case("but") {
            Ok(Self::But)
        } else {
            Err(StepKeywordParseError(trimmed.to_string()))
        }
    }
}

impl From<StepType> for StepKeyword {
    fn from(ty: StepType) -> Self {
        match ty {
            StepType::Given => Self::Given,
            StepType::When => Self::When,
            StepType::Then => Self::Then,
        }
    }
}
