//! Step pattern handling and compilation.
//!
//! A [`StepPattern`] owns the pattern literal supplied at registration and the
//! regular expression compiled from it. Patterns are plain regular
//! expressions; anchoring is left to the author, so `^Given value (\d+)$`
//! only matches whole lines while an unanchored pattern matches anywhere.

use crate::capture::extract_captured_values;
use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors surfaced while compiling a step pattern.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern text is not a valid regular expression.
    #[error("invalid regular expression '{pattern}': {source}")]
    Regex {
        /// The rejected pattern text.
        pattern: String,
        /// Error reported by the regex engine.
        #[source]
        source: regex::Error,
    },
}

/// Pattern text and its compiled regular expression.
#[derive(Clone)]
pub struct StepPattern {
    text: String,
    regex: Regex,
}

// Equality and hashing are by the pattern literal so duplicate registrations
// can be grouped independently of the compiled automaton.
impl PartialEq for StepPattern {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for StepPattern {}

impl Hash for StepPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Debug for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StepPattern").field(&self.text).finish()
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl StepPattern {
    /// Compile `text` into a step pattern.
    ///
    /// # Errors
    /// Returns [`PatternError::Regex`] when `text` is not a valid regular
    /// expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukebind::StepPattern;
    ///
    /// let pattern = StepPattern::new(r"^When I add (\d+)$").expect("valid pattern");
    /// assert_eq!(pattern.capture_count(), 1);
    /// assert!(StepPattern::new(r"^When I add (\d+$").is_err());
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, PatternError> {
        let text = text.into();
        let regex = Regex::new(&text).map_err(|source| PatternError::Regex {
            pattern: text.clone(),
            source,
        })?;
        Ok(Self { text, regex })
    }

    /// Access the underlying pattern string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Access the compiled regular expression.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Number of user-defined capture groups in the pattern.
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// Return the captured groups when `text` matches, otherwise `None`.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        extract_captured_values(&self.regex, text)
    }
}
