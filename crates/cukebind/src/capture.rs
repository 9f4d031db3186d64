//! Regex capture helpers used when matching step text.

use regex::Regex;

/// Return the user capture groups of `re` in `text`, or `None` when the
/// text does not match.
///
/// An optional group that took no part in the match is returned as an empty
/// string, so the result always has one entry per group.
///
/// # Examples
/// ```
/// use cukebind::capture::extract_captured_values;
/// use regex::Regex;
///
/// let add = Regex::new(r"^When I add (\d+)(?: and (\d+))?$")?;
/// assert_eq!(
///     extract_captured_values(&add, "When I add 3"),
///     Some(vec![String::from("3"), String::new()])
/// );
/// assert_eq!(extract_captured_values(&add, "When I add three"), None);
/// # Ok::<(), regex::Error>(())
/// ```
#[must_use]
pub fn extract_captured_values(re: &Regex, text: &str) -> Option<Vec<String>> {
    re.captures(text).map(|caps| {
        caps.iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_owned()).unwrap_or_default())
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[expect(clippy::expect_used, reason = "tests require descriptive panic messages")]
    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).expect("test regex must compile")
    }

    #[test]
    fn returns_none_when_pattern_does_not_match() {
        assert!(extract_captured_values(&regex(r"^(\d+)$"), "nope").is_none());
    }

    #[test]
    fn collects_captures_in_order() {
        let captures = extract_captured_values(&regex(r"^(\d+)-(\w+)-(\d+)$"), "12-answer-7");
        assert_eq!(
            captures,
            Some(vec![
                String::from("12"),
                String::from("answer"),
                String::from("7")
            ])
        );
    }

    #[test]
    fn supports_empty_optional_groups() {
        let captures = extract_captured_values(&regex(r"^(a)?(b)?$"), "a");
        assert_eq!(captures, Some(vec![String::from("a"), String::new()]));
    }

    #[test]
    fn pattern_without_groups_yields_empty_vector() {
        let captures = extract_captured_values(&regex(r"^a calculator$"), "a calculator");
        assert_eq!(captures, Some(Vec::new()));
    }
}
