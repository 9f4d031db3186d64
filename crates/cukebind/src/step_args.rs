//! Typed handler arguments converted from pattern captures.
//!
//! The [`StepArgs`] trait turns the ordered capture strings produced by a
//! step pattern into the parameter value a handler declares. Tuples of
//! [`FromStr`] types convert positionally, `()` accepts patterns without
//! groups, and `Vec<String>` receives the raw captures untouched. Conversion
//! failures surface as [`StepArgsError`] values and fail the scenario.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when captured strings cannot become handler arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StepArgsError {
    /// A captured value could not be parsed into the declared type.
    #[error("failed to convert capture {index} ('{value}') to {target}: {reason}")]
    Conversion {
        /// Zero-based capture group position.
        index: usize,
        /// The captured text.
        value: String,
        /// Name of the declared parameter type.
        target: &'static str,
        /// Message reported by the type's `FromStr` implementation.
        reason: String,
    },
    /// The number of captures differs from the declared parameter count.
    #[error("expected {expected} captured value(s) but received {actual}")]
    CountMismatch {
        /// Declared parameter count.
        expected: usize,
        /// Captures supplied by the pattern.
        actual: usize,
    },
}

/// Values that can be built from the captures of a matched step.
pub trait StepArgs: Sized {
    /// Number of captures consumed, or `None` when any count is accepted.
    const ARITY: Option<usize>;

    /// Convert the ordered capture strings into handler arguments.
    ///
    /// # Errors
    /// Returns [`StepArgsError`] when a capture cannot be parsed or the
    /// capture count does not match [`Self::ARITY`].
    fn from_captures(values: &[String]) -> Result<Self, StepArgsError>;
}

/// Parse the capture at `index` into `T`.
///
/// # Errors
/// Returns [`StepArgsError::Conversion`] when parsing fails and
/// [`StepArgsError::CountMismatch`] when `index` is out of range.
///
/// # Examples
///
/// ```
/// use cukebind::step_args::{StepArgsError, parse_capture};
///
/// let values = vec!["5".to_string(), "abc".to_string()];
/// assert_eq!(parse_capture::<i32>(&values, 0), Ok(5));
/// assert!(matches!(
///     parse_capture::<i32>(&values, 1),
///     Err(StepArgsError::Conversion { index: 1, .. })
/// ));
/// ```
pub fn parse_capture<T>(values: &[String], index: usize) -> Result<T, StepArgsError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(value) = values.get(index) else {
        return Err(StepArgsError::CountMismatch {
            expected: index.saturating_add(1),
            actual: values.len(),
        });
    };
    value.parse::<T>().map_err(|err| StepArgsError::Conversion {
        index,
        value: value.clone(),
        target: std::any::type_name::<T>(),
        reason: err.to_string(),
    })
}

fn ensure_count(expected: usize, actual: usize) -> Result<(), StepArgsError> {
    if expected == actual {
        Ok(())
    } else {
        Err(StepArgsError::CountMismatch { expected, actual })
    }
}

impl StepArgs for () {
    const ARITY: Option<usize> = Some(0);

    fn from_captures(values: &[String]) -> Result<Self, StepArgsError> {
        ensure_count(0, values.len())
    }
}

impl StepArgs for Vec<String> {
    const ARITY: Option<usize> = None;

    fn from_captures(values: &[String]) -> Result<Self, StepArgsError> {
        Ok(values.to_vec())
    }
}

macro_rules! impl_step_args_for_tuple {
    ($count:expr; $($ty:ident => $idx:tt),+) => {
        impl<$($ty),+> StepArgs for ($($ty,)+)
        where
            $($ty: FromStr, <$ty as FromStr>::Err: fmt::Display,)+
        {
            const ARITY: Option<usize> = Some($count);

            fn from_captures(values: &[String]) -> Result<Self, StepArgsError> {
                ensure_count($count, values.len())?;
                Ok(($(parse_capture::<$ty>(values, $idx)?,)+))
            }
        }
    };
}

impl_step_args_for_tuple!(1; A => 0);
impl_step_args_for_tuple!(2; A => 0, B => 1);
impl_step_args_for_tuple!(3; A => 0, B => 1, C => 2);
impl_step_args_for_tuple!(4; A => 0, B => 1, C => 2, D => 3);
impl_step_args_for_tuple!(5; A => 0, B => 1, C => 2, D => 3, E => 4);
