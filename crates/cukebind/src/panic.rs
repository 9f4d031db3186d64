//! Panic payload formatting for handlers that panic instead of returning an
//! error, such as a failed `assert_eq!` inside a `Then` step.

use std::any::Any;

/// Formats a panic payload into a readable message.
///
/// String payloads are extracted directly, integer payloads are rendered in
/// decimal, and anything else falls back to its `Debug` form.
///
/// # Examples
///
/// ```
/// use cukebind::panic_message;
/// use std::any::Any;
///
/// let payload: Box<dyn Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(payload.as_ref()), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .or_else(|| payload.downcast_ref::<i32>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<i64>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<u32>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<u64>().map(ToString::to_string))
        .or_else(|| payload.downcast_ref::<usize>().map(ToString::to_string))
        .unwrap_or_else(|| format!("{payload:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_owned_string_payload() {
        let payload: Box<dyn Any + Send> = Box::new(String::from("left != right"));
        assert_eq!(panic_message(payload.as_ref()), "left != right");
    }

    #[test]
    fn formats_integer_payload() {
        let payload: Box<dyn Any + Send> = Box::new(42_i32);
        assert_eq!(panic_message(payload.as_ref()), "42");
    }

    #[test]
    fn falls_back_to_debug() {
        let payload: Box<dyn Any + Send> = Box::new(1.5_f32);
        assert_eq!(panic_message(payload.as_ref()), "Any { .. }");
    }
}
