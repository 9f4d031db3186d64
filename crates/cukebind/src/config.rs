//! Runtime configuration for cukebind.
//!
//! The module exposes the `fail_fast` flag controlling whether
//! [`ScenarioRunner::run_all`](crate::ScenarioRunner::run_all) stops after the
//! first failed scenario. The flag is read from `CUKEBIND_FAIL_FAST` unless an
//! in-process override is set.

use std::sync::atomic::{AtomicU8, Ordering};

/// Environment variable consulted by [`fail_fast`].
pub const FAIL_FAST_ENV: &str = "CUKEBIND_FAIL_FAST";

const OVERRIDE_UNSET: u8 = 0;
const OVERRIDE_FALSE: u8 = 1;
const OVERRIDE_TRUE: u8 = 2;

static FAIL_FAST_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

/// Parse the boolean words accepted in environment variables.
///
/// Returns `None` for anything unrecognised.
#[must_use]
pub fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" | "on" | "ON" | "On" => Some(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "off" | "OFF" | "Off" => {
            Some(false)
        }
        _ => None,
    }
}

fn env_fail_fast() -> Option<bool> {
    let raw = std::env::var(FAIL_FAST_ENV).ok()?;
    let parsed = parse_env_bool(&raw);
    if parsed.is_none() {
        log::warn!("ignoring unrecognised {FAIL_FAST_ENV} value '{raw}'");
    }
    parsed
}

fn override_state() -> Option<bool> {
    match FAIL_FAST_OVERRIDE.load(Ordering::Relaxed) {
        OVERRIDE_FALSE => Some(false),
        OVERRIDE_TRUE => Some(true),
        _ => None,
    }
}

/// Determine whether a sequential run stops after the first failure.
#[must_use]
pub fn fail_fast() -> bool {
    override_state().or_else(env_fail_fast).unwrap_or(false)
}

/// Override the `fail_fast` flag for the current process.
///
/// Tests may call [`clear_fail_fast_override`] to restore environment driven
/// behaviour after toggling the override.
pub fn set_fail_fast(enabled: bool) {
    let value = if enabled {
        OVERRIDE_TRUE
    } else {
        OVERRIDE_FALSE
    };
    FAIL_FAST_OVERRIDE.store(value, Ordering::Relaxed);
}

/// Remove any in-process override for the `fail_fast` flag.
pub fn clear_fail_fast_override() {
    FAIL_FAST_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
