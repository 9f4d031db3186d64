//! Configuration for the test package binary.
//!
//! The log level is read from `CUKEBIND_LOG_LEVEL` and may be overridden by
//! the `--log-level` command-line flag.

use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Environment variable holding the default log level.
pub const LOG_LEVEL_ENV: &str = "CUKEBIND_LOG_LEVEL";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn` so a passing run writes nothing to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes step matching detail.
    Trace,
    /// Registration and matching decisions.
    Debug,
    /// Scenario outcomes.
    Info,
    /// Warning messages such as duplicate step definitions.
    #[default]
    Warn,
    /// Error messages for failures.
    Error,
}

impl FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(AppError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Resolved configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] if `CUKEBIND_LOG_LEVEL` holds an
    /// unknown level.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_env_value(env::var(LOG_LEVEL_ENV).ok().as_deref())
    }

    /// Build configuration from an optional raw environment value.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidConfig`] if `value` is not a known level.
    pub fn from_env_value(value: Option<&str>) -> Result<Self, AppError> {
        let log_level = match value {
            Some(raw) => raw.parse()?,
            None => LogLevel::default(),
        };
        Ok(Self { log_level })
    }

    /// Apply CLI overrides, which take precedence over the environment.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}
