//! Structured logging for the test package binary.
//!
//! Logs go to stderr so stdout carries only the package's output line.
//! Records emitted by `cukebind` through the `log` facade are forwarded to
//! the same subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

fn filter_from_config(config: &AppConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// If a global subscriber is already set the call does nothing; the first
/// subscriber wins.
pub fn init_logging(config: &AppConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
