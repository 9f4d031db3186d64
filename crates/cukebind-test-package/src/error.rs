//! Error type for the test package binary.

use cukebind::RegistrationError;
use thiserror::Error;

/// Failures that stop the test package before it prints anything.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// A configuration value could not be understood.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The calculator steps could not be registered.
    #[error("step registration failed: {0}")]
    Registration(#[from] RegistrationError),
}

impl AppError {
    /// Process exit status for this failure.
    ///
    /// Configuration problems exit with `2`, matching clap's usage errors;
    /// registration failures exit with `1`.
    #[must_use]
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::InvalidConfig(_) => 2,
            Self::Registration(_) => 1,
        }
    }
}
