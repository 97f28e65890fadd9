//! Error types for `interval-timer`.
//!
//! Configuration errors are synchronous and surfaced to the immediate
//! caller; cancellation is not an error and has no variant here.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `interval-timer` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid workout values, bad preset file)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (preset file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Timer state error (restart without a stored configuration)
    pub const STATE_ERROR: i32 = 5;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for timer operations.
///
/// Aggregates the domain-specific errors and provides a unified interface
/// for error handling and exit code mapping.
#[derive(Debug, Error)]
pub enum TimerError {
    /// Workout configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An operation that needs a stored configuration was called before
    /// any configuration was ever accepted.
    #[error("no workout configuration stored; start the timer once before restarting")]
    NotConfigured,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimerError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::NotConfigured => ExitCode::STATE_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Workout configuration errors.
///
/// Covers invariant violations on [`WorkoutConfig`](crate::config::WorkoutConfig)
/// values and failures while loading YAML preset files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field has an invalid value
    #[error("invalid value for '{field}': got {value}, expected {expected}")]
    InvalidValue {
        /// Name of the offending field
        field: &'static str,
        /// The actual value provided
        value: u64,
        /// Description of what was expected
        expected: &'static str,
    },

    /// A preset file could not be parsed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the preset file
        path: PathBuf,
        /// Error message from the parser
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message_names_field() {
        let err = ConfigError::InvalidValue {
            field: "exercises",
            value: 0,
            expected: "a positive integer",
        };
        let msg = err.to_string();
        assert!(msg.contains("exercises"));
        assert!(msg.contains('0'));
    }

    #[test]
    fn test_exit_code_mapping() {
        let config: TimerError = ConfigError::InvalidValue {
            field: "sets",
            value: 0,
            expected: "a positive integer",
        }
        .into();
        assert_eq!(config.exit_code(), ExitCode::CONFIG_ERROR);
        assert_eq!(TimerError::NotConfigured.exit_code(), ExitCode::STATE_ERROR);

        let io: TimerError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert_eq!(io.exit_code(), ExitCode::IO_ERROR);
    }
}
