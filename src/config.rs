//! Workout configuration.
//!
//! [`WorkoutConfig`] is immutable per run: the engine copies it when a run
//! is spawned, so mutating a preset between runs never affects an in-flight
//! countdown. Presets can be loaded from YAML files.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One workout's worth of timer settings.
///
/// All durations are whole seconds. The non-negative invariant on the rest
/// durations is carried by the unsigned types; [`validate`](Self::validate)
/// rejects zero-valued counts and work durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutConfig {
    /// Number of exercises per set.
    pub exercises: u32,
    /// Number of sets.
    pub sets: u32,
    /// Work phase duration, per exercise.
    pub work_secs: u32,
    /// Rest between consecutive exercises (skipped after the last exercise
    /// of a set).
    #[serde(default)]
    pub rest_between_exercises: u32,
    /// Rest between consecutive sets (skipped after the last set).
    #[serde(default)]
    pub rest_between_sets: u32,
    /// Forwarded to listeners on every work tick; listeners decide the
    /// actual trigger instant.
    #[serde(default)]
    pub halfway_sound: bool,
}

impl WorkoutConfig {
    /// Checks the count and duration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field if
    /// `exercises`, `sets`, or `work_secs` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exercises < 1 {
            return Err(ConfigError::InvalidValue {
                field: "exercises",
                value: u64::from(self.exercises),
                expected: "a positive integer",
            });
        }
        if self.sets < 1 {
            return Err(ConfigError::InvalidValue {
                field: "sets",
                value: u64::from(self.sets),
                expected: "a positive integer",
            });
        }
        if self.work_secs < 1 {
            return Err(ConfigError::InvalidValue {
                field: "work_secs",
                value: u64::from(self.work_secs),
                expected: "a positive number of seconds",
            });
        }
        Ok(())
    }

    /// Loads and validates a workout preset from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseError`] if the file cannot be read or is
    /// not valid YAML, or [`ConfigError::InvalidValue`] if the parsed
    /// preset violates an invariant.
    pub fn from_preset(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: Self = serde_yaml::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl fmt::Display for WorkoutConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sets of {} exercises with {} seconds rest in between. \
             {} seconds workout, {} seconds rest",
            self.sets,
            self.exercises,
            self.rest_between_sets,
            self.work_secs,
            self.rest_between_exercises,
        )
    }
}
