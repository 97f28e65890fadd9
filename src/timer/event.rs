//! Tick event payloads.

use serde::Serialize;

/// Activity type of the current second.
///
/// Purely descriptive; the durations live in the engine's loop counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Fixed countdown before the first work phase.
    Preparation,
    /// An exercise is in progress.
    Work,
    /// Rest between exercises or between sets.
    Rest,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Preparation => "preparation",
            Self::Work => "work",
            Self::Rest => "rest",
        };
        write!(f, "{name}")
    }
}

/// Payload of one `tick` signal: one elapsed second in the current
/// sub-phase.
///
/// `halfway_sound` carries the configured flag on every work tick and is
/// absent otherwise; listeners decide the actual cue instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickEvent {
    /// Activity type for this second.
    pub phase: Phase,
    /// Seconds completed in the current sub-phase, 1-based.
    pub elapsed: u32,
    /// Seconds left in the current sub-phase.
    pub remaining: u32,
    /// Configured halfway flag, forwarded on work ticks only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub halfway_sound: Option<bool>,
}

impl TickEvent {
    /// A preparation-countdown tick.
    #[must_use]
    pub const fn preparation(elapsed: u32, remaining: u32) -> Self {
        Self {
            phase: Phase::Preparation,
            elapsed,
            remaining,
            halfway_sound: None,
        }
    }

    /// A work-phase tick carrying the configured halfway flag.
    #[must_use]
    pub const fn work(elapsed: u32, remaining: u32, halfway_sound: bool) -> Self {
        Self {
            phase: Phase::Work,
            elapsed,
            remaining,
            halfway_sound: Some(halfway_sound),
        }
    }

    /// A rest-phase tick.
    #[must_use]
    pub const fn rest(elapsed: u32, remaining: u32) -> Self {
        Self {
            phase: Phase::Rest,
            elapsed,
            remaining,
            halfway_sound: None,
        }
    }
}
