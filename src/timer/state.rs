//! Run lifecycle state.
//!
//! Atomic state cell shared between the engine's control methods and the
//! spawned run task. Transitions are compare-and-exchange so a `stop()`
//! racing natural completion resolves to exactly one terminal state.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of one engine instance's run slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    /// No run was ever started.
    Idle = 0,
    /// A run loop is active.
    Running = 1,
    /// The active run was cancelled via `stop()`; terminal for that run.
    Cancelled = 2,
    /// The run finished naturally and `ended` was published; terminal.
    Completed = 3,
}

impl RunState {
    const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Cancelled,
            3 => Self::Completed,
            _ => Self::Idle,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        };
        write!(f, "{name}")
    }
}

/// Atomic cell holding a [`RunState`].
#[derive(Debug)]
pub struct RunStateCell(AtomicU8);

impl RunStateCell {
    /// Creates a cell in the [`RunState::Idle`] state.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU8::new(RunState::Idle as u8))
    }

    /// Returns the current state.
    #[must_use]
    pub fn load(&self) -> RunState {
        RunState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Unconditionally sets the state. Used when a new run is spawned over
    /// a terminal previous run.
    pub fn store(&self, state: RunState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }

    /// Attempts to atomically transition from `from` to `to`.
    ///
    /// Returns `true` if this call won the transition.
    pub fn try_transition(&self, from: RunState, to: RunState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

impl Default for RunStateCell {
    fn default() -> Self {
        Self::new()
    }
}
