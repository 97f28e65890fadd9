//! Phase timer engine.
//!
//! The nested state machine that sequences Preparation → Work → Rest
//! transitions across exercises and sets, its second-granularity clock,
//! its start/restart/stop control surface, and its event publication.

pub mod engine;
pub mod event;
pub mod state;

pub use engine::{IntervalTimer, PREPARATION_SECS, TimerEvents, scheduled_ticks};
pub use event::{Phase, TickEvent};
pub use state::RunState;
