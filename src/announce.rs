//! Cue announcer subscriber.
//!
//! Attaches to the engine's signals and turns them into playback cues for
//! a [`CueSink`] (a console printer and a tracing sink are provided; an
//! audio backend is an external concern). The announcer is an ordinary
//! listener: it never mutates engine state, and [`detach`](Announcer::detach)
//! removes all of its subscriptions deterministically, which is what a
//! "mute" command needs.
//!
//! The engine forwards the configured `halfway_sound` flag on every work
//! tick; deciding the trigger instant is this layer's job. The midpoint is
//! taken as `elapsed == remaining`, which fires once per work phase for
//! even durations and never for odd ones.

use std::sync::Arc;

use tracing::info;

use crate::signal::SubscriptionId;
use crate::timer::{Phase, TickEvent, TimerEvents};

/// A playback cue selected from the timer's signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// The run has started; preparation countdown is underway.
    GetReady,
    /// One of the last five preparation seconds (the value counts down).
    Countdown(u32),
    /// A work phase begins on the next second.
    Go,
    /// A work phase just finished.
    Rest,
    /// Midpoint of a work phase with the halfway flag set.
    Halfway,
    /// The whole workout completed.
    Done,
}

impl std::fmt::Display for Cue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetReady => write!(f, "get ready"),
            Self::Countdown(n) => write!(f, "{n}"),
            Self::Go => write!(f, "go"),
            Self::Rest => write!(f, "rest"),
            Self::Halfway => write!(f, "halfway"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Receives cues selected by an [`Announcer`].
pub trait CueSink: Send + Sync {
    /// Plays (or renders) one cue.
    fn play(&self, cue: Cue);
}

/// Prints cues to stdout, one per line.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl CueSink for ConsoleSink {
    fn play(&self, cue: Cue) {
        println!(">> {cue}");
    }
}

/// Logs cues at info level.
#[derive(Debug, Default)]
pub struct TraceSink;

impl CueSink for TraceSink {
    fn play(&self, cue: Cue) {
        info!(cue = %cue, "announcement");
    }
}

/// Selects the cue, if any, for one tick.
#[must_use]
pub fn cue_for_tick(tick: &TickEvent) -> Option<Cue> {
    match tick.phase {
        Phase::Preparation => match tick.remaining {
            0 => Some(Cue::Go),
            n @ 1..=5 => Some(Cue::Countdown(n)),
            _ => None,
        },
        Phase::Work => {
            if tick.remaining == 0 {
                Some(Cue::Rest)
            } else if tick.halfway_sound == Some(true) && tick.elapsed == tick.remaining {
                Some(Cue::Halfway)
            } else {
                None
            }
        }
        Phase::Rest => (tick.remaining == 0).then_some(Cue::Go),
    }
}

/// An attached cue announcer.
///
/// Holds the subscription handles for all three signals so they can be
/// removed together.
pub struct Announcer {
    events: Arc<TimerEvents>,
    started: SubscriptionId,
    tick: SubscriptionId,
    ended: SubscriptionId,
}

impl Announcer {
    /// Subscribes the announcer to all three of the engine's signals.
    pub fn attach(events: &Arc<TimerEvents>, sink: Arc<dyn CueSink>) -> Self {
        let started = {
            let sink = Arc::clone(&sink);
            events.started.subscribe(move |()| sink.play(Cue::GetReady))
        };
        let tick = {
            let sink = Arc::clone(&sink);
            events.tick.subscribe(move |tick| {
                if let Some(cue) = cue_for_tick(tick) {
                    sink.play(cue);
                }
            })
        };
        let ended = events.ended.subscribe(move |()| sink.play(Cue::Done));

        Self {
            events: Arc::clone(events),
            started,
            tick,
            ended,
        }
    }

    /// Removes all three subscriptions. Further timer events produce no
    /// cues.
    pub fn detach(self) {
        self.events.started.unsubscribe(self.started);
        self.events.tick.unsubscribe(self.tick);
        self.events.ended.unsubscribe(self.ended);
    }
}

impl std::fmt::Debug for Announcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Announcer").finish_non_exhaustive()
    }
}
