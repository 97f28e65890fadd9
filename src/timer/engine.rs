//! The interval timer engine.
//!
//! Owns the workout configuration, the current run's cancellable task, and
//! the nested phase-sequencing loop. One cooperative task runs per engine
//! instance; it suspends exactly once per simulated second and checks the
//! cancellation token at every suspension point.
//!
//! The engine does not serialize concurrent `start`/`restart` calls —
//! enforcing "only one active run" is the caller's job via
//! [`is_running`](IntervalTimer::is_running).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::WorkoutConfig;
use crate::error::TimerError;
use crate::signal::Signal;

use super::event::TickEvent;
use super::state::{RunState, RunStateCell};

/// Fixed preparation countdown, in ticks. Not configurable: 15 second
/// spoken countdown plus a 2 second audio lead-in.
pub const PREPARATION_SECS: u32 = 17;

/// The engine's three signals.
///
/// Listeners receive payloads by value or by shared reference and never
/// mutate engine state through them; control flows only through the
/// engine's methods.
#[derive(Debug)]
pub struct TimerEvents {
    /// Published synchronously from `start`/`restart`, before any tick.
    pub started: Signal<()>,
    /// One per elapsed second of the run.
    pub tick: Signal<TickEvent>,
    /// Published only on natural completion, never on cancellation.
    pub ended: Signal<()>,
}

impl TimerEvents {
    fn new() -> Self {
        Self {
            started: Signal::new("started"),
            tick: Signal::new("tick"),
            ended: Signal::new("ended"),
        }
    }
}

/// Interval workout countdown engine.
///
/// Holds at most one active run at a time; spawning a new run discards the
/// previous (already terminal) run's handle.
pub struct IntervalTimer {
    events: Arc<TimerEvents>,
    state: Arc<RunStateCell>,
    config: Mutex<Option<WorkoutConfig>>,
    cancel: Mutex<Option<CancellationToken>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl IntervalTimer {
    /// Creates an idle engine with no stored configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(TimerEvents::new()),
            state: Arc::new(RunStateCell::new()),
            config: Mutex::new(None),
            cancel: Mutex::new(None),
            handle: Mutex::new(None),
        }
    }

    /// The engine's signals, for listeners to subscribe to.
    #[must_use]
    pub fn events(&self) -> &Arc<TimerEvents> {
        &self.events
    }

    /// Validates `config`, stores it, and starts a run with it.
    ///
    /// Publishes `started` synchronously before returning. Must be called
    /// from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Config`] if `config` violates an invariant; in
    /// that case nothing is stored, no run is spawned, and no `started`
    /// signal is published.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn start(&self, config: WorkoutConfig) -> Result<(), TimerError> {
        config.validate()?;
        *self.config.lock().expect("config lock poisoned") = Some(config);
        self.spawn_run(config);
        Ok(())
    }

    /// Starts a run with the last stored configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::NotConfigured`] if no configuration was ever
    /// accepted; state is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn restart(&self) -> Result<(), TimerError> {
        let config = self
            .config
            .lock()
            .expect("config lock poisoned")
            .ok_or(TimerError::NotConfigured)?;
        self.spawn_run(config);
        Ok(())
    }

    /// Requests cancellation of the active run.
    ///
    /// Cooperative: the run loop terminates at its next one-second
    /// suspension point, emitting no further `tick` and never `ended`.
    /// Calling this with no active run is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn stop(&self) {
        if self.state.try_transition(RunState::Running, RunState::Cancelled) {
            if let Some(cancel) = self.cancel.lock().expect("cancel lock poisoned").as_ref() {
                cancel.cancel();
            }
            debug!("timer stopped");
        }
    }

    /// Returns `true` iff a run is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.load() == RunState::Running
    }

    /// Returns the current run lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state.load()
    }

    /// Renders the stored configuration as a human-readable sentence.
    ///
    /// Pure with respect to engine state.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::NotConfigured`] if no configuration was ever
    /// accepted.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub fn describe_config(&self) -> Result<String, TimerError> {
        self.config
            .lock()
            .expect("config lock poisoned")
            .map(|config| config.to_string())
            .ok_or(TimerError::NotConfigured)
    }

    /// Waits for the current run's task to finish (naturally or after
    /// cancellation). Returns immediately if no task is held.
    ///
    /// # Panics
    ///
    /// Panics if an internal lock is poisoned.
    pub async fn join(&self) {
        let handle = self.handle.lock().expect("handle lock poisoned").take();
        if let Some(handle) = handle {
            // The run loop isolates listener panics, so a JoinError can
            // only be an external abort; nothing to surface either way.
            let _ = handle.await;
        }
    }

    fn spawn_run(&self, config: WorkoutConfig) {
        let cancel = CancellationToken::new();
        *self.cancel.lock().expect("cancel lock poisoned") = Some(cancel.clone());
        self.state.store(RunState::Running);

        // `started` goes out before the task exists, so it strictly
        // precedes every tick of the run; a listener that calls `stop()`
        // here cancels the token and the loop exits at its first wait.
        self.events.started.publish(&());
        debug!(%config, "timer started");

        let task = run_loop(
            Arc::clone(&self.events),
            Arc::clone(&self.state),
            config,
            cancel,
        );
        *self.handle.lock().expect("handle lock poisoned") = Some(tokio::spawn(task));
    }
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IntervalTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalTimer")
            .field("state", &self.state.load())
            .finish_non_exhaustive()
    }
}

/// Total number of `tick` signals a run with `config` will emit.
///
/// Closed form of the run loop: the fixed preparation countdown, every
/// work second, inter-exercise rests (none after the last exercise of a
/// set), and inter-set rests (none after the last set). The settle second
/// before `ended` emits no tick and is not counted.
#[must_use]
pub fn scheduled_ticks(config: &WorkoutConfig) -> u64 {
    let work =
        u64::from(config.sets) * u64::from(config.exercises) * u64::from(config.work_secs);
    let exercise_rest = u64::from(config.sets)
        * u64::from(config.exercises.saturating_sub(1))
        * u64::from(config.rest_between_exercises);
    let set_rest =
        u64::from(config.sets.saturating_sub(1)) * u64::from(config.rest_between_sets);
    u64::from(PREPARATION_SECS) + work + exercise_rest + set_rest
}

/// Waits one second, yielding to cancellation.
///
/// Returns `false` if the run was cancelled before the second elapsed; no
/// partial tick is emitted for an interrupted second.
async fn wait_second(cancel: &CancellationToken) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(Duration::from_secs(1)) => true,
    }
}

/// The phase-sequencing loop. One cooperative task per run.
async fn run_loop(
    events: Arc<TimerEvents>,
    state: Arc<RunStateCell>,
    config: WorkoutConfig,
    cancel: CancellationToken,
) {
    // Fixed preparation countdown always runs first.
    for elapsed in 1..=PREPARATION_SECS {
        if !wait_second(&cancel).await {
            return;
        }
        events
            .tick
            .publish(&TickEvent::preparation(elapsed, PREPARATION_SECS - elapsed));
    }

    for set in 0..config.sets {
        debug!(set, "set starting");
        for exercise in 0..config.exercises {
            for t in 1..=config.work_secs {
                if !wait_second(&cancel).await {
                    return;
                }
                events.tick.publish(&TickEvent::work(
                    t,
                    config.work_secs - t,
                    config.halfway_sound,
                ));
            }

            // No rest after the last exercise of a set.
            if exercise + 1 == config.exercises {
                break;
            }
            for t in 1..=config.rest_between_exercises {
                if !wait_second(&cancel).await {
                    return;
                }
                events
                    .tick
                    .publish(&TickEvent::rest(t, config.rest_between_exercises - t));
            }
        }

        // No rest after the last set.
        if set + 1 == config.sets {
            break;
        }
        for t in 1..=config.rest_between_sets {
            if !wait_second(&cancel).await {
                return;
            }
            events
                .tick
                .publish(&TickEvent::rest(t, config.rest_between_sets - t));
        }
    }

    // Settle second so `ended` never lands on the same instant as the
    // final tick.
    if !wait_second(&cancel).await {
        return;
    }
    if state.try_transition(RunState::Running, RunState::Completed) {
        events.ended.publish(&());
        debug!("last interval completed");
    }
}
