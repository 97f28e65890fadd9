//! End-to-end tests for the phase timer engine on a paused tokio clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use interval_timer::config::WorkoutConfig;
use interval_timer::timer::{
    IntervalTimer, PREPARATION_SECS, Phase, RunState, TickEvent, TimerEvents, scheduled_ticks,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Record {
    Started,
    Tick(TickEvent),
    Ended,
}

type Log = Arc<Mutex<Vec<(Record, Instant)>>>;

fn attach_recorder(events: &Arc<TimerEvents>) -> Log {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    {
        let log = Arc::clone(&log);
        events.started.subscribe(move |()| {
            log.lock().unwrap().push((Record::Started, Instant::now()));
        });
    }
    {
        let log = Arc::clone(&log);
        events.tick.subscribe(move |tick| {
            log.lock().unwrap().push((Record::Tick(*tick), Instant::now()));
        });
    }
    {
        let log = Arc::clone(&log);
        events.ended.subscribe(move |()| {
            log.lock().unwrap().push((Record::Ended, Instant::now()));
        });
    }
    log
}

fn ticks_of(log: &Log) -> Vec<TickEvent> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|(record, _)| match record {
            Record::Tick(tick) => Some(*tick),
            _ => None,
        })
        .collect()
}

fn ended_count(log: &Log) -> usize {
    log.lock()
        .unwrap()
        .iter()
        .filter(|(record, _)| *record == Record::Ended)
        .count()
}

/// The tick sequence the run loop must produce, built independently.
fn expected_ticks(config: &WorkoutConfig) -> Vec<TickEvent> {
    let mut ticks = Vec::new();
    for elapsed in 1..=PREPARATION_SECS {
        ticks.push(TickEvent::preparation(elapsed, PREPARATION_SECS - elapsed));
    }
    for set in 0..config.sets {
        for exercise in 0..config.exercises {
            for t in 1..=config.work_secs {
                ticks.push(TickEvent::work(
                    t,
                    config.work_secs - t,
                    config.halfway_sound,
                ));
            }
            if exercise + 1 == config.exercises {
                break;
            }
            for t in 1..=config.rest_between_exercises {
                ticks.push(TickEvent::rest(t, config.rest_between_exercises - t));
            }
        }
        if set + 1 == config.sets {
            break;
        }
        for t in 1..=config.rest_between_sets {
            ticks.push(TickEvent::rest(t, config.rest_between_sets - t));
        }
    }
    ticks
}

/// Advances the paused clock one second at a time, yielding around each
/// step so the run task can register its next sleep before the clock
/// crosses the deadline. A single large `advance` would jump past a sleep
/// that the task has not created yet and no tick would ever fire.
async fn advance_secs(n: u64) {
    tokio::task::yield_now().await;
    for _ in 0..n {
        tokio::time::advance(Duration::from_secs(1)).await;
        tokio::task::yield_now().await;
    }
}

fn worked_example() -> WorkoutConfig {
    WorkoutConfig {
        exercises: 3,
        sets: 2,
        work_secs: 5,
        rest_between_exercises: 2,
        rest_between_sets: 3,
        halfway_sound: true,
    }
}

#[tokio::test(start_paused = true)]
async fn worked_example_emits_58_ticks_then_ended() {
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(worked_example()).unwrap();
    timer.join().await;

    let records = log.lock().unwrap().clone();
    assert_eq!(records.first().map(|(r, _)| r.clone()), Some(Record::Started));
    assert_eq!(records.last().map(|(r, _)| r.clone()), Some(Record::Ended));
    assert_eq!(ended_count(&log), 1);

    let ticks = ticks_of(&log);
    assert_eq!(ticks.len(), 58);
    assert_eq!(ticks.len() as u64, scheduled_ticks(&worked_example()));
    assert_eq!(ticks, expected_ticks(&worked_example()));

    // One second between consecutive ticks, and one settle second between
    // the final tick and `ended`.
    for pair in records[1..].windows(2) {
        let (_, earlier) = &pair[0];
        let (_, later) = &pair[1];
        assert_eq!(*later - *earlier, Duration::from_secs(1));
    }

    assert_eq!(timer.state(), RunState::Completed);
    assert!(!timer.is_running());
}

#[tokio::test(start_paused = true)]
async fn halfway_flag_present_on_every_work_tick_only() {
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(worked_example()).unwrap();
    timer.join().await;

    for tick in ticks_of(&log) {
        match tick.phase {
            Phase::Work => assert_eq!(tick.halfway_sound, Some(true)),
            Phase::Preparation | Phase::Rest => assert_eq!(tick.halfway_sound, None),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn single_exercise_emits_no_exercise_rest() {
    let config = WorkoutConfig {
        exercises: 1,
        sets: 3,
        work_secs: 4,
        rest_between_exercises: 5,
        rest_between_sets: 2,
        halfway_sound: false,
    };
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(config).unwrap();
    timer.join().await;

    let ticks = ticks_of(&log);
    let rest_ticks = ticks.iter().filter(|t| t.phase == Phase::Rest).count();
    // Only the two inter-set rests remain.
    assert_eq!(rest_ticks, 2 * 2);
    assert_eq!(ticks.len() as u64, scheduled_ticks(&config));
}

#[tokio::test(start_paused = true)]
async fn single_set_emits_no_set_rest() {
    let config = WorkoutConfig {
        exercises: 2,
        sets: 1,
        work_secs: 3,
        rest_between_exercises: 2,
        rest_between_sets: 30,
        halfway_sound: false,
    };
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(config).unwrap();
    timer.join().await;

    let ticks = ticks_of(&log);
    let rest_ticks = ticks.iter().filter(|t| t.phase == Phase::Rest).count();
    // Only the single inter-exercise rest; the 30s set rest never runs.
    assert_eq!(rest_ticks, 2);
    assert_eq!(ticks.len() as u64, scheduled_ticks(&config));
}

#[tokio::test(start_paused = true)]
async fn zero_valued_rests_emit_zero_ticks() {
    let config = WorkoutConfig {
        exercises: 3,
        sets: 2,
        work_secs: 2,
        rest_between_exercises: 0,
        rest_between_sets: 0,
        halfway_sound: false,
    };
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(config).unwrap();
    timer.join().await;

    let ticks = ticks_of(&log);
    assert!(ticks.iter().all(|t| t.phase != Phase::Rest));
    assert_eq!(
        ticks.len() as u64,
        u64::from(PREPARATION_SECS) + 2 * 3 * 2
    );
    assert_eq!(ended_count(&log), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_mid_run_freezes_ticks_and_never_ends() {
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(worked_example()).unwrap();
    assert!(timer.is_running());

    // Let the preparation countdown and a few work seconds elapse.
    advance_secs(20).await;

    timer.stop();
    assert!(!timer.is_running());
    assert_eq!(timer.state(), RunState::Cancelled);
    timer.join().await;

    let frozen = ticks_of(&log).len();
    assert!(frozen >= PREPARATION_SECS as usize);
    assert!((frozen as u64) < scheduled_ticks(&worked_example()));
    assert_eq!(ended_count(&log), 0);

    // Nothing more ever arrives, no matter how much time passes.
    advance_secs(500).await;
    assert_eq!(ticks_of(&log).len(), frozen);
    assert_eq!(ended_count(&log), 0);
}

#[tokio::test(start_paused = true)]
async fn stop_during_settle_second_suppresses_ended() {
    let config = WorkoutConfig {
        exercises: 1,
        sets: 1,
        work_secs: 2,
        rest_between_exercises: 0,
        rest_between_sets: 0,
        halfway_sound: false,
    };
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(config).unwrap();

    // All 19 ticks have fired; the run is inside its settle second.
    let all_ticks = scheduled_ticks(&config);
    advance_secs(all_ticks).await;
    tokio::time::advance(Duration::from_millis(500)).await;
    tokio::task::yield_now().await;
    assert_eq!(ticks_of(&log).len() as u64, all_ticks);

    timer.stop();
    timer.join().await;

    assert_eq!(ended_count(&log), 0);
    assert_eq!(timer.state(), RunState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn stop_from_started_listener_prevents_every_tick() {
    let timer = Arc::new(IntervalTimer::new());
    let log = attach_recorder(timer.events());
    {
        let stopper = Arc::clone(&timer);
        timer.events().started.subscribe(move |()| {
            stopper.stop();
        });
    }

    timer.start(worked_example()).unwrap();
    assert_eq!(timer.state(), RunState::Cancelled);

    advance_secs(100).await;
    timer.join().await;

    assert!(ticks_of(&log).is_empty());
    assert_eq!(ended_count(&log), 0);
    assert_eq!(timer.state(), RunState::Cancelled);
}

#[tokio::test(start_paused = true)]
async fn restart_reproduces_identical_tick_sequence() {
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(worked_example()).unwrap();
    timer.join().await;
    let first_run = ticks_of(&log);
    log.lock().unwrap().clear();

    timer.restart().unwrap();
    assert!(timer.is_running());
    timer.join().await;
    let second_run = ticks_of(&log);

    assert_eq!(first_run, second_run);
    assert_eq!(ended_count(&log), 1);
    assert_eq!(timer.state(), RunState::Completed);
}

#[tokio::test(start_paused = true)]
async fn restart_after_stop_runs_to_completion() {
    let timer = IntervalTimer::new();
    let log = attach_recorder(timer.events());

    timer.start(worked_example()).unwrap();
    advance_secs(5).await;
    timer.stop();
    timer.join().await;
    assert_eq!(ended_count(&log), 0);
    log.lock().unwrap().clear();

    timer.restart().unwrap();
    timer.join().await;

    assert_eq!(
        ticks_of(&log).len() as u64,
        scheduled_ticks(&worked_example())
    );
    assert_eq!(ended_count(&log), 1);
    assert_eq!(timer.state(), RunState::Completed);
}
