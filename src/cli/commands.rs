//! Command dispatch.

use std::sync::Arc;

use tracing::{info, warn};

use crate::announce::{Announcer, ConsoleSink};
use crate::config::WorkoutConfig;
use crate::error::{ExitCode, TimerError};
use crate::timer::{IntervalTimer, RunState, scheduled_ticks};

use super::args::{Cli, Commands, RunArgs, ValidateArgs};

/// Dispatches the parsed CLI to its command handler.
///
/// # Errors
///
/// Returns the command's error for `main` to map to an exit code.
pub async fn dispatch(cli: Cli) -> Result<(), TimerError> {
    match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Validate(args) => validate(&args),
    }
}

/// Builds the workout configuration from a preset file or explicit flags,
/// applying the caller-side halfway policy.
fn build_config(args: &RunArgs) -> Result<WorkoutConfig, TimerError> {
    let mut config = if let Some(path) = &args.preset {
        WorkoutConfig::from_preset(path)?
    } else {
        WorkoutConfig {
            exercises: args.exercises.unwrap_or(0),
            sets: args.sets.unwrap_or(0),
            work_secs: args.work.unwrap_or(0),
            rest_between_exercises: args.rest,
            rest_between_sets: args.set_rest,
            halfway_sound: args.halfway_sound,
        }
    };

    // UI policy, not an engine invariant: a halfway cue inside a short work
    // phase would collide with the end-of-phase cue.
    if config.halfway_sound && config.work_secs <= 10 {
        warn!(
            work_secs = config.work_secs,
            "halfway cue needs work phases longer than 10 seconds; disabling it"
        );
        config.halfway_sound = false;
    }

    Ok(config)
}

async fn run(args: RunArgs) -> Result<(), TimerError> {
    let json = args.json;
    let config = build_config(&args)?;

    let timer = Arc::new(IntervalTimer::new());

    let _announcer = if json {
        timer.events().tick.subscribe(|tick| {
            if let Ok(line) = serde_json::to_string(tick) {
                println!("{line}");
            }
        });
        None
    } else {
        Some(Announcer::attach(
            timer.events(),
            Arc::new(ConsoleSink) as Arc<dyn crate::announce::CueSink>,
        ))
    };

    // Installed before the run starts so a signal arriving during the
    // first seconds is not lost. The first one stops the run at its next
    // second boundary; a second signal forces the process down.
    {
        let timer = Arc::clone(&timer);
        tokio::spawn(async move {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("failed to register SIGTERM handler");

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }

            eprintln!("\nStopping at the next second... (press Ctrl+C again to force)");
            timer.stop();

            tokio::select! {
                _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
                _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
            }
        });
    }

    info!(
        scheduled_ticks = scheduled_ticks(&config),
        "starting workout"
    );
    println!("Beginning {config}. HAVE FUN!");
    timer.start(config)?;
    timer.join().await;

    match timer.state() {
        RunState::Completed => println!("Workout complete."),
        RunState::Cancelled => println!("Timer stopped."),
        RunState::Idle | RunState::Running => {}
    }
    Ok(())
}

fn validate(args: &ValidateArgs) -> Result<(), TimerError> {
    let config = WorkoutConfig::from_preset(&args.preset)?;
    let total_secs = scheduled_ticks(&config) + 1;
    println!("The timer is set for {config}.");
    println!(
        "Total running time {}m{:02}s including preparation.",
        total_secs / 60,
        total_secs % 60
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args() -> RunArgs {
        RunArgs {
            preset: None,
            exercises: Some(9),
            sets: Some(2),
            work: Some(30),
            rest: 10,
            set_rest: 20,
            halfway_sound: false,
            json: false,
        }
    }

    #[test]
    fn test_build_config_from_flags() {
        let config = build_config(&run_args()).unwrap();
        assert_eq!(config.exercises, 9);
        assert_eq!(config.sets, 2);
        assert_eq!(config.work_secs, 30);
        assert_eq!(config.rest_between_exercises, 10);
        assert_eq!(config.rest_between_sets, 20);
    }

    #[test]
    fn test_halfway_disabled_for_short_work_phases() {
        let args = RunArgs {
            work: Some(10),
            halfway_sound: true,
            ..run_args()
        };
        let config = build_config(&args).unwrap();
        assert!(!config.halfway_sound);
    }

    #[test]
    fn test_halfway_kept_for_long_work_phases() {
        let args = RunArgs {
            halfway_sound: true,
            ..run_args()
        };
        let config = build_config(&args).unwrap();
        assert!(config.halfway_sound);
    }

    #[test]
    fn test_build_config_from_preset() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "exercises: 4\nsets: 3\nwork_secs: 45").unwrap();

        let args = RunArgs {
            preset: Some(file.path().to_path_buf()),
            exercises: None,
            sets: None,
            work: None,
            ..run_args()
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.exercises, 4);
        assert_eq!(config.sets, 3);
        assert_eq!(config.work_secs, 45);
    }
}
