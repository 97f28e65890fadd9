//! CLI argument definitions.
//!
//! All clap derive structs for `interval-timer` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Interval workout countdown timer.
#[derive(Parser, Debug)]
#[command(name = "interval-timer", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "INTERVAL_TIMER_COLOR")]
    pub color: ColorChoice,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a workout countdown to completion (Ctrl+C stops it).
    Run(RunArgs),

    /// Validate a workout preset without running it.
    Validate(ValidateArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a YAML workout preset.
    #[arg(
        short,
        long,
        env = "INTERVAL_TIMER_PRESET",
        conflicts_with_all = ["exercises", "sets", "work", "rest", "set_rest", "halfway_sound"]
    )]
    pub preset: Option<PathBuf>,

    /// Number of exercises per set.
    #[arg(short, long, required_unless_present = "preset")]
    pub exercises: Option<u32>,

    /// Number of sets.
    #[arg(short, long, required_unless_present = "preset")]
    pub sets: Option<u32>,

    /// Work seconds per exercise.
    #[arg(short, long, required_unless_present = "preset")]
    pub work: Option<u32>,

    /// Rest seconds between exercises.
    #[arg(long, default_value_t = 0)]
    pub rest: u32,

    /// Rest seconds between sets.
    #[arg(long, default_value_t = 0)]
    pub set_rest: u32,

    /// Ask announcers for a halfway cue during work phases.
    #[arg(long)]
    pub halfway_sound: bool,

    /// Print each tick as a JSON line instead of announcer cues.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the YAML workout preset to check.
    #[arg(short, long, env = "INTERVAL_TIMER_PRESET")]
    pub preset: PathBuf,
}

/// Color output control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always emit ANSI colors.
    Always,
    /// Never emit ANSI colors.
    Never,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_with_explicit_values() {
        let cli = Cli::try_parse_from([
            "interval-timer",
            "run",
            "--exercises",
            "9",
            "--sets",
            "2",
            "--work",
            "30",
            "--rest",
            "10",
            "--set-rest",
            "20",
            "--halfway-sound",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.exercises, Some(9));
        assert_eq!(args.sets, Some(2));
        assert_eq!(args.work, Some(30));
        assert_eq!(args.rest, 10);
        assert_eq!(args.set_rest, 20);
        assert!(args.halfway_sound);
        assert!(!args.json);
    }

    #[test]
    fn test_run_requires_counts_without_preset() {
        let result = Cli::try_parse_from(["interval-timer", "run", "--sets", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preset_conflicts_with_explicit_values() {
        let result = Cli::try_parse_from([
            "interval-timer",
            "run",
            "--preset",
            "workout.yaml",
            "--exercises",
            "9",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_preset_alone_is_accepted() {
        let cli =
            Cli::try_parse_from(["interval-timer", "run", "--preset", "workout.yaml"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.preset.is_some());
        assert_eq!(args.rest, 0);
    }
}
