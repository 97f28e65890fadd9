//! Tracing subscriber setup for the CLI.
//!
//! Everything the timer logs goes to stderr, leaving stdout free for cue
//! and tick output. Verbosity comes from repeated `-v` flags, with
//! `INTERVAL_TIMER_LOG_LEVEL` accepting a full filter directive when
//! per-module control is needed.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::cli::args::ColorChoice;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain text, colored when stderr is a terminal.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// Default filter directive for a `-v` count: `warn` with no flags, then
/// `info`, `debug`, and `trace` from three flags up.
#[must_use]
pub const fn verbosity_to_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the process-wide subscriber.
///
/// `INTERVAL_TIMER_LOG_LEVEL`, when set, wins over the `-v` count. Module
/// targets only appear at `-vv` and above; below that the cleaner
/// target-free lines are enough. Repeat calls lose the `try_init` race
/// quietly, so tests can call this freely.
pub fn init_logging(format: LogFormat, verbosity: u8, color: ColorChoice) {
    let filter = EnvFilter::try_from_env("INTERVAL_TIMER_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(verbosity_to_directive(verbosity)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Human => {
            let ansi = match color {
                ColorChoice::Auto => {
                    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
                }
                ColorChoice::Always => true,
                ColorChoice::Never => false,
            };
            let _ = builder.with_ansi(ansi).try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
