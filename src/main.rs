//! `interval-timer` — interval workout countdown timer.

use clap::Parser;

use interval_timer::cli::args::Cli;
use interval_timer::cli::commands;
use interval_timer::error::ExitCode;
use interval_timer::logging::{LogFormat, init_logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(LogFormat::Human, cli.verbose, cli.color);
    }

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
