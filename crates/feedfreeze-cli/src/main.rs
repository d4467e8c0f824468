//! feedfreeze CLI binary.
//!
//! This is the entry point for the `feedfreeze` command-line tool. It parses
//! arguments with `clap`, initializes logging via `tracing` on stderr, and
//! dispatches to the freeze command handler.

mod cli;
mod commands;

use miette::Result;

fn main() -> Result<()> {
    let args = cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    commands::dispatch(args)
}
