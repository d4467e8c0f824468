//! CLI argument definitions for feedfreeze.
//!
//! Uses `clap` derive macros. The tool has a single command; the handler
//! lives in [`super::commands`].

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "feedfreeze",
    version,
    about = "Freeze a 0install dependency resolution into a standalone feed",
    long_about = "Runs the resolver on INPUT, then rewrites the application's feed so that it \
                  keeps only the selected implementation and pins a version range for every \
                  dependency that was chosen."
)]
pub struct Cli {
    /// Feed URL or local feed file to resolve
    pub input: String,

    /// Output file (`-` for stdout) [default: <input-dir>/<input-stem>-freeze.xml]
    pub output: Option<String>,

    /// Fetch fresh copies of all used feeds
    #[arg(short, long)]
    pub refresh: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Don't check for updates
    #[arg(short, long)]
    pub offline: bool,

    /// Command to freeze; it is renamed to `run` in the output
    #[arg(short, long, default_value = "run")]
    pub command: String,

    /// Version components to keep; negative values count from the end
    /// [default: from config, else -1]
    #[arg(long, allow_negative_numbers = true, value_name = "N")]
    pub components: Option<i32>,

    /// Pin each dependency to exactly the selected version
    #[arg(long)]
    pub exact: bool,

    /// Interface to leave unconstrained (repeatable)
    #[arg(long, value_name = "URL")]
    pub ignore: Vec<String>,

    /// Interface that may be frozen from a local feed (repeatable)
    #[arg(long, value_name = "URL")]
    pub allow_local: Vec<String>,

    /// Resolver program [default: from config, else 0install]
    #[arg(long, env = "FEEDFREEZE_RESOLVER", value_name = "PROGRAM")]
    pub resolver: Option<String>,
}

/// Parse CLI arguments from the process environment.
pub fn parse() -> Cli {
    Cli::parse()
}
