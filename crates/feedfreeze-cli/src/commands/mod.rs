//! Command dispatch and handler modules.

mod freeze;

use miette::Result;

use crate::cli::Cli;

/// Route a parsed CLI invocation to the command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    freeze::exec(cli)
}
