use std::collections::BTreeSet;

use miette::Result;

use feedfreeze_core::config::FreezeConfig;
use feedfreeze_core::constraints::FreezePolicy;
use feedfreeze_core::version::RangeMode;
use feedfreeze_ops::ops_freeze::{self, FreezeOptions, OutputTarget};
use feedfreeze_ops::ops_select::ResolveOptions;
use feedfreeze_util::errors::FreezeError;

use crate::cli::Cli;

pub fn exec(cli: Cli) -> Result<()> {
    if cli.input.trim().is_empty() {
        return Err(FreezeError::Argument {
            message: "input feed must not be empty".to_string(),
        }
        .into());
    }
    let config = FreezeConfig::load()?;

    let components = cli.components.unwrap_or(config.freeze.components);
    let mode = RangeMode::new(cli.exact, components)?;

    let policy = FreezePolicy {
        mode,
        ignore: union(config.freeze.ignore, cli.ignore),
        allow_local: union(config.freeze.allow_local, cli.allow_local),
    };
    tracing::debug!("freeze policy: {policy:?}");

    let opts = FreezeOptions {
        output: OutputTarget::from_arg(cli.output.as_deref(), &cli.input),
        input: cli.input,
        command: cli.command,
        resolve: ResolveOptions {
            program: cli.resolver.unwrap_or(config.resolver.program),
            command: None,
            refresh: cli.refresh,
            offline: cli.offline,
            verbose: cli.verbose,
        },
        policy,
    };
    ops_freeze::freeze(&opts)
}

fn union(from_config: Vec<String>, from_cli: Vec<String>) -> BTreeSet<String> {
    from_config.into_iter().chain(from_cli).collect()
}
