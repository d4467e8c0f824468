//! Operation: run the resolver and parse the selections it prints.

use feedfreeze_core::selections::Selections;
use feedfreeze_util::errors::{FreezeError, FreezeResult};
use feedfreeze_util::process::CommandBuilder;

/// Resolver used when nothing else is configured.
pub const DEFAULT_RESOLVER: &str = "0install";

/// How to invoke the resolver.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub program: String,
    pub command: Option<String>,
    pub refresh: bool,
    pub offline: bool,
    pub verbose: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            program: DEFAULT_RESOLVER.to_string(),
            command: None,
            refresh: false,
            offline: false,
            verbose: false,
        }
    }
}

/// `<program> select --console --xml [flags] <input>`
pub fn resolver_command(input: &str, opts: &ResolveOptions) -> CommandBuilder {
    let mut cmd = CommandBuilder::new(&opts.program).args(["select", "--console", "--xml"]);
    if let Some(ref command) = opts.command {
        cmd = cmd.arg(format!("--command={command}"));
    }
    if opts.refresh {
        cmd = cmd.arg("--refresh");
    }
    if opts.offline {
        cmd = cmd.arg("--offline");
    }
    if opts.verbose {
        cmd = cmd.arg("--verbose");
    }
    cmd.arg(input)
}

/// Resolve `input` (a feed URL or local path) into a set of selections.
pub fn resolve(input: &str, opts: &ResolveOptions) -> FreezeResult<Selections> {
    let stdout = resolver_command(input, opts).exec_checked()?;
    let text = String::from_utf8(stdout).map_err(|e| FreezeError::Resolution {
        message: format!("resolver output is not valid UTF-8: {e}"),
    })?;
    tracing::debug!("Got selections:\n{text}");

    let selections = Selections::parse(&text)?;
    tracing::debug!(
        "resolved {} with {} selections",
        selections.interface,
        selections.selections.len()
    );
    Ok(selections)
}
