//! Operation: freeze a resolution into a standalone feed.
//!
//! Resolves the input with the configured resolver, loads the root feed
//! from the cache (or the local path it names), isolates the selected
//! implementation, pins every dependency and writes the result.

use std::io::Write;
use std::path::{Path, PathBuf};

use feedfreeze_core::cache::FeedCache;
use feedfreeze_core::constraints::{attach_requirements, synthesize, FreezePolicy};
use feedfreeze_core::feed::Feed;
use feedfreeze_core::prune::{clean_feed, isolate_implementation, resolve_implementation_id};
use feedfreeze_core::selections::Selections;
use feedfreeze_util::errors::{FreezeError, FreezeResult};
use feedfreeze_util::fs::write_atomic;

use crate::ops_select::{self, ResolveOptions};

/// Command frozen when none is given.
pub const DEFAULT_COMMAND: &str = "run";

/// Where the frozen feed goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Interpret the optional output argument: `-` is stdout, nothing means
    /// [`default_output_path`].
    pub fn from_arg(arg: Option<&str>, input: &str) -> Self {
        match arg {
            Some("-") => OutputTarget::Stdout,
            Some(path) => OutputTarget::File(PathBuf::from(path)),
            None => OutputTarget::File(default_output_path(input)),
        }
    }
}

/// `<dir>/<stem>-freeze.xml` next to a local input; for a URL, the last
/// path segment of the URL in the current directory.
pub fn default_output_path(input: &str) -> PathBuf {
    let is_url = input.contains("://");
    let name = if is_url {
        input.trim_end_matches('/').rsplit('/').next().unwrap_or(input)
    } else {
        input
    };
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "feed".to_string());
    let file_name = format!("{stem}-freeze.xml");
    match path.parent() {
        Some(dir) if !is_url && !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

#[derive(Debug, Clone)]
pub struct FreezeOptions {
    /// Feed URL or local path handed to the resolver.
    pub input: String,
    pub output: OutputTarget,
    pub command: String,
    pub resolve: ResolveOptions,
    pub policy: FreezePolicy,
}

/// Resolve, transform and write.
pub fn freeze(opts: &FreezeOptions) -> FreezeResult<()> {
    let resolve = ResolveOptions {
        command: Some(opts.command.clone()),
        ..opts.resolve.clone()
    };
    let selections = ops_select::resolve(&opts.input, &resolve)?;
    let feed = freeze_selections(&selections, &FeedCache::from_env(), &opts.policy, &opts.command)?;
    write_output(&feed, &opts.output)
}

/// Build the frozen feed for an existing resolution.
///
/// Nothing touches the filesystem except reading the root feed.
pub fn freeze_selections(
    selections: &Selections,
    cache: &FeedCache,
    policy: &FreezePolicy,
    command: &str,
) -> FreezeResult<Feed> {
    let root = selections.root_selection()?;
    let feed_url = root.feed_url();
    tracing::debug!("root feed: {feed_url}");

    let feed_path = cache.locate(feed_url)?;
    let mut feed = Feed::load(&feed_path)?;

    let selected_id = root.id.as_deref().ok_or_else(|| FreezeError::Xml {
        message: format!("selection for {} has no id", root.interface),
    })?;
    let impl_id = resolve_implementation_id(selected_id, feed_url, &feed_path);

    let requirements = synthesize(selections, policy)?;
    let count = requirements.len();
    let active = isolate_implementation(&mut feed, &impl_id)?;
    attach_requirements(active, requirements);
    tracing::debug!("attached {count} requirements to {impl_id}");

    clean_feed(&mut feed, command);
    Ok(feed)
}

/// Write the frozen feed to its target, atomically for files.
pub fn write_output(feed: &Feed, target: &OutputTarget) -> FreezeResult<()> {
    let text = feed.to_output_string()?;
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(FreezeError::from)?;
        }
        OutputTarget::File(path) => {
            write_atomic(path, text.as_bytes())?;
            eprintln!("Wrote frozen feed to {}", path.display());
        }
    }
    Ok(())
}
