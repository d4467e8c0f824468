//! Lookup of downloaded feeds in the per-user 0install cache.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use feedfreeze_util::errors::FreezeError;

/// Cache namespace shared with the resolver.
pub const CACHE_NAMESPACE: &str = "0install.net";
/// Sub-directory holding cached feeds, one file per escaped URL.
pub const INTERFACES_DIR: &str = "interfaces";

/// The set of cache directories searched for feeds, most specific first.
#[derive(Debug, Clone)]
pub struct FeedCache {
    dirs: Vec<PathBuf>,
}

impl FeedCache {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// `$XDG_CACHE_HOME` (default `~/.cache`) followed by `$XDG_CACHE_DIRS`
    /// (default `/var/cache`).
    pub fn from_env() -> Self {
        let mut dirs = Vec::new();
        match non_empty_var("XDG_CACHE_HOME") {
            Some(home) => dirs.push(PathBuf::from(home)),
            None => dirs.push(home_dir().join(".cache")),
        }
        match non_empty_var("XDG_CACHE_DIRS") {
            Some(extra) => dirs.extend(std::env::split_paths(&extra)),
            None => dirs.push(PathBuf::from("/var/cache")),
        }
        Self { dirs }
    }

    /// Where `url` would be cached under `dir`.
    pub fn feed_path_in(dir: &Path, url: &str) -> PathBuf {
        dir.join(CACHE_NAMESPACE)
            .join(INTERFACES_DIR)
            .join(escape(url))
    }

    /// Find the file holding the feed at `url`.
    ///
    /// Absolute paths are local feeds and are returned unchanged.
    pub fn locate(&self, url: &str) -> Result<PathBuf, FreezeError> {
        if Path::new(url).is_absolute() {
            tracing::debug!("local feed: {url}");
            return Ok(PathBuf::from(url));
        }
        for dir in &self.dirs {
            let candidate = Self::feed_path_in(dir, url);
            if candidate.is_file() {
                tracing::debug!("cached feed: {}", candidate.display());
                return Ok(candidate);
            }
        }
        Err(FreezeError::NotCached {
            url: url.to_string(),
        })
    }
}

/// Escape a URL into a single file name: every byte outside
/// `[A-Za-z0-9._-]` becomes `%xx` with lowercase hex digits.
pub fn escape(url: &str) -> String {
    let mut out = String::with_capacity(url.len() * 2);
    for b in url.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02x}");
        }
    }
    out
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}
