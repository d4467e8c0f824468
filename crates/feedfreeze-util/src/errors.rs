use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all feedfreeze operations.
#[derive(Debug, Error, Diagnostic)]
pub enum FreezeError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad command-line usage.
    #[error("Invalid arguments: {message}")]
    #[diagnostic(help("Run `feedfreeze --help` for usage"))]
    Argument { message: String },

    /// The external resolver failed or could not be started.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// A lookup that must match exactly one element matched zero or several.
    #[error("expected exactly one {what}, found {count}")]
    Lookup { what: String, count: usize },

    /// A feed URL is not present in the local feed cache.
    #[error("Feed not cached: {url}")]
    #[diagnostic(help("Run the resolver without --offline to download it first"))]
    NotCached { url: String },

    /// A dependency comes from a local feed that was not explicitly allowed.
    #[error("Dependency {interface} uses local feed {feed}")]
    #[diagnostic(help(
        "Local feeds are not reproducible on other machines; pass --allow-local=<URL> to freeze it anyway"
    ))]
    LocalFeedNotAllowed { interface: String, feed: String },

    /// A version string could not be parsed.
    #[error("Invalid version '{input}': {message}")]
    Parse { input: String, message: String },

    /// An option value is out of its accepted range.
    #[error("Invalid option: {message}")]
    InvalidOption { message: String },

    /// A feed or selections document is malformed.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// The user configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.feedfreeze/config.toml for syntax errors"))]
    Config { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type FreezeResult<T> = miette::Result<T>;
