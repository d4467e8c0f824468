use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use feedfreeze_util::errors::FreezeError;

use crate::version::DEFAULT_COMPONENTS;

/// User configuration loaded from `~/.feedfreeze/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreezeConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub freeze: FreezeDefaults,
}

/// Resolver settings from `[resolver]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> String {
    "0install".to_string()
}

/// Defaults for freezing from `[freeze]`; command-line flags win.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreezeDefaults {
    #[serde(default = "default_components")]
    pub components: i32,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default, rename = "allow-local")]
    pub allow_local: Vec<String>,
}

impl Default for FreezeDefaults {
    fn default() -> Self {
        Self {
            components: default_components(),
            ignore: Vec::new(),
            allow_local: Vec::new(),
        }
    }
}

fn default_components() -> i32 {
    DEFAULT_COMPONENTS
}

impl FreezeConfig {
    /// Load `~/.feedfreeze/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> Result<Self, FreezeError> {
        let path = Self::default_path();
        if path.is_file() {
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, FreezeError> {
        let content = std::fs::read_to_string(path).map_err(|e| FreezeError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| FreezeError::Config {
            message: format!("Failed to parse {}: {e}", path.display()),
        })
    }

    /// Returns the default path to the config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the feedfreeze data directory (`~/.feedfreeze/`).
pub fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".feedfreeze")
}
