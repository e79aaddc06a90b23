//! Configuration file support.
//!
//! The file is optional and lives at `<dotgather home>/dotgather.toml`
//! unless `DOTGATHER_CONFIG_PATH` points elsewhere. Every key has a default
//! and unknown keys are rejected.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the dotgather home.
pub const CONFIG_FILE_NAME: &str = "dotgather.toml";

/// Environment variable overriding the configuration file location.
pub const CONFIG_PATH_ENV: &str = "DOTGATHER_CONFIG_PATH";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Comparison settings (`[core]`)
    #[serde(default)]
    pub core: CoreConfig,

    /// Filesystem layout settings (`[paths]`)
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Settings for the content comparator.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// Equality oracle used for skip decisions
    #[serde(default)]
    pub comparator: ComparatorKind,
    /// Program run by the git comparator
    #[serde(default = "default_git")]
    pub git: String,
}

/// Which content comparator to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparatorKind {
    /// `git diff --no-index`
    #[default]
    Git,
    /// File size, then xxh3 digest
    Checksum,
}

/// Where the trees are anchored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Root the repository tree mirrors; `/` on a normal host
    #[serde(default = "default_live_root")]
    pub live_root: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            comparator: ComparatorKind::Git,
            git: default_git(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            live_root: default_live_root(),
        }
    }
}

impl Config {
    /// Load configuration from a file, falling back to defaults when it is absent
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML or unknown keys
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Resolve the configuration path for a dotgather home, honouring the env override
    #[must_use]
    pub fn path_for(dotgather_home: &Path) -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| dotgather_home.join(CONFIG_FILE_NAME), PathBuf::from)
    }
}

// Default functions for serde
fn default_git() -> String {
    "git".to_string()
}

fn default_live_root() -> PathBuf {
    PathBuf::from("/")
}
