#![warn(missing_docs)]
#![allow(clippy::arithmetic_side_effects)] // Simple counters cannot overflow

//! # Dotgather - Per-host Dotfile Gathering
//!
//! Dotgather collects a list of dotfiles (or other configs) into a git
//! repository, organized by hostname, and can place them back onto a host
//! with a one-generation undo.
//!
//! ## Layout
//!
//! Each host owns a directory inside the dotgather home:
//!
//! ```text
//! <dotgather home>/
//! ├── .dotgatherhome        sentinel
//! └── <host>/
//!     ├── dotfilelist       tracked paths, one per line
//!     ├── data/             repository tree, mirrors the live filesystem
//!     ├── undo/             backups taken by the last disperse
//!     └── temp_backup/      previous data/ while a gather runs
//! ```
//!
//! ## Architecture
//!
//! - [`mapping`]: the one path-mapping utility shared by every direction
//! - [`walker`]: enumerates a tree into [`walker::FileRecord`]s
//! - [`compare`]: the content equality oracle
//! - [`prompt`]: injected confirmation capability
//! - [`commands`]: setup, gather, disperse, undo and clean
//!
//! ## Example Usage
//!
//! ```no_run
//! use dotgather::DotgatherContext;
//! use dotgather::compare::Checksum;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = DotgatherContext::load("/home/me/dots".into(), "/home/me/dots/laptop".into())?;
//! dotgather::commands::gather::execute(&ctx)?;
//! dotgather::commands::disperse::execute(&ctx, &Checksum)?;
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Commands module containing the engine operations.
pub mod commands;

/// Content comparison oracles.
pub mod compare;

/// Configuration parsing.
pub mod config;

/// Error taxonomy.
pub mod error;

/// Dotgather-home and host identity resolution.
pub mod home;

/// Path mapping between the live filesystem and the host trees.
pub mod mapping;

/// Output formatting.
pub mod output;

/// Confirmation prompts.
pub mod prompt;

/// Utility functions and helpers.
pub mod utils;

/// Tree enumeration.
pub mod walker;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use error::GatherError;
pub use mapping::TreeMap;

/// Current version of the dotgather binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository tree directory name.
pub const DATA_DIR: &str = "data";

/// Backup tree directory name.
pub const UNDO_DIR: &str = "undo";

/// Temporary rename target used while gathering.
pub const TEMP_BACKUP_DIR: &str = "temp_backup";

/// Tracked-path list file name.
pub const GATHER_LIST_NAME: &str = "dotfilelist";

/// Everything an operation needs to know about the host it works on.
///
/// Operations resolve every path through this value; none of them depends
/// on the process working directory.
#[derive(Debug, Clone)]
pub struct DotgatherContext {
    /// Directory holding the sentinel and all host directories.
    pub dotgather_home: PathBuf,

    /// This host's directory.
    pub host_dir: PathBuf,

    /// Mapping between the live filesystem and the host trees.
    pub map: TreeMap,

    /// Loaded configuration settings.
    pub config: config::Config,
}

impl DotgatherContext {
    /// Creates a context with explicit values.
    #[must_use]
    pub fn new(
        dotgather_home: PathBuf,
        host_dir: PathBuf,
        config: config::Config,
        user_home: PathBuf,
    ) -> Self {
        let map = TreeMap::new(config.paths.live_root.clone(), user_home);
        Self {
            dotgather_home,
            host_dir,
            map,
            config,
        }
    }

    /// Creates a context for `host_dir`, loading the configuration of `dotgather_home`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// configuration file is invalid.
    pub fn load(dotgather_home: PathBuf, host_dir: PathBuf) -> Result<Self> {
        let user_home = dirs::home_dir().context("Could not find home directory")?;
        let config = config::Config::load(&config::Config::path_for(&dotgather_home))?;
        Ok(Self::new(dotgather_home, host_dir, config, user_home))
    }

    /// Repository tree.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.host_dir.join(DATA_DIR)
    }

    /// Backup tree.
    #[must_use]
    pub fn undo_dir(&self) -> PathBuf {
        self.host_dir.join(UNDO_DIR)
    }

    /// Temporary tree used during gather.
    #[must_use]
    pub fn temp_backup_dir(&self) -> PathBuf {
        self.host_dir.join(TEMP_BACKUP_DIR)
    }

    /// Tracked-path list.
    #[must_use]
    pub fn list_path(&self) -> PathBuf {
        self.host_dir.join(GATHER_LIST_NAME)
    }
}
