//! Command-line interface definitions for dotgather.
//!
//! The definitions are shared between the main binary and build tools
//! (like xtask) for man page generation.

#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for dotgather.
#[derive(Parser)]
#[command(
    name = "dg",
    version = crate::VERSION,
    about = "Collects a list of dot files (or other configs) in a git repo. Organized by hostname.",
    long_about = "Collects a list of dot files (or other configs) in a git repo, organized by hostname, \
                  and places them back on a host with a one-generation undo."
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Operate on an explicit host directory instead of the host name.
    /// Don't do this unless you really know what it does.
    #[arg(long, global = true, value_name = "DIR")]
    pub force_path: Option<PathBuf>,

    /// Dotgather home directory (must contain .dotgatherhome)
    #[arg(long = "home", global = true, env = crate::home::HOME_ENV, value_name = "DIR")]
    pub dotgather_home: Option<String>,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Set up a dotgather directory for this machine and create its list of tracked paths
    Setup,

    /// Collect dotfiles for this host
    Gather,

    /// Place collected dotfiles for this host in their live locations, keeping an undo backup
    Disperse,

    /// Undo the last disperse for this host
    #[command(alias = "undo-disperse")]
    Undo,

    /// Clear the undo backup of the last disperse for this host
    Clean,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
