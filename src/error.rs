//! Error taxonomy for dotgather operations.
//!
//! Every variant is recoverable by the user; none is silently swallowed.
//! Engines raise these inside `anyhow::Error`, so callers that need to tell
//! them apart use `err.downcast_ref::<GatherError>()`.

use std::path::PathBuf;

use thiserror::Error;

/// All handled failures of the gather/disperse/undo/clean cycle.
#[derive(Debug, Error)]
pub enum GatherError {
    /// The tracked-path list or the repository tree is missing.
    #[error("Directory for this host has not been set up ({}). Try `dg setup` or `dg gather` first.", .path.display())]
    NotSetUp {
        /// The missing list or tree.
        path: PathBuf,
    },

    /// A tracked path no longer exists on the live filesystem.
    #[error(
        "No such file {}. Previous gather backed up in {}.",
        .path.display(),
        .temp_backup.display()
    )]
    MissingSource {
        /// Tracked path that could not be read.
        path: PathBuf,
        /// Where the previous repository tree was parked.
        temp_backup: PathBuf,
    },

    /// An existing backup disagrees with the current live target.
    #[error(
        "A different undo state has already been saved for {} (backup {}). Use `dg clean` to clear the existing undo if it is no longer relevant.",
        .target.display(),
        .backup.display()
    )]
    DivergedUndo {
        /// Backup file already on disk.
        backup: PathBuf,
        /// Live file that differs from it.
        target: PathBuf,
    },

    /// Live targets disagree with the repository copy and the user declined to continue.
    #[error("{count} dispersed file(s) have diverged from the gathered copy. You will have to fix this manually.")]
    DivergedState {
        /// Number of diverged files.
        count: usize,
    },

    /// A confirmation prompt was declined.
    #[error("Aborted {0}.")]
    UserAborted(String),

    /// Setup was attempted over an existing host directory.
    #[error("Directory {} already exists.", .0.display())]
    DirectoryAlreadyExists(PathBuf),

    /// A walked tree does not exist.
    #[error("Tree not found: {}", .0.display())]
    TreeNotFound(PathBuf),

    /// The base directory lacks the dotgather sentinel file.
    #[error(
        "Not in a dotgather home dir ({}). Change to it manually or set the DOTGATHERHOME env variable.",
        .0.display()
    )]
    NotDotgatherHome(PathBuf),

    /// A temporary tree from an interrupted gather is still present.
    #[error(
        "A previous gather was interrupted; its data is parked in {}. Restore or remove it before gathering again.",
        .0.display()
    )]
    InterruptedGather(PathBuf),

    /// Neither a host name nor an explicit directory is available.
    #[error("No directory given or host name found, not sure what to do.")]
    NoHostIdentity,

    /// The configured comparator cannot run.
    #[error("Comparator `{program}` is not available: {reason}")]
    ComparatorUnavailable {
        /// Program that was looked up.
        program: String,
        /// Why it could not be used.
        reason: String,
    },
}

/// Returns the [`GatherError`] carried by `err`, if any.
#[must_use]
pub fn gather_error(err: &anyhow::Error) -> Option<&GatherError> {
    err.downcast_ref::<GatherError>()
}
