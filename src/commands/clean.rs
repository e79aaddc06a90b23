use crate::DotgatherContext;
use crate::error::GatherError;
use crate::output;
use crate::prompt::Confirm;
use anyhow::{Context, Result};
use std::fs;
use tracing::info;

/// What a clean run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// The backup tree was deleted
    Removed,
    /// There was no backup tree
    NothingToClean,
}

/// Deletes the backup tree after the user types the confirmation phrase
///
/// # Errors
///
/// Returns an error if:
/// - The confirmation is declined ([`GatherError::UserAborted`])
/// - The tree cannot be removed
pub fn execute(ctx: &DotgatherContext, confirm: &mut dyn Confirm) -> Result<CleanOutcome> {
    let undo_dir = ctx.undo_dir();

    if !undo_dir.exists() {
        output::info("No undo data found!");
        return Ok(CleanOutcome::NothingToClean);
    }

    let prompt = format!("you want to remove undo for {}", undo_dir.display());
    if !confirm.confirm(&prompt)? {
        return Err(GatherError::UserAborted("removing existing undo".to_string()).into());
    }

    remove(&undo_dir)?;
    output::success("Undo files removed.");
    Ok(CleanOutcome::Removed)
}

/// Deletes the backup tree without asking. Returns whether one existed.
///
/// # Errors
///
/// Returns an error if the tree exists but cannot be removed
pub fn remove_silently(ctx: &DotgatherContext) -> Result<bool> {
    let undo_dir = ctx.undo_dir();
    if !undo_dir.exists() {
        return Ok(false);
    }
    remove(&undo_dir)?;
    Ok(true)
}

fn remove(undo_dir: &std::path::Path) -> Result<()> {
    fs::remove_dir_all(undo_dir)
        .with_context(|| format!("Failed to remove undo {}", undo_dir.display()))?;
    info!(undo = %undo_dir.display(), "removed undo tree");
    Ok(())
}
