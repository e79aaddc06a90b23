use crate::DotgatherContext;
use crate::error::GatherError;
use crate::output;
use crate::utils::paths::{copy_file, copy_tree};
use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{Level, debug, info, span};

/// Totals of a gather run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatherReport {
    /// Tracked entries processed
    pub entries: usize,
    /// Files copied into the repository tree
    pub files: usize,
}

/// Reads the tracked-path list: one entry per line, trimmed, blanks skipped
///
/// # Errors
///
/// Returns [`GatherError::NotSetUp`] if the list does not exist
pub fn read_tracked_list(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(GatherError::NotSetUp {
                path: path.to_path_buf(),
            }
            .into());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rebuilds the repository tree from the live files named in the tracked list
///
/// The previous tree is parked in `temp_backup/` for the duration of the
/// run and deleted only once every entry has been copied. Any backup tree
/// is removed before copying starts.
///
/// # Errors
///
/// Returns an error if:
/// - The tracked list is missing ([`GatherError::NotSetUp`])
/// - An earlier gather left `temp_backup/` behind ([`GatherError::InterruptedGather`])
/// - A tracked path does not exist ([`GatherError::MissingSource`]); files
///   copied before it stay copied and `temp_backup/` is kept
/// - Any copy fails
pub fn execute(ctx: &DotgatherContext) -> Result<GatherReport> {
    let span = span!(Level::INFO, "gather", host = %ctx.host_dir.display());
    let _guard = span.enter();

    let entries = read_tracked_list(&ctx.list_path())?;

    let data_dir = ctx.data_dir();
    let temp_dir = ctx.temp_backup_dir();

    // nothing is touched while an earlier run's tree is still parked
    if temp_dir.exists() {
        return Err(GatherError::InterruptedGather(temp_dir).into());
    }

    output::info("Any existing undo will be removed as part of gathering new dotfile crop.");
    if super::clean::remove_silently(ctx)? {
        output::info("Previous undo removed.");
    }

    if data_dir.exists() {
        fs::rename(&data_dir, &temp_dir).with_context(|| {
            format!(
                "Failed to move {} to {}",
                data_dir.display(),
                temp_dir.display()
            )
        })?;
        debug!(temp = %temp_dir.display(), "parked previous data tree");
    }
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let mut report = GatherReport::default();
    for entry in &entries {
        let source = ctx.map.expand_entry(entry);
        let dest = ctx.map.in_tree(&data_dir, &source)?;

        output::paths(
            "Target >> ",
            &dest.display().to_string(),
            &[("Source >> ", &source.display().to_string())],
        );

        let metadata = match fs::metadata(&source) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(GatherError::MissingSource {
                    path: source,
                    temp_backup: temp_dir,
                }
                .into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", source.display()));
            }
        };

        let copied = if metadata.is_dir() {
            copy_tree(&source, &dest, &ctx.dotgather_home)?
        } else {
            copy_file(&source, &dest)?;
            1
        };

        debug!(source = %source.display(), files = copied, "gathered entry");
        report.entries += 1;
        report.files += copied;
    }

    if temp_dir.exists() {
        fs::remove_dir_all(&temp_dir)
            .with_context(|| format!("Failed to remove {}", temp_dir.display()))?;
    }

    info!(entries = report.entries, files = report.files, "gather complete");
    output::success(&format!(
        "Gathered {} file{} from {} tracked path{}.",
        report.files,
        if report.files == 1 { "" } else { "s" },
        report.entries,
        if report.entries == 1 { "" } else { "s" }
    ));

    Ok(report)
}
