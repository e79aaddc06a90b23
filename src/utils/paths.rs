use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Ensures parent directories exist for a given path
///
/// # Errors
///
/// Returns an error if the parent directories cannot be created
pub fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
    {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create parent directories for {}", path.display())
        })?;
    }
    Ok(())
}

/// Copies one file, creating the destination's parents and keeping permissions
///
/// # Errors
///
/// Returns an error if the parents cannot be created or the copy fails
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    ensure_parent_dirs(to)?;
    fs::copy(from, to)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;
    Ok(())
}

/// Copies a directory tree into `to`, merging with whatever is already there.
///
/// Symlinks are followed, so the copy holds regular files only. Anything
/// below `skip` is left out, so a tracked directory that contains the
/// dotgather home does not copy the repository into itself. Returns the
/// number of files copied.
///
/// # Errors
///
/// Returns an error if any entry cannot be read or written, including a
/// dangling symlink
pub fn copy_tree(from: &Path, to: &Path, skip: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(skip))
    {
        let entry = entry.with_context(|| format!("Failed to walk {}", from.display()))?;
        let relative = entry.path().strip_prefix(from).with_context(|| {
            format!(
                "Walked entry {} is outside {}",
                entry.path().display(),
                from.display()
            )
        })?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory {}", target.display()))?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}
