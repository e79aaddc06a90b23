//! Enumerates a tree of a host directory and derives, for every file, the
//! three related paths the engines work with.
//!
//! Walking `data/` with `undo/` as the alternate tree yields, per file, the
//! repository copy, its live target and where its backup belongs. Walking
//! `undo/` with `data/` as the alternate inverts the roles.

use crate::error::GatherError;
use crate::mapping::TreeMap;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One file found under a walked tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// The file under the walked tree
    pub source_path: PathBuf,
    /// Its live filesystem location
    pub target_path: PathBuf,
    /// The same relative path under the alternate tree
    pub alt_path: PathBuf,
    /// Whether `target_path` existed when the record was produced
    pub target_exists: bool,
}

/// Lazy, finite walk over the regular files of a tree.
///
/// Children are yielded before their directories; sibling order is by
/// file name but callers must not depend on it.
pub struct Walk<'a> {
    entries: walkdir::IntoIter,
    source_base: PathBuf,
    alt_base: PathBuf,
    map: &'a TreeMap,
}

/// Starts a walk of `source_base`, mirroring each file into `alt_base`.
///
/// Calling it again restarts the enumeration from scratch.
///
/// # Errors
///
/// Returns [`GatherError::TreeNotFound`] if `source_base` does not exist.
pub fn walk<'a>(source_base: &Path, alt_base: &Path, map: &'a TreeMap) -> Result<Walk<'a>> {
    if !source_base.is_dir() {
        return Err(GatherError::TreeNotFound(source_base.to_path_buf()).into());
    }

    let entries = WalkDir::new(source_base)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name()
        .into_iter();

    Ok(Walk {
        entries,
        source_base: source_base.to_path_buf(),
        alt_base: alt_base.to_path_buf(),
        map,
    })
}

/// Returns true when `err` is the walker's "tree not found" condition.
#[must_use]
pub fn is_tree_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<GatherError>(),
        Some(GatherError::TreeNotFound(_))
    )
}

impl Walk<'_> {
    fn record(&self, path: &Path) -> Result<FileRecord> {
        let relative = path.strip_prefix(&self.source_base).with_context(|| {
            format!(
                "Walked file {} is outside {}",
                path.display(),
                self.source_base.display()
            )
        })?;

        let target_path = self.map.to_live(relative);
        let target_exists = target_path.exists();

        Ok(FileRecord {
            source_path: path.to_path_buf(),
            alt_path: self.alt_base.join(relative),
            target_path,
            target_exists,
        })
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<FileRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    return Some(Err(anyhow::Error::new(e).context(format!(
                        "Failed to walk {}",
                        self.source_base.display()
                    ))));
                }
            };

            if entry.file_type().is_file() {
                return Some(self.record(entry.path()));
            }
        }
    }
}
