use crate::DotgatherContext;
use crate::compare::ContentComparator;
use crate::error::GatherError;
use crate::output;
use crate::prompt::Confirm;
use crate::utils::paths::copy_file;
use crate::walker::{self, FileRecord};
use anyhow::{Context, Result};
use std::fs;
use tracing::{Level, debug, info, span};

/// Totals of an undo run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoReport {
    /// Targets restored from the backup
    pub restored: usize,
    /// Targets skipped because they changed since the disperse
    pub diverged: usize,
    /// Targets already equal to their backup
    pub identical: usize,
    /// Whether the backup tree was removed afterwards
    pub backup_removed: bool,
}

/// How one backup file relates to its live target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Identical,
    Diverged,
    Restore,
}

fn classify(record: &FileRecord, comparator: &dyn ContentComparator) -> Result<Class> {
    if record.target_exists {
        if !comparator.differs(&record.source_path, &record.target_path)? {
            return Ok(Class::Identical);
        }
        // alt_path is the gathered copy when walking the backup tree
        if comparator.differs(&record.alt_path, &record.target_path)? {
            return Ok(Class::Diverged);
        }
    }
    Ok(Class::Restore)
}

/// Every backup record sorted by class, before anything is touched.
#[derive(Debug, Default)]
struct Plan {
    identical: Vec<FileRecord>,
    diverged: Vec<FileRecord>,
    restore: Vec<FileRecord>,
}

fn scan(ctx: &DotgatherContext, comparator: &dyn ContentComparator) -> Result<Option<Plan>> {
    let records = match walker::walk(&ctx.undo_dir(), &ctx.data_dir(), &ctx.map) {
        Ok(records) => records,
        Err(e) if walker::is_tree_not_found(&e) => return Ok(None),
        Err(e) => return Err(e),
    };

    let mut plan = Plan::default();
    for record in records {
        let record = record?;
        let class = classify(&record, comparator)?;
        debug!(target = %record.target_path.display(), ?class, "classified");
        match class {
            Class::Identical => plan.identical.push(record),
            Class::Diverged => plan.diverged.push(record),
            Class::Restore => plan.restore.push(record),
        }
    }
    Ok(Some(plan))
}

/// Restores live targets from the backup tree taken by the last disperse
///
/// All backups are classified first. If any target changed since it was
/// dispersed, the user must confirm before anything is restored; those
/// targets themselves are never overwritten. When nothing diverged the
/// backup tree is removed after restoring.
///
/// # Errors
///
/// Returns an error if:
/// - Diverged targets exist and the user declines
///   ([`GatherError::DivergedState`]); nothing is restored in that case
/// - A comparison or copy fails
pub fn execute(
    ctx: &DotgatherContext,
    comparator: &dyn ContentComparator,
    confirm: &mut dyn Confirm,
) -> Result<UndoReport> {
    let span = span!(Level::INFO, "undo", host = %ctx.host_dir.display());
    let _guard = span.enter();

    let Some(plan) = scan(ctx, comparator)? else {
        output::info("No undo data found!");
        return Ok(UndoReport::default());
    };

    if !plan.diverged.is_empty() {
        output::banner(&format!(
            "The following {} files have diverged:",
            plan.diverged.len()
        ));
        for record in &plan.diverged {
            output::paths(
                "Source (gathered  file) >> ",
                &record.alt_path.display().to_string(),
                &[(
                    "Target (dispersed file) >> ",
                    &record.target_path.display().to_string(),
                )],
            );
        }

        let prompt = format!("you want to still recover {} files", plan.restore.len());
        if !confirm.confirm(&prompt)? {
            return Err(GatherError::DivergedState {
                count: plan.diverged.len(),
            }
            .into());
        }
    }

    if !plan.identical.is_empty() {
        output::banner(&format!(
            "The following {} files are identical no undo needed:",
            plan.identical.len()
        ));
        for record in &plan.identical {
            output::paths(
                "Source (undo      file) >> ",
                &record.source_path.display().to_string(),
                &[(
                    "Target (dispersed file) >> ",
                    &record.target_path.display().to_string(),
                )],
            );
        }
    }

    if !plan.restore.is_empty() {
        output::banner("Reverting dispersed files from undo:");
    }
    for record in &plan.restore {
        copy_file(&record.source_path, &record.target_path)?;
        output::paths(
            "Source file >> ",
            &record.source_path.display().to_string(),
            &[("Target file >> ", &record.target_path.display().to_string())],
        );
    }

    let mut report = UndoReport {
        restored: plan.restore.len(),
        diverged: plan.diverged.len(),
        identical: plan.identical.len(),
        backup_removed: false,
    };

    if plan.diverged.is_empty() {
        let undo_dir = ctx.undo_dir();
        fs::remove_dir_all(&undo_dir)
            .with_context(|| format!("Failed to remove undo {}", undo_dir.display()))?;
        report.backup_removed = true;
    }

    info!(
        restored = report.restored,
        diverged = report.diverged,
        identical = report.identical,
        "undo complete"
    );

    let mut summary = format!("Successfully reverted {} files.", report.restored);
    if report.diverged > 0 {
        summary.push_str(&format!(
            " Undo skipped on {} diverged files!",
            report.diverged
        ));
    }
    if report.identical > 0 {
        summary.push_str(&format!(
            " Undo not needed on {} identical files.",
            report.identical
        ));
    }
    output::success(&summary);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Checksum;
    use tempfile::TempDir;

    fn record(dir: &TempDir, backup: &str, target: Option<&str>, gathered: &str) -> FileRecord {
        let backup_path = dir.path().join("backup");
        let target_path = dir.path().join("target");
        let gathered_path = dir.path().join("gathered");
        std::fs::write(&backup_path, backup).unwrap();
        std::fs::write(&gathered_path, gathered).unwrap();
        if let Some(target) = target {
            std::fs::write(&target_path, target).unwrap();
        }
        FileRecord {
            source_path: backup_path,
            target_exists: target_path.exists(),
            target_path,
            alt_path: gathered_path,
        }
    }

    #[test]
    fn test_classify_identical() -> Result<()> {
        let dir = TempDir::new()?;
        let r = record(&dir, "orig", Some("orig"), "repo");
        assert_eq!(classify(&r, &Checksum)?, Class::Identical);
        Ok(())
    }

    #[test]
    fn test_classify_restore_when_target_matches_repo() -> Result<()> {
        let dir = TempDir::new()?;
        let r = record(&dir, "orig", Some("repo"), "repo");
        assert_eq!(classify(&r, &Checksum)?, Class::Restore);
        Ok(())
    }

    #[test]
    fn test_classify_restore_when_target_missing() -> Result<()> {
        let dir = TempDir::new()?;
        let r = record(&dir, "orig", None, "repo");
        assert_eq!(classify(&r, &Checksum)?, Class::Restore);
        Ok(())
    }

    #[test]
    fn test_classify_diverged() -> Result<()> {
        let dir = TempDir::new()?;
        let r = record(&dir, "orig", Some("edited"), "repo");
        assert_eq!(classify(&r, &Checksum)?, Class::Diverged);
        Ok(())
    }
}
