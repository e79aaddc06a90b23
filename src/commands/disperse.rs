use crate::DotgatherContext;
use crate::compare::ContentComparator;
use crate::error::GatherError;
use crate::output;
use crate::utils::paths::copy_file;
use crate::walker::{self, FileRecord};
use anyhow::Result;
use tracing::{Level, debug, info, span, warn};

/// Totals of a disperse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisperseReport {
    /// Repository files copied onto their targets
    pub dispersed: usize,
    /// Files whose target already matched
    pub unchanged: usize,
    /// Backups taken of targets about to be overwritten
    pub backups_created: usize,
    /// Files left alone because a matching backup already existed
    pub already_backed_up: usize,
}

/// What to do with one repository file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Target already matches the repository copy
    Unchanged,
    /// A backup equal to the target exists; the file is left as it is
    AlreadyBackedUp,
    /// Back up the target, then overwrite it
    BackupAndCopy,
    /// Overwrite (or create) the target
    Copy,
}

fn plan(record: &FileRecord, comparator: &dyn ContentComparator) -> Result<Step> {
    if !comparator.differs(&record.source_path, &record.target_path)? {
        return Ok(Step::Unchanged);
    }
    if !record.target_exists {
        return Ok(Step::Copy);
    }
    if !record.alt_path.exists() {
        return Ok(Step::BackupAndCopy);
    }
    if comparator.differs(&record.alt_path, &record.target_path)? {
        return Err(GatherError::DivergedUndo {
            backup: record.alt_path.clone(),
            target: record.target_path.clone(),
        }
        .into());
    }
    Ok(Step::AlreadyBackedUp)
}

/// Copies every repository file onto its live target, backing up what it overwrites
///
/// Files are handled one at a time and the run stops at the first error;
/// files dispersed before it stay dispersed, and re-running only acts on
/// files that still differ.
///
/// # Errors
///
/// Returns an error if:
/// - The repository tree does not exist ([`GatherError::NotSetUp`])
/// - A backup already exists for a target and differs from it
///   ([`GatherError::DivergedUndo`])
/// - A comparison or copy fails
pub fn execute(ctx: &DotgatherContext, comparator: &dyn ContentComparator) -> Result<DisperseReport> {
    let span = span!(Level::INFO, "disperse", host = %ctx.host_dir.display());
    let _guard = span.enter();

    let data_dir = ctx.data_dir();
    let records = walker::walk(&data_dir, &ctx.undo_dir(), &ctx.map).map_err(|e| {
        if walker::is_tree_not_found(&e) {
            GatherError::NotSetUp { path: data_dir.clone() }.into()
        } else {
            e
        }
    })?;

    let mut report = DisperseReport::default();
    for record in records {
        let record = record?;
        let source = record.source_path.display().to_string();
        let target = record.target_path.display().to_string();

        output::paths("Source >> ", &source, &[("Target >> ", &target)]);

        let step = plan(&record, comparator)?;
        debug!(source = %source, target = %target, ?step, "planned");

        match step {
            Step::Unchanged => {
                output::info("These two files are the same, skipping dispersal.");
                report.unchanged += 1;
                continue;
            }
            Step::AlreadyBackedUp => {
                warn!(target = %target, "undo already holds this target; not dispersed");
                output::warning(&format!(
                    "Skipping {target}: its undo already exists, so it was not dispersed."
                ));
                report.already_backed_up += 1;
                continue;
            }
            Step::BackupAndCopy => {
                output::banner("Target exists, backing up for undo ...");
                copy_file(&record.target_path, &record.alt_path)?;
                output::paths(
                    "Undo >>>> ",
                    &record.alt_path.display().to_string(),
                    &[("Target >> ", &target)],
                );
                report.backups_created += 1;
            }
            Step::Copy => {}
        }

        copy_file(&record.source_path, &record.target_path)?;
        report.dispersed += 1;
        output::info("File dispersed.");
    }

    info!(
        dispersed = report.dispersed,
        unchanged = report.unchanged,
        backups = report.backups_created,
        "disperse complete"
    );
    output::success(&format!(
        "Successfully seeded {} file{}!",
        report.dispersed,
        if report.dispersed == 1 { "" } else { "s" }
    ));

    Ok(report)
}
