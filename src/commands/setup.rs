use crate::DotgatherContext;
use crate::error::GatherError;
use crate::output;
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::process::{Command, Stdio};
use tracing::debug;

/// Collects tracked paths, one per line, until end of input
///
/// # Errors
///
/// Returns an error if reading or prompting fails
pub fn read_entries(mut input: impl BufRead, mut output: impl Write) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    loop {
        write!(output, "Enter file path for collection, CTRL-D to save & exit ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }
        let entry = line.trim();
        if !entry.is_empty() {
            entries.push(entry.to_string());
        }
    }
    Ok(entries)
}

/// Whether the dotgather home is inside a git work tree, or `None` without git
fn git_is_inited(ctx: &DotgatherContext) -> Option<bool> {
    let git = which::which(&ctx.config.core.git).ok()?;
    let output = Command::new(git)
        .args(["rev-parse", "--is-inside-work-tree"])
        .current_dir(&ctx.dotgather_home)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .ok()?;
    Some(String::from_utf8_lossy(&output.stdout).trim() == "true")
}

fn git_init(ctx: &DotgatherContext) -> Result<()> {
    let output = Command::new(&ctx.config.core.git)
        .arg("init")
        .current_dir(&ctx.dotgather_home)
        .stdin(Stdio::null())
        .output()
        .context("Failed to initialize git repository")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git init failed: {}", stderr.trim());
    }
    Ok(())
}

/// Creates the host directory with a tracked-path list read from `input`
///
/// The dotgather home is put under git first if it is not already inside
/// a work tree. Entries are prompted for on `prompt` until end of input.
///
/// # Errors
///
/// Returns an error if:
/// - The host directory exists ([`GatherError::DirectoryAlreadyExists`])
/// - `git init` fails
/// - The directory or list cannot be written
pub fn execute(ctx: &DotgatherContext, input: impl BufRead, prompt: impl Write) -> Result<()> {
    if ctx.host_dir.exists() {
        return Err(GatherError::DirectoryAlreadyExists(ctx.host_dir.clone()).into());
    }

    match git_is_inited(ctx) {
        Some(true) => debug!("dotgather home already tracked by git"),
        Some(false) => {
            git_init(ctx)?;
            output::info("Git tracking initialized ...");
        }
        None => output::warning("git not found; skipping repository initialization."),
    }

    output::info("Create target list of config files that should be gathered:");
    let entries = read_entries(input, prompt)?;

    fs::create_dir_all(&ctx.host_dir)
        .with_context(|| format!("Failed to create {}", ctx.host_dir.display()))?;

    let mut content = entries.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    let list_path = ctx.list_path();
    fs::write(&list_path, content)
        .with_context(|| format!("Failed to write {}", list_path.display()))?;

    output::success(&format!(
        "Saving gather list file with {} entr{}!",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" }
    ));
    Ok(())
}
