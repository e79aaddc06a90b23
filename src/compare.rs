//! Content equality oracles used for every skip decision.
//!
//! Presence is settled before any content is looked at: two absent paths
//! are "not different", exactly one absent path is "different".

use crate::config::{ComparatorKind, Config};
use crate::error::GatherError;
use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;
use xxhash_rust::xxh3::Xxh3;

/// Answers "are these two paths content-different?".
pub trait ContentComparator {
    /// Returns true if `a` and `b` differ.
    ///
    /// # Errors
    ///
    /// Returns an error if the comparison itself cannot be carried out.
    fn differs(&self, a: &Path, b: &Path) -> Result<bool>;
}

impl<C: ContentComparator + ?Sized> ContentComparator for Box<C> {
    fn differs(&self, a: &Path, b: &Path) -> Result<bool> {
        (**self).differs(a, b)
    }
}

/// Settles the comparison from existence alone when possible.
fn by_presence(a: &Path, b: &Path) -> Option<bool> {
    match (a.exists(), b.exists()) {
        (true, true) => None,
        (false, false) => Some(false),
        _ => Some(true),
    }
}

/// Compares with `git diff --no-index`, which ignores index and tracking state.
#[derive(Debug, Clone)]
pub struct GitDiff {
    program: PathBuf,
}

impl GitDiff {
    /// Locate `program` on `PATH`
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::ComparatorUnavailable`] if it cannot be found.
    pub fn new(program: &str) -> Result<Self> {
        let program = which::which(program).map_err(|e| GatherError::ComparatorUnavailable {
            program: program.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { program })
    }
}

impl ContentComparator for GitDiff {
    fn differs(&self, a: &Path, b: &Path) -> Result<bool> {
        if let Some(answer) = by_presence(a, b) {
            return Ok(answer);
        }

        let status = Command::new(&self.program)
            .args(["diff", "--no-index", "--quiet", "--"])
            .arg(b)
            .arg(a)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .with_context(|| format!("Failed to run {}", self.program.display()))?;

        debug!(a = %a.display(), b = %b.display(), code = ?status.code(), "git diff finished");

        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(anyhow::anyhow!(
                "git diff failed comparing {} and {} ({status})",
                a.display(),
                b.display()
            )),
        }
    }
}

/// Compares file sizes, then xxh3 digests of the contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checksum;

impl Checksum {
    fn digest(path: &Path) -> Result<u128> {
        let mut file = fs::File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mut hasher = Xxh3::new();
        let mut buffer = [0_u8; 64 * 1024];
        loop {
            let read = file
                .read(&mut buffer)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }
        Ok(hasher.digest128())
    }
}

impl ContentComparator for Checksum {
    fn differs(&self, a: &Path, b: &Path) -> Result<bool> {
        if let Some(answer) = by_presence(a, b) {
            return Ok(answer);
        }

        let len_a = fs::metadata(a)
            .with_context(|| format!("Failed to read metadata for {}", a.display()))?
            .len();
        let len_b = fs::metadata(b)
            .with_context(|| format!("Failed to read metadata for {}", b.display()))?
            .len();
        if len_a != len_b {
            return Ok(true);
        }

        Ok(Self::digest(a)? != Self::digest(b)?)
    }
}

/// Builds the comparator selected by the configuration.
///
/// # Errors
///
/// Returns an error if the git comparator is selected and git is missing.
pub fn from_config(config: &Config) -> Result<Box<dyn ContentComparator>> {
    Ok(match config.core.comparator {
        ComparatorKind::Git => Box::new(GitDiff::new(&config.core.git)?),
        ComparatorKind::Checksum => Box::new(Checksum),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn pair(a: Option<&str>, b: Option<&str>) -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let pa = dir.path().join("a");
        let pb = dir.path().join("b");
        if let Some(content) = a {
            fs::write(&pa, content).unwrap();
        }
        if let Some(content) = b {
            fs::write(&pb, content).unwrap();
        }
        (dir, pa, pb)
    }

    #[rstest]
    #[case(Some("same\n"), Some("same\n"), false)]
    #[case(Some("one\n"), Some("two\n"), true)]
    #[case(Some("abc"), Some("abcd"), true)]
    #[case(Some("x"), None, true)]
    #[case(None, Some("x"), true)]
    #[case(None, None, false)]
    fn test_checksum(#[case] a: Option<&str>, #[case] b: Option<&str>, #[case] expected: bool) {
        let (_dir, pa, pb) = pair(a, b);
        assert_eq!(Checksum.differs(&pa, &pb).unwrap(), expected);
    }

    #[test]
    fn test_checksum_same_length_different_bytes() {
        let (_dir, pa, pb) = pair(Some("color=red\n"), Some("color=tan\n"));
        assert!(Checksum.differs(&pa, &pb).unwrap());
    }

    #[test]
    fn test_git_missing_program() {
        let err = GitDiff::new("definitely-not-a-git-binary-xyz").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GatherError>(),
            Some(GatherError::ComparatorUnavailable { .. })
        ));
    }

    #[test]
    fn test_git_diff_when_available() {
        let Ok(git) = GitDiff::new("git") else {
            return;
        };
        let (_dir, pa, pb) = pair(Some("same\n"), Some("same\n"));
        assert!(!git.differs(&pa, &pb).unwrap());

        fs::write(&pb, "changed\n").unwrap();
        assert!(git.differs(&pa, &pb).unwrap());
    }

    #[test]
    fn test_from_config_checksum() {
        let mut config = Config::default();
        config.core.comparator = ComparatorKind::Checksum;
        let comparator = from_config(&config).unwrap();
        let (_dir, pa, pb) = pair(None, None);
        assert!(!comparator.differs(&pa, &pb).unwrap());
    }
}
