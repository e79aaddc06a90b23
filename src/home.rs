use crate::error::GatherError;
use crate::mapping::{HOME_SHORTHAND, TreeMap};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Sentinel file marking a directory as a dotgather home.
pub const HOME_MARKER: &str = ".dotgatherhome";

/// Environment variable naming the dotgather home.
pub const HOME_ENV: &str = "DOTGATHERHOME";

/// Resolves the dotgather home from the env value, falling back to `cwd`.
///
/// `~` and `~/...` expand to `user_home`; any other relative value is taken
/// relative to `cwd`. An env value naming a directory that does not exist
/// falls back to `cwd` as well; either way the chosen directory must carry
/// the sentinel.
///
/// # Errors
///
/// Returns [`GatherError::NotDotgatherHome`] if the sentinel is missing.
pub fn resolve_dotgather_home(
    env_value: Option<&str>,
    cwd: &Path,
    user_home: &Path,
) -> Result<PathBuf> {
    let candidate = env_value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| expand_env_value(v, cwd, user_home))
        .filter(|p| p.is_dir())
        .unwrap_or_else(|| cwd.to_path_buf());

    if !candidate.join(HOME_MARKER).exists() {
        return Err(GatherError::NotDotgatherHome(candidate).into());
    }

    Ok(candidate)
}

fn expand_env_value(value: &str, cwd: &Path, user_home: &Path) -> PathBuf {
    if value == HOME_SHORTHAND || value.starts_with("~/") {
        return TreeMap::new("/", user_home).expand_entry(value);
    }
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Host directory for this run: the forced path if given, else the hostname.
///
/// # Errors
///
/// Returns [`GatherError::NoHostIdentity`] if neither is available.
pub fn host_dir(
    dotgather_home: &Path,
    forced: Option<&Path>,
    hostname: Option<String>,
) -> Result<PathBuf> {
    match (forced, hostname) {
        (Some(path), _) => Ok(dotgather_home.join(path)),
        (None, Some(name)) => Ok(dotgather_home.join(name)),
        (None, None) => Err(GatherError::NoHostIdentity.into()),
    }
}

/// The machine's host name.
#[cfg(unix)]
#[must_use]
pub fn hostname() -> Option<String> {
    let mut buf = [0_u8; 256];
    // SAFETY: the pointer and length describe `buf`, which outlives the call.
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..end]).trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// The machine's host name.
#[cfg(not(unix))]
#[must_use]
pub fn hostname() -> Option<String> {
    std::env::var("COMPUTERNAME")
        .ok()
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_env_home_with_marker() -> Result<()> {
        let dir = TempDir::new()?;
        let home = dir.path().join("dots");
        fs::create_dir_all(&home)?;
        fs::write(home.join(HOME_MARKER), "")?;

        let resolved =
            resolve_dotgather_home(home.to_str(), &dir.path().join("elsewhere"), dir.path())?;
        assert_eq!(resolved, home);
        Ok(())
    }

    #[test]
    fn test_env_home_shorthand() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("dots"))?;
        fs::write(dir.path().join("dots").join(HOME_MARKER), "")?;

        let resolved = resolve_dotgather_home(Some("~/dots"), Path::new("/"), dir.path())?;
        assert_eq!(resolved, dir.path().join("dots"));
        Ok(())
    }

    #[test]
    fn test_env_dot_is_cwd() -> Result<()> {
        let dir = TempDir::new()?;
        let work = dir.path().join("work");
        fs::create_dir_all(&work)?;
        fs::write(work.join(HOME_MARKER), "")?;

        let resolved = resolve_dotgather_home(Some("."), &work, &dir.path().join("home"))?;
        assert_eq!(resolved, work.join("."));
        Ok(())
    }

    #[test]
    fn test_relative_env_is_joined_to_cwd() -> Result<()> {
        let dir = TempDir::new()?;
        let work = dir.path().join("work");
        let home = dir.path().join("home");
        fs::create_dir_all(work.join("dots"))?;
        fs::create_dir_all(home.join("dots"))?;
        fs::write(work.join(HOME_MARKER), "")?;
        fs::write(work.join("dots").join(HOME_MARKER), "")?;
        fs::write(home.join("dots").join(HOME_MARKER), "")?;

        let resolved = resolve_dotgather_home(Some("dots"), &work, &home)?;
        assert_eq!(resolved, work.join("dots"));
        Ok(())
    }

    #[test]
    fn test_missing_env_dir_falls_back_to_cwd() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(HOME_MARKER), "")?;

        let resolved =
            resolve_dotgather_home(Some("/no/such/dir"), dir.path(), Path::new("/home/u"))?;
        assert_eq!(resolved, dir.path());
        Ok(())
    }

    #[test]
    fn test_missing_marker() -> Result<()> {
        let dir = TempDir::new()?;
        let err = resolve_dotgather_home(None, dir.path(), dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GatherError>(),
            Some(GatherError::NotDotgatherHome(p)) if p == dir.path()
        ));
        Ok(())
    }

    #[test]
    fn test_host_dir_choice() -> Result<()> {
        let base = Path::new("/dots");
        assert_eq!(
            host_dir(base, None, Some("box".into()))?,
            PathBuf::from("/dots/box")
        );
        assert_eq!(
            host_dir(base, Some(Path::new("shared")), Some("box".into()))?,
            PathBuf::from("/dots/shared")
        );
        assert!(host_dir(base, None, None).is_err());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_hostname_is_not_empty() {
        if let Some(name) = hostname() {
            assert!(!name.is_empty());
            assert!(!name.contains('\0'));
        }
    }
}
