mod common;

use anyhow::Result;
use assert_cmd::Command;
use common::TestHost;
use dotgather::home::HOME_ENV;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// `dg` with a clean environment pointed at the fixture host
fn dg(host: &TestHost) -> Result<Command> {
    let mut cmd = Command::cargo_bin("dg")?;
    cmd.env_clear()
        .env("PATH", std::env::var_os("PATH").unwrap_or_default())
        .env("HOME", host.home())
        .env("NO_COLOR", "1")
        .env(HOME_ENV, &host.ctx.dotgather_home)
        .current_dir(host.temp_dir.path());
    Ok(cmd)
}

#[test]
fn test_version() -> Result<()> {
    Command::cargo_bin("dg")?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn test_completion_needs_no_home() -> Result<()> {
    let dir = TempDir::new()?;
    Command::cargo_bin("dg")?
        .env_remove(HOME_ENV)
        .current_dir(dir.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dg"));
    Ok(())
}

#[test]
fn test_missing_marker_fails() -> Result<()> {
    let dir = TempDir::new()?;
    Command::cargo_bin("dg")?
        .env_remove(HOME_ENV)
        .env("HOME", dir.path())
        .env("NO_COLOR", "1")
        .current_dir(dir.path())
        .arg("gather")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Not in a dotgather home"));
    Ok(())
}

#[test]
fn test_force_path_declined() -> Result<()> {
    let host = TestHost::new()?;
    host.write_config()?;

    dg(&host)?
        .args(["--force-path", "laptop", "gather"])
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Aborted forcing an explicit path"));
    assert!(!host.ctx.data_dir().exists());
    Ok(())
}

#[test]
fn test_setup_writes_list() -> Result<()> {
    let host = TestHost::new()?;
    host.write_config()?;

    dg(&host)?
        .args(["--force-path", "laptop", "setup"])
        .write_stdin("Y\n~/.bashrc\n/etc/hosts\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Saving gather list file with 2 entries"));

    assert_eq!(
        fs::read_to_string(host.ctx.list_path())?,
        "~/.bashrc\n/etc/hosts\n"
    );
    Ok(())
}

#[test]
fn test_gather_then_disperse() -> Result<()> {
    let host = TestHost::new()?;
    host.write_config()?;
    host.write_home(".bashrc", "original")?;
    host.track(&["~/.bashrc"])?;

    dg(&host)?
        .args(["--force-path", "laptop", "gather"])
        .write_stdin("Y\n")
        .assert()
        .success();
    assert_eq!(fs::read_to_string(host.data_path(".bashrc")?)?, "original");

    host.write_data(".bashrc", "from repo")?;
    dg(&host)?
        .args(["--force-path", "laptop", "disperse"])
        .write_stdin("Y\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Successfully seeded 1 file!"));
    assert_eq!(host.read_home(".bashrc")?, "from repo");
    assert_eq!(fs::read_to_string(host.undo_path(".bashrc")?)?, "original");

    dg(&host)?
        .args(["--force-path", "laptop", "undo-disperse"])
        .write_stdin("Y\n")
        .assert()
        .success();
    assert_eq!(host.read_home(".bashrc")?, "original");
    Ok(())
}

#[test]
fn test_disperse_before_setup() -> Result<()> {
    let host = TestHost::new()?;
    host.write_config()?;

    dg(&host)?
        .args(["--force-path", "laptop", "disperse"])
        .write_stdin("Y\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has not been set up"));
    Ok(())
}

#[test]
fn test_clean_without_undo() -> Result<()> {
    let host = TestHost::new()?;
    host.write_config()?;

    dg(&host)?
        .args(["--force-path", "laptop", "clean"])
        .write_stdin("Y\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("No undo data found!"));
    Ok(())
}
