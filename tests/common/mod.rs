#![allow(dead_code)]

use anyhow::Result;
use dotgather::DotgatherContext;
use dotgather::config::{ComparatorKind, Config};
use dotgather::home::HOME_MARKER;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Host fixture: a fake live filesystem plus a dotgather home with one host directory
pub struct TestHost {
    pub temp_dir: TempDir,
    pub ctx: DotgatherContext,
}

impl TestHost {
    /// Live root at `<tmp>/live`, user home at `<live>/home/me`, host `laptop`
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let live_root = temp_dir.path().join("live");
        let user_home = live_root.join("home/me");
        let dotgather_home = temp_dir.path().join("dots");
        fs::create_dir_all(&user_home)?;
        fs::create_dir_all(&dotgather_home)?;
        fs::write(dotgather_home.join(HOME_MARKER), "")?;

        let mut config = Config::default();
        config.core.comparator = ComparatorKind::Checksum;
        config.paths.live_root = live_root;

        let ctx = DotgatherContext::new(
            dotgather_home.clone(),
            dotgather_home.join("laptop"),
            config,
            user_home,
        );
        Ok(Self { temp_dir, ctx })
    }

    pub fn home(&self) -> &Path {
        self.ctx.map.user_home()
    }

    pub fn live_root(&self) -> &Path {
        self.ctx.map.live_root()
    }

    /// Writes a file below the user home
    pub fn write_home(&self, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.home().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn read_home(&self, rel: &str) -> Result<String> {
        Ok(fs::read_to_string(self.home().join(rel))?)
    }

    /// Writes the tracked-path list
    pub fn track(&self, entries: &[&str]) -> Result<()> {
        fs::create_dir_all(&self.ctx.host_dir)?;
        let mut content = entries.join("\n");
        content.push('\n');
        fs::write(self.ctx.list_path(), content)?;
        Ok(())
    }

    /// Repository copy of a file below the user home
    pub fn data_path(&self, rel: &str) -> Result<PathBuf> {
        self.ctx
            .map
            .in_tree(&self.ctx.data_dir(), &self.home().join(rel))
    }

    /// Backup copy of a file below the user home
    pub fn undo_path(&self, rel: &str) -> Result<PathBuf> {
        self.ctx
            .map
            .in_tree(&self.ctx.undo_dir(), &self.home().join(rel))
    }

    /// Places a file straight into the repository tree
    pub fn write_data(&self, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.data_path(rel)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Writes a config file the `dg` binary will pick up
    pub fn write_config(&self) -> Result<PathBuf> {
        let path = self.ctx.dotgather_home.join(dotgather::config::CONFIG_FILE_NAME);
        let live_root = self.live_root().display().to_string();
        fs::write(
            &path,
            format!("[core]\ncomparator = \"checksum\"\n\n[paths]\nlive_root = {live_root:?}\n"),
        )?;
        Ok(path)
    }
}
