use anyhow::Result;
use std::path::{Component, Path, PathBuf};

/// Home shorthand accepted in tracked entries and as a leading tree component.
pub const HOME_SHORTHAND: &str = "~";

/// Maps paths between the live filesystem and the trees of a host directory.
///
/// Every tree (`data/`, `undo/`) mirrors the live filesystem below
/// `live_root`: the live file `/home/u/.bashrc` lives at
/// `<tree>/home/u/.bashrc`. A tree path whose first component is `~` maps
/// to the user's home instead, so hand-placed entries stay portable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMap {
    /// Root the trees mirror
    live_root: PathBuf,
    /// Directory `~` expands to
    user_home: PathBuf,
}

impl TreeMap {
    /// Create a mapping rooted at `live_root` with `~` expanding to `user_home`
    #[must_use]
    pub fn new(live_root: impl Into<PathBuf>, user_home: impl Into<PathBuf>) -> Self {
        Self {
            live_root: live_root.into(),
            user_home: user_home.into(),
        }
    }

    /// Root of the live filesystem
    #[must_use]
    pub fn live_root(&self) -> &Path {
        &self.live_root
    }

    /// Directory `~` expands to
    #[must_use]
    pub fn user_home(&self) -> &Path {
        &self.user_home
    }

    /// Expands one tracked-list entry to a live path.
    ///
    /// `~` and `~/...` expand to the user's home; any other relative entry
    /// is taken relative to the home as well.
    #[must_use]
    pub fn expand_entry(&self, entry: &str) -> PathBuf {
        if entry == HOME_SHORTHAND {
            return self.user_home.clone();
        }
        if let Some(rest) = entry.strip_prefix("~/") {
            return self.user_home.join(rest);
        }
        let path = Path::new(entry);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.user_home.join(path)
        }
    }

    /// Path of a live file relative to the live root.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is outside the live root or climbs
    /// with `..`.
    pub fn relative_to_live(&self, live: &Path) -> Result<PathBuf> {
        let relative = live.strip_prefix(&self.live_root).map_err(|_| {
            anyhow::anyhow!(
                "Tracked path {} is outside the live root {}",
                live.display(),
                self.live_root.display()
            )
        })?;

        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            anyhow::bail!("Tracked path {} must not contain `..`", live.display());
        }

        Ok(relative.to_path_buf())
    }

    /// Location of a live file inside `tree_root`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::relative_to_live`].
    pub fn in_tree(&self, tree_root: &Path, live: &Path) -> Result<PathBuf> {
        Ok(tree_root.join(self.relative_to_live(live)?))
    }

    /// Live location of a file found at `relative` inside some tree.
    #[must_use]
    pub fn to_live(&self, relative: &Path) -> PathBuf {
        let mut components = relative.components();
        match components.next() {
            Some(Component::Normal(first)) if first == HOME_SHORTHAND => {
                self.user_home.join(components.as_path())
            }
            _ => self.live_root.join(relative),
        }
    }
}
