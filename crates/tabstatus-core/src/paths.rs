use crate::error::{Result, TabStatusError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File names
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "config.yaml";
pub const PREFERENCES_FILE: &str = "preferences.json";

const DEFAULT_HOME: &str = ".config/tabstatus";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Resolve the tabstatus home directory.
///
/// An explicit directory (the `--home` flag / `TABSTATUS_HOME`) wins;
/// otherwise `~/.config/tabstatus`.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    home::home_dir()
        .map(|h| h.join(DEFAULT_HOME))
        .ok_or(TabStatusError::HomeNotFound)
}

pub fn config_path(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

pub fn preferences_path(home: &Path) -> PathBuf {
    home.join(PREFERENCES_FILE)
}
