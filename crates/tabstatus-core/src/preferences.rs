//! User preferences shared with the settings surface.
//!
//! The settings surface owns and writes these; the observer loop only reads
//! them, once per iteration, so a toggle takes effect on the next tick.

use crate::auth::Workspace;
use crate::error::{Result, TabStatusError};
use crate::io::{atomic_write, read_optional};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// First-run consent to read the session and mirror titles.
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub selected_workspace_id: Option<String>,
    /// Workspaces discovered at the last credential acquisition.
    #[serde(default)]
    pub workspaces: Vec<Workspace>,
}

fn default_enabled() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            authorized: false,
            selected_workspace_id: None,
            workspaces: Vec::new(),
        }
    }
}

impl Preferences {
    /// Whether the loop may publish right now.
    pub fn sync_allowed(&self) -> bool {
        self.enabled && self.authorized
    }

    /// Set one preference from its textual form (`enabled`, `authorized`,
    /// `workspace`). `none` clears the workspace selection.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "enabled" => self.enabled = parse_bool(key, value)?,
            "authorized" => self.authorized = parse_bool(key, value)?,
            "workspace" => {
                self.selected_workspace_id = match value {
                    "" | "none" => None,
                    id => Some(id.to_string()),
                }
            }
            other => return Err(TabStatusError::UnknownPreference(other.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(TabStatusError::InvalidPreference {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// PreferenceStore
// ---------------------------------------------------------------------------

/// Read-latest access to preferences.
pub trait PreferenceStore: Send + Sync {
    fn snapshot(&self) -> Preferences;
}

/// `preferences.json` on disk, re-read on every snapshot.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Preferences> {
        match read_optional(&self.path)? {
            Some(data) => Ok(serde_json::from_str(&data)?),
            None => Ok(Preferences::default()),
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        let data = serde_json::to_string_pretty(prefs)?;
        atomic_write(&self.path, data.as_bytes())
    }

    /// Load, apply `f`, save. Returns the saved value.
    pub fn update(&self, f: impl FnOnce(&mut Preferences) -> Result<()>) -> Result<Preferences> {
        let mut prefs = self.load()?;
        f(&mut prefs)?;
        self.save(&prefs)?;
        Ok(prefs)
    }
}

impl PreferenceStore for FilePreferences {
    fn snapshot(&self) -> Preferences {
        self.load().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "unreadable preferences, using defaults: {e}");
            Preferences::default()
        })
    }
}

/// In-process preferences shared between an embedder and the loop.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences(Arc<RwLock<Preferences>>);

impl SharedPreferences {
    pub fn new(prefs: Preferences) -> Self {
        Self(Arc::new(RwLock::new(prefs)))
    }

    pub fn update(&self, f: impl FnOnce(&mut Preferences)) {
        let mut guard = self.0.write().unwrap_or_else(|e| e.into_inner());
        f(&mut *guard);
    }
}

impl PreferenceStore for SharedPreferences {
    fn snapshot(&self) -> Preferences {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
