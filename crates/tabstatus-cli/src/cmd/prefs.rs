use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use std::path::Path;
use tabstatus_core::{paths, FilePreferences, Preferences};

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum PrefsSubcommand {
    /// Show current preferences
    Show,

    /// Set a preference: enabled, authorized (true/false) or workspace (<id>/none)
    Set { key: String, value: String },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(home: &Path, subcmd: PrefsSubcommand, json: bool) -> anyhow::Result<()> {
    let store = FilePreferences::new(paths::preferences_path(home));
    match subcmd {
        PrefsSubcommand::Show => {
            let prefs = store.load().context("failed to load preferences")?;
            show(&prefs, json)
        }
        PrefsSubcommand::Set { key, value } => {
            let prefs = store
                .update(|p| p.set(&key, &value))
                .with_context(|| format!("failed to set '{key}'"))?;
            if json {
                show(&prefs, true)
            } else {
                println!("Set {key} = {value}.");
                Ok(())
            }
        }
    }
}

fn show(prefs: &Preferences, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(prefs);
    }
    println!("enabled:    {}", prefs.enabled);
    println!("authorized: {}", prefs.authorized);
    println!(
        "workspace:  {}",
        prefs.selected_workspace_id.as_deref().unwrap_or("(first)")
    );
    if !prefs.sync_allowed() {
        println!("Status sync is paused. It needs both enabled and authorized.");
    }
    Ok(())
}
