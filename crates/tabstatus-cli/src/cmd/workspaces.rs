use crate::output::{print_json, print_table};
use anyhow::Context;
use std::path::Path;
use tabstatus_core::{paths, FilePreferences};

pub fn run(home: &Path, json: bool) -> anyhow::Result<()> {
    let prefs = FilePreferences::new(paths::preferences_path(home))
        .load()
        .context("failed to load preferences")?;

    if json {
        return print_json(&serde_json::json!({
            "selected": prefs.selected_workspace_id,
            "workspaces": prefs.workspaces,
        }));
    }

    if prefs.workspaces.is_empty() {
        println!("No workspaces recorded yet. Run `tabstatus run` once to discover them.");
        return Ok(());
    }

    let selected = prefs.selected_workspace_id.as_deref();
    let rows = prefs
        .workspaces
        .iter()
        .map(|w| {
            let mark = if Some(w.id.as_str()) == selected { "*" } else { "" };
            vec![mark.to_string(), w.id.clone(), w.name.clone(), w.domain.clone()]
        })
        .collect();
    print_table(&["", "ID", "NAME", "DOMAIN"], rows);
    Ok(())
}
