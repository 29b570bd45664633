pub mod config;
pub mod prefs;
pub mod run;
pub mod sanitize;
pub mod workspaces;
