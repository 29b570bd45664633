#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tabstatus(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tabstatus").unwrap();
    cmd.current_dir(dir.path())
        .env("TABSTATUS_HOME", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn prefs_json(dir: &TempDir) -> serde_json::Value {
    let data = std::fs::read_to_string(dir.path().join("preferences.json")).unwrap();
    serde_json::from_str(&data).unwrap()
}

// ---------------------------------------------------------------------------
// tabstatus sanitize
// ---------------------------------------------------------------------------

#[test]
fn sanitize_redacts_emails() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args([
            "sanitize",
            "Contact me at a.b@example.com please",
            "--url",
            "https://example.com/",
        ])
        .assert()
        .success()
        .stdout("Contact me at [email] please\n");
}

#[test]
fn sanitize_redacts_addresses_with_long_final_label() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["sanitize", "Mail jane@example.community now"])
        .assert()
        .success()
        .stdout("Mail [email]unity now\n");
}

#[test]
fn sanitize_replaces_mail_client_titles() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args([
            "sanitize",
            "Inbox (12) - someone@example.com - Gmail",
            "--url",
            "https://mail.google.com/mail/u/0/#inbox",
        ])
        .assert()
        .success()
        .stdout("On Gmail\n");
}

#[test]
fn sanitize_truncates_to_max_len() {
    let dir = TempDir::new().unwrap();
    let long = "x".repeat(150);
    let out = tabstatus(&dir)
        .args(["sanitize", &long, "--max-len", "20"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let line = String::from_utf8(out).unwrap();
    let line = line.trim_end();
    assert_eq!(line.chars().count(), 20);
    assert!(line.ends_with("..."));
}

#[test]
fn sanitize_uses_config_redactions() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "redactions:\n  intranet.corp.example: Intranet\n",
    )
    .unwrap();
    tabstatus(&dir)
        .args([
            "sanitize",
            "Q3 layoffs draft",
            "--url",
            "https://intranet.corp.example/wiki/123",
        ])
        .assert()
        .success()
        .stdout("On Intranet\n");
}

#[test]
fn sanitize_json_output() {
    let dir = TempDir::new().unwrap();
    let out = tabstatus(&dir)
        .args(["--json", "sanitize", "hello", "--url", "https://example.com/"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["status_text"], "hello");
    assert_eq!(value["max_len"], 100);
}

// ---------------------------------------------------------------------------
// tabstatus prefs
// ---------------------------------------------------------------------------

#[test]
fn prefs_show_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled:    true"))
        .stdout(predicate::str::contains("authorized: false"))
        .stdout(predicate::str::contains("paused"));
    assert!(!dir.path().join("preferences.json").exists());
}

#[test]
fn prefs_set_persists_camel_case_json() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["prefs", "set", "authorized", "true"])
        .assert()
        .success();
    tabstatus(&dir)
        .args(["prefs", "set", "workspace", "T024BE7LD"])
        .assert()
        .success();
    tabstatus(&dir)
        .args(["prefs", "set", "enabled", "off"])
        .assert()
        .success();

    let prefs = prefs_json(&dir);
    assert_eq!(prefs["authorized"], true);
    assert_eq!(prefs["enabled"], false);
    assert_eq!(prefs["selectedWorkspaceId"], "T024BE7LD");

    tabstatus(&dir)
        .args(["prefs", "set", "workspace", "none"])
        .assert()
        .success();
    assert!(prefs_json(&dir)["selectedWorkspaceId"].is_null());
}

#[test]
fn prefs_show_json_after_set() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["prefs", "set", "authorized", "yes"])
        .assert()
        .success();
    let out = tabstatus(&dir)
        .args(["prefs", "show", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["authorized"], true);
    assert_eq!(value["enabled"], true);
}

#[test]
fn prefs_set_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["prefs", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn prefs_set_invalid_bool_fails() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["prefs", "set", "enabled", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("maybe"));
}

// ---------------------------------------------------------------------------
// tabstatus workspaces
// ---------------------------------------------------------------------------

#[test]
fn workspaces_empty_hint() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .arg("workspaces")
        .assert()
        .success()
        .stdout(predicate::str::contains("No workspaces recorded yet"));
}

#[test]
fn workspaces_lists_recorded_and_marks_selected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("preferences.json"),
        r#"{
            "enabled": true,
            "authorized": true,
            "selectedWorkspaceId": "T2",
            "workspaces": [
                {"id": "T1", "name": "Acme", "domain": "acme"},
                {"id": "T2", "name": "Side Project", "domain": "side-project"}
            ]
        }"#,
    )
    .unwrap();
    let out = tabstatus(&dir)
        .arg("workspaces")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Acme"));
    let selected = text.lines().find(|l| l.contains("T2")).unwrap();
    assert!(selected.starts_with('*'));
    let other = text.lines().find(|l| l.contains("T1")).unwrap();
    assert!(!other.starts_with('*'));
}

// ---------------------------------------------------------------------------
// tabstatus config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_defaults_clean() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.yaml"),
        "poll_interval_ms: 0\ndevtools_url: not a url\n",
    )
    .unwrap();
    tabstatus(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] poll_interval_ms"))
        .stderr(predicate::str::contains("config validation found errors"));
}

#[test]
fn config_show_prints_effective_defaults() {
    let dir = TempDir::new().unwrap();
    let out = tabstatus(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let config: serde_yaml::Value = serde_yaml::from_slice(&out).unwrap();
    assert_eq!(config["devtools_url"], "http://127.0.0.1:9222");
    assert_eq!(config["max_status_len"], 100);
    assert_eq!(config["service"]["local_config_key"], "localConfig_v2");
}

#[test]
fn malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.yaml"), "poll_interval_ms: [oops\n").unwrap();
    tabstatus(&dir)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

// ---------------------------------------------------------------------------
// tabstatus run
// ---------------------------------------------------------------------------

#[test]
fn run_fails_fast_without_a_browser() {
    let dir = TempDir::new().unwrap();
    tabstatus(&dir)
        .args(["run", "--devtools-url", "http://127.0.0.1:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to acquire credentials"));
}
