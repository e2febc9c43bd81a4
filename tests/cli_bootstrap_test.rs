// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! End-to-end tests of the `rest-app` binary: startup, persisted
//! overrides across runs, reset, and fatal startup errors.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// A `rest-app` command rooted in `dir`, logging to a file there.
fn rest_app(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("rest-app").unwrap();
    cmd.env_remove("LOG_FORMAT")
        .env_remove("REST_APP_RESET")
        .arg("--app-name")
        .arg("demo")
        .arg("--app-path")
        .arg(dir)
        .arg("--log-filepath")
        .arg(dir.join("demo.log"));
    cmd
}

fn effective_config(output: &[u8]) -> serde_json::Value {
    let stdout = String::from_utf8(output.to_vec()).unwrap();
    serde_json::from_str(stdout.trim()).unwrap()
}

#[test]
fn prints_effective_configuration() {
    let dir = TempDir::new().unwrap();

    let output = rest_app(dir.path()).assert().success().get_output().stdout.clone();
    let config = effective_config(&output);

    assert_eq!(config["app_name"], "demo");
    assert_eq!(config["https_port"], 8080);
    assert_eq!(config["log_level"], 0);
    assert_eq!(config["new_data_source"], true);
    assert_eq!(config["audit_log_name"], "demo.audit");
    assert!(dir.path().join("demo.db").exists());
    assert!(dir.path().join("demo.log.0").exists());
    assert!(dir.path().join("demo.log.audit.0").exists());
}

#[test]
fn override_persists_across_runs() {
    let dir = TempDir::new().unwrap();

    rest_app(dir.path())
        .arg("--override")
        .arg(r#"{"https_port":9443,"version":"v9"}"#)
        .assert()
        .success();

    let output = rest_app(dir.path())
        .arg("--https-port")
        .arg("7000")
        .arg("--log-level")
        .arg("1")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let config = effective_config(&output);

    assert_eq!(config["https_port"], 9443);
    assert_eq!(config["version"], "v9");
    assert_eq!(config["log_level"], 1);
    assert_eq!(config["new_data_source"], false);

    let audit = std::fs::read_to_string(dir.path().join("demo.log.audit.0")).unwrap();
    assert!(audit.contains("Configuration override stored"));
}

#[test]
fn reset_removes_persisted_state() {
    let dir = TempDir::new().unwrap();
    let extra = dir.path().join("tokens.json");

    rest_app(dir.path())
        .arg("--override")
        .arg(r#"{"https_port":9443}"#)
        .assert()
        .success();
    std::fs::write(&extra, b"{}").unwrap();

    let output = rest_app(dir.path())
        .env("REST_APP_RESET", "1")
        .arg("--reset-glob")
        .arg(dir.path().join("tokens*"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let config = effective_config(&output);

    assert_eq!(config["https_port"], 8080);
    assert_eq!(config["new_data_source"], true);
    assert!(!extra.exists());
}

#[test]
fn invalid_log_level_is_fatal() {
    let dir = TempDir::new().unwrap();

    rest_app(dir.path())
        .arg("--log-level")
        .arg("7")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("fatal:"))
        .stderr(predicate::str::contains("invalid log level index 7"));
    assert!(!dir.path().join("demo.db").exists());
}

#[test]
fn uncreatable_persistent_directory_is_fatal() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();

    rest_app(dir.path())
        .arg("--persistent-directory")
        .arg(blocker.join("data"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("fatal: creating persistent directory"));
}

#[test]
fn malformed_override_is_rejected() {
    let dir = TempDir::new().unwrap();

    rest_app(dir.path())
        .arg("--override")
        .arg("{not json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid --override"));
}
