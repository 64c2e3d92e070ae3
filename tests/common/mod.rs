#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// `nbsort` binary with a home directory that cannot hold a stray config file.
pub fn nbsort_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nbsort").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("NBSORT_WEBDRIVER_URL")
        .env_remove("NBSORT_SERVER_URL")
        .env_remove("NBSORT_TOKEN")
        .env_remove("NBSORT_HEADLESS")
        .env_remove("NBSORT_TIMEOUT_MS")
        .env("NO_COLOR", "1");
    cmd
}

/// Writes a config file pointing both endpoints at a closed local port.
pub fn write_unreachable_config(dir: &Path) -> PathBuf {
    let path = dir.join("nbsort.json");
    fs::write(
        &path,
        r#"{
  "webdriver_url": "http://127.0.0.1:9",
  "server_url": "http://127.0.0.1:9/",
  "token": "abc",
  "timeout_ms": 200,
  "poll_interval_ms": 20
}"#,
    )
    .unwrap();
    path
}

pub fn owned(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}
