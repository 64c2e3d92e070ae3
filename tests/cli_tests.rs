//! CLI integration tests for the nbsort binary

mod common;

use common::{nbsort_cmd, write_unreachable_config};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    nbsort_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    nbsort_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nbsort 0.1.0"));
}

#[test]
fn test_no_args_shows_usage() {
    let home = TempDir::new().unwrap();
    nbsort_cmd(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_list_prints_builtin_scenarios() {
    let home = TempDir::new().unwrap();
    nbsort_cmd(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("all-sorting"))
        .stdout(predicate::str::contains("letters-between-numbers"))
        .stdout(predicate::str::contains("dotted-numbers"))
        .stdout(predicate::str::contains("extension-secondary-key"))
        .stdout(predicate::str::contains("extensionless-first"));
}

#[test]
fn test_seed_writes_fixture_files() {
    let home = TempDir::new().unwrap();
    let target = home.path().join("tree");

    nbsort_cmd(&home)
        .arg("seed")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 16 files"));

    assert!(target.join("My Notebook 10.ipynb").is_file());
    assert!(target.join("0201.0.0.txt").is_file());
    assert!(target.join("a").is_file());
}

#[test]
fn test_run_unknown_scenario_fails() {
    let home = TempDir::new().unwrap();
    let config = write_unreachable_config(home.path());

    nbsort_cmd(&home)
        .arg("--config")
        .arg(&config)
        .args(["run", "--scenario", "no-such-scenario"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scenario 'no-such-scenario'"));
}

#[test]
fn test_run_without_webdriver_fails_cleanly() {
    let home = TempDir::new().unwrap();
    let config = write_unreachable_config(home.path());

    nbsort_cmd(&home)
        .arg("--config")
        .arg(&config)
        .args(["run", "--scenario", "extensionless-first"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not start a browser"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("broken.json");
    std::fs::write(&config, "{ nope").unwrap();

    nbsort_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_doctor_reports_unreachable_endpoints() {
    let home = TempDir::new().unwrap();
    let config = write_unreachable_config(home.path());

    nbsort_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Endpoint http://127.0.0.1:9 reachable"))
        .stdout(predicate::str::contains("Critical issues found"));
}

#[test]
fn test_invalid_browser_flag() {
    let home = TempDir::new().unwrap();
    nbsort_cmd(&home)
        .args(["--browser", "safari", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported browser"));
}
