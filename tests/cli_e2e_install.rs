//! End-to-end tests for the `install` command.
//!
//! These tests invoke the actual CLI binary. Everything here runs without
//! network access; flows that need a real repository live in the
//! feature-gated tests.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_install_rejects_invalid_name() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("install")
        .arg("bad/name")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong identifier"));

    // rejected before anything was resolved or cloned
    assert!(!temp.path().join(".pgforge").join("bad").exists());
}

#[test]
fn test_install_rejects_blank_query() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("install")
        .arg("10:...")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong identifier"));
}

#[test]
fn test_install_with_no_known_instances_is_a_no_op() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("install")
        .assert()
        .success();
}

#[test]
fn test_install_bootstraps_root_and_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("install")
        .assert()
        .success();

    assert!(temp.path().join(".pgforge").is_dir());
    let config = std::fs::read_to_string(temp.path().join(".pgforge.toml")).unwrap();
    assert!(config.contains("[repos]"));
    assert!(config.contains("first_match"));
}

#[test]
fn test_install_reports_malformed_config() {
    let temp = assert_fs::TempDir::new().unwrap();
    std::fs::write(temp.path().join(".pgforge.toml"), "[repos\nurls =").unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
