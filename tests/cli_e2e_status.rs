//! End-to-end tests for the `status` command.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_status_with_no_instances() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_status_reports_uninstalled_instance() {
    let temp = assert_fs::TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("10")).unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected instance: 10"))
        .stdout(predicate::str::contains("Not installed"));
}

#[test]
fn test_status_with_explicit_target() {
    let temp = assert_fs::TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("10")).unwrap();
    std::fs::create_dir_all(temp.path().join("9.6")).unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("status")
        .arg("10")
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected instance: 10"))
        .stdout(predicate::str::contains("Selected instance: 9.6").not());
}
