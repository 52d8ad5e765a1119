//! End-to-end tests for the `remove` and `purge` commands.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_remove_without_targets_is_refused_by_default() {
    let temp = assert_fs::TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("10")).unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("remove")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires explicit targets"));

    assert!(temp.path().join("10").exists());
}

#[test]
fn test_remove_deletes_named_instance() {
    let temp = assert_fs::TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("10").join("bin")).unwrap();
    std::fs::create_dir_all(temp.path().join(".pgforge").join("10")).unwrap();
    std::fs::create_dir_all(temp.path().join("9.6")).unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("remove")
        .arg("10")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed main dir"))
        .stdout(predicate::str::contains("Removed work dir"));

    assert!(!temp.path().join("10").exists());
    assert!(!temp.path().join(".pgforge").join("10").exists());
    // untargeted instances are untouched
    assert!(temp.path().join("9.6").exists());
}

#[test]
fn test_remove_all_with_yes_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("10")).unwrap();
    std::fs::write(
        temp.path().join(".pgforge.toml"),
        "[commands.remove]\nrequire_args = false\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("remove")
        .arg("--yes")
        .assert()
        .success();

    assert!(!temp.path().join("10").exists());
}

#[test]
fn test_purge_removes_orphaned_work_dirs() {
    let temp = assert_fs::TempDir::new().unwrap();
    // orphan: work dir without an install dir
    std::fs::create_dir_all(temp.path().join(".pgforge").join("9.5")).unwrap();
    // live instance: both dirs present
    std::fs::create_dir_all(temp.path().join("10")).unwrap();
    std::fs::create_dir_all(temp.path().join(".pgforge").join("10")).unwrap();

    let mut cmd = cargo_bin_cmd!("pgforge");
    cmd.env("PGFORGE_PATH", temp.path())
        .arg("purge")
        .assert()
        .success();

    assert!(!temp.path().join(".pgforge").join("9.5").exists());
    assert!(temp.path().join(".pgforge").join("10").exists());
}
