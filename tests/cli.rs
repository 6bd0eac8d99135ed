//! Binary smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn list_prints_the_task_table() {
    let mut cmd = Command::cargo_bin("superpack").unwrap();
    cmd.arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("bdist_superpack"))
        .stdout(predicate::str::contains("write_note_changelog"));
}

#[test]
fn no_tasks_is_a_usage_error() {
    let mut cmd = Command::cargo_bin("superpack").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("no tasks given"));
}

#[test]
fn unknown_task_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("release.toml"), "version = \"0.8.0\"").unwrap();

    let mut cmd = Command::cargo_bin("superpack").unwrap();
    cmd.current_dir(dir.path())
        .arg("blean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown task: blean"));
}

#[test]
fn clean_succeeds_on_a_pristine_tree() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("release.toml"), "version = \"0.8.0\"").unwrap();
    std::fs::create_dir_all(dir.path().join("build/lib")).unwrap();

    let mut cmd = Command::cargo_bin("superpack").unwrap();
    cmd.current_dir(dir.path()).arg("clean").assert().success();
    assert!(!dir.path().join("build").exists());
}
