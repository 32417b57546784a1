//! Smoke tests for the anvs-setup command line surface.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn setup_cmd() -> Command {
  cargo_bin_cmd!("anvs-setup")
}

#[test]
fn help_lists_both_operations() {
  setup_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("install"))
    .stdout(predicate::str::contains("uninstall"));
}

#[test]
fn install_requires_a_version_argument() {
  setup_cmd().arg("install").assert().failure();
}

#[test]
fn unknown_subcommands_are_rejected() {
  setup_cmd().arg("frobnicate").assert().failure();
}

#[test]
fn malformed_version_fails_with_a_concise_message() {
  let temp = tempfile::TempDir::new().unwrap();
  setup_cmd()
    .env("HOME", temp.path())
    .env("USERPROFILE", temp.path())
    .args(["install", "not-a-version"])
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("invalid version"));
}
