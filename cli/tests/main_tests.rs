//! # arcpack CLI Main Integration Tests
//!
//! File: cli/tests/main_tests.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Verifies the top-level behavior of the `arcpack` binary: standard flags,
//! the `help` subcommand, and usage errors.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_version_flag() {
    arcpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_archive_command() {
    arcpack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("archive"));
}

#[test]
fn test_archive_help_lists_flags() {
    arcpack_cmd()
        .args(["help", "archive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--name"))
        .stdout(predicate::str::contains("--algorithm"))
        .stdout(predicate::str::contains("--level"));
}

#[test]
fn test_no_subcommand_is_usage_error() {
    arcpack_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    arcpack_cmd().arg("extract").assert().failure();
}
