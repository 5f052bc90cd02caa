//! # arcpack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each `.rs`
//! file there is compiled as its own test crate and pulls this in with `mod common;`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// # Get arcpack Command (`arcpack_cmd`)
///
/// Returns an `assert_cmd::Command` for the compiled `arcpack` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn arcpack_cmd() -> Command {
    Command::cargo_bin("arcpack").expect("Failed to find arcpack binary for testing")
}

/// # Isolated Command (`isolated_cmd`)
///
/// Like `arcpack_cmd`, but runs inside `workdir` with an empty user config so
/// that neither the developer's own configuration nor a stray `.arcpack.toml`
/// leaks into the test.
pub fn isolated_cmd(workdir: &Path) -> Command {
    let config = workdir.join("arcpack-test-config.toml");
    if !config.exists() {
        fs::write(&config, "").expect("Failed to write empty test config");
    }
    let mut cmd = arcpack_cmd();
    cmd.current_dir(workdir)
        .env("ARCPACK_CONFIG", &config)
        .env_remove("RUST_LOG");
    cmd
}

/// # Source Fixture (`source_fixture`)
///
/// Creates a temporary directory holding a small tree:
///
/// ```text
/// docs/
///   guide.md
///   img/logo.txt
/// notes.txt
/// ```
pub fn source_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let docs = dir.path().join("docs");
    fs::create_dir_all(docs.join("img")).expect("Failed to create fixture dirs");
    fs::write(docs.join("guide.md"), "# Guide\n").expect("Failed to write fixture");
    fs::write(docs.join("img/logo.txt"), "logo").expect("Failed to write fixture");
    fs::write(dir.path().join("notes.txt"), "remember the milk").expect("Failed to write fixture");
    dir
}
