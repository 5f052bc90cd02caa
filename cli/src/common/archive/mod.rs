//! # arcpack Archive Engine (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! This module is the archive-assembly engine behind `arcpack archive`. It turns
//! a list of files and directories into one ZIP or TAR (optionally gzip, bzip2 or
//! xz compressed) archive, choosing the container from the archive name's suffix
//! and the compression from the requested algorithm.
//!
//! ## Architecture
//!
//! The submodules, leaves first:
//!
//! - **`matrix`**: Container types, algorithms, and the table of legal pairs.
//! - **`request`**: `ArchiveRequest` (user input) and `ValidatedArchive` (normalized input).
//! - **`validate`**: Fail-fast checks that run before any output exists.
//! - **`walker`**: Lazy per-source entry sequences (files by base name, directories recursively).
//! - **`compression`**: Stream compressors for TAR and the ZIP compression method.
//! - **`tar`** / **`zip`**: The two `ContainerWriter` implementations.
//! - **`container`**: The `ContainerWriter` trait and pipeline dispatch.
//! - **`orchestrator`**: The staged driver tying everything together.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::{orchestrator, request::ArchiveRequest};
//! use std::path::PathBuf;
//!
//! # fn run() -> anyhow::Result<()> {
//! let request = ArchiveRequest {
//!     destination: PathBuf::from("./dist"),
//!     name: "site.tar".to_string(),
//!     algorithm: Some(crate::common::archive::matrix::Algorithm::Xz), // becomes site.tar.xz
//!     level: None,
//!     sources: vec![PathBuf::from("./public"), PathBuf::from("./README.md")],
//! };
//! let report = orchestrator::create_archive(&request)?;
//! println!("{} entries written to {}", report.entries, report.path.display());
//! # Ok(())
//! # }
//! ```
//!

pub mod compression;
pub mod container;
pub mod matrix;
pub mod orchestrator;
pub mod request;
pub mod tar;
pub mod validate;
pub mod walker;
pub mod zip;
