//! # arcpack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!

//! ## Overview
//!
//! Root of the shared modules used by the command handlers. Command-specific
//! logic lives under `commands::`, core infrastructure under `core::`.
//!
//! - **`archive`**: The archive-assembly engine: compatibility matrix, validation,
//!   entry walking, container writers, compression adapters and the orchestrator.
//! - **`fs`**: Foundational filesystem operations (directory preparation, file creation and opening).
//!
//! ```rust
//! use crate::common::{archive, fs};
//! use std::path::Path;
//!
//! # fn run_example() -> anyhow::Result<()> {
//! fs::io::ensure_dir_exists(Path::new("./dist"))?;
//! let container = archive::matrix::ContainerType::from_name("site.tar.gz");
//! # Ok(())
//! # }
//! ```
//!

/// The archive-assembly engine (ZIP and TAR family).
pub mod archive;
/// Utilities for filesystem operations.
pub mod fs;
