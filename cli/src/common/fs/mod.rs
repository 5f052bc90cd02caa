//! # arcpack Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!

//! ## Overview
//!
//! Organizational unit for the filesystem helpers used by the archive engine
//! and the configuration loader.
//!
//! - **`io`**: Destination directory preparation (`ensure_dir_exists`), destination file
//!   creation (`create_file`), source file opening (`open_file`) and `read_file_to_string`.
//!
//! Callers import from the submodule directly, e.g. `crate::common::fs::io::ensure_dir_exists`.
//!

/// Contains basic file I/O operations (e.g., `ensure_dir_exists`, `create_file`, `open_file`).
pub mod io;
