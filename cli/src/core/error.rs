//! # arcpack Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! This module defines the error types used throughout arcpack. Every failure
//! while building an archive is fatal: errors are never recovered from, they
//! propagate to `main`, are reported to the user, and end the process with a
//! non-zero exit status.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ArchiverError`: A custom error enum using `thiserror` for the specific failure classes
//! - `Result<T>`: A type alias for `anyhow::Result<T>` so call sites can attach context
//!
//! The error variants cover these domains:
//! - Validation errors (bad name, bad destination, unsupported type or algorithm, missing source)
//! - Filesystem errors (stat, open, create, mkdir, directory walk)
//! - Write errors (entry header or content, container or compressor finalization)
//! - Unimplemented pipelines (LZMA inside ZIP)
//! - Configuration errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !source.exists() {
//!     anyhow::bail!(ArchiverError::SourceNotFound { path: source.to_path_buf() });
//! }
//!
//! // Pattern matching on error types
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<ArchiverError>(), Some(ArchiverError::Unimplemented(_))) => {
//!         println!("pipeline not available");
//!     }
//!     other => other?,
//! }
//! ```
//!
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for arcpack.
#[derive(Error, Debug)]
pub enum ArchiverError {
    #[error("Invalid archive name: {0}")]
    InvalidName(String),

    #[error("Invalid destination: {0}")]
    InvalidDestination(String),

    #[error("Unsupported archive type: '{name}'")]
    UnsupportedArchiveType { name: String },

    #[error("Algorithm '{algorithm}' not supported for this type ({container})")]
    UnsupportedAlgorithm { algorithm: String, container: String },

    #[error("Invalid compression level {level}: expected a value between 0 and 9")]
    InvalidLevel { level: u32 },

    #[error("Source '{}' does not exist", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Entry '{name}' would be written to the archive more than once")]
    EntryCollision { name: String },

    #[error("Filesystem error on '{}': {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArchiverError {
    /// Wraps an I/O error raised while touching `path`.
    pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ArchiverError::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Wraps an I/O error raised while writing `target` into the archive.
    pub fn write(target: impl Into<String>, source: io::Error) -> Self {
        ArchiverError::Write {
            target: target.into(),
            source,
        }
    }

    /// True for the failure classes detected before any output is produced.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ArchiverError::InvalidName(_)
                | ArchiverError::InvalidDestination(_)
                | ArchiverError::UnsupportedArchiveType { .. }
                | ArchiverError::UnsupportedAlgorithm { .. }
                | ArchiverError::InvalidLevel { .. }
                | ArchiverError::SourceNotFound { .. }
                | ArchiverError::EntryCollision { .. }
        )
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
