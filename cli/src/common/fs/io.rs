//! # arcpack Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!

//! ## Overview
//!
//! This module centralizes the handful of filesystem operations the archive
//! engine performs outside of the entry walk itself: preparing the destination
//! directory, creating the destination archive file, opening source files for
//! streaming, and reading configuration files.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and its parents) if it is missing. If the path exists, it must be a directory.
//! - **`create_file`**: Creates (or truncates) the destination archive file.
//! - **`open_file`**: Opens a source file for reading.
//! - **`read_file_to_string`**: Reads a whole file into a string, used for configuration files.
//!
//! Failures are reported as `ArchiverError::FileSystem` (or `InvalidDestination`
//! for a destination path that is not a directory) so callers can tell the
//! failure classes apart.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//! use crate::core::error::Result;
//! use std::path::Path;
//!
//! # fn run_example() -> Result<()> {
//! let out_dir = Path::new("./dist/archives");
//! io::ensure_dir_exists(out_dir)?;
//! let file = io::create_file(&out_dir.join("backup.tar.gz"))?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{ArchiverError, Result};
use anyhow::Context;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, the directory is created together with any
/// missing parents (similar to `mkdir -p`). If the path already exists but is
/// not a directory, `ArchiverError::InvalidDestination` is returned.
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            debug!("Directory already exists: {:?}", path);
        }
        Ok(_) => {
            anyhow::bail!(ArchiverError::InvalidDestination(format!(
                "Path exists but is not a directory: {:?}",
                path
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            fs::create_dir_all(path).map_err(|e| ArchiverError::fs(path, e))?;
            info!("Created directory: {:?}", path);
        }
        Err(e) => return Err(ArchiverError::fs(path, e).into()),
    }
    Ok(())
}

/// Creates the file at `path`, truncating any existing file.
pub fn create_file(path: &Path) -> Result<File> {
    let file = File::create(path).map_err(|e| ArchiverError::fs(path, e))?;
    debug!("Created file: {:?}", path);
    Ok(file)
}

/// Opens the file at `path` for reading.
pub fn open_file(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| ArchiverError::fs(path, e).into())
}

/// Reads the entire content of a file into a string.
///
/// A thin wrapper around `std::fs::read_to_string` that adds the file path to
/// the error message.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use tempfile::tempdir;

    /// `ensure_dir_exists` creates missing directories, including parents.
    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        Ok(())
    }

    /// `ensure_dir_exists` is a no-op for an existing directory.
    #[test]
    fn test_ensure_dir_exists_already_exists() -> Result<()> {
        let base_dir = tempdir()?;
        let existing_dir = base_dir.path().join("existing");
        fs::create_dir(&existing_dir)?;
        ensure_dir_exists(&existing_dir)?;
        assert!(existing_dir.is_dir());
        Ok(())
    }

    /// `ensure_dir_exists` rejects a path that is a regular file.
    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let err = ensure_dir_exists(&file_path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchiverError>(),
            Some(ArchiverError::InvalidDestination(_))
        ));
        assert!(err.to_string().contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_create_then_open() -> Result<()> {
        let base_dir = tempdir()?;
        let path = base_dir.path().join("out.bin");
        let mut file = create_file(&path)?;
        file.write_all(b"payload")?;
        drop(file);
        let mut content = String::new();
        open_file(&path)?.read_to_string(&mut content)?;
        assert_eq!(content, "payload");
        Ok(())
    }

    #[test]
    fn test_open_missing_file_is_filesystem_error() -> Result<()> {
        let base_dir = tempdir()?;
        let err = open_file(&base_dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchiverError>(),
            Some(ArchiverError::FileSystem { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_read_file_not_found() -> Result<()> {
        let base_dir = tempdir()?;
        let result = read_file_to_string(&base_dir.path().join("nonexistent.txt"));
        assert!(result.is_err());
        Ok(())
    }
}
