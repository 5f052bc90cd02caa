//! # arcpack Input Validation (`common::archive::validate`)
//!
//! File: cli/src/common/archive/validate.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Turns an `ArchiveRequest` into a `ValidatedArchive`, failing on the first
//! violation. All checks run before the destination file is created, so a
//! rejected request never leaves an archive behind.
//!
//! ## Check Order
//!
//! 1. Archive name: non-empty, at most 255 characters, none of `<>:"/\|?*`.
//! 2. Destination directory: created if missing, must be a directory if present.
//! 3. Name suffix maps to a container type.
//! 4. A bare `.tar` name with gzip/bzip2/xz selected gains `.gz`/`.bz2`/`.xz`.
//! 5. Algorithm: defaulted from the matrix when unset, otherwise checked against it.
//! 6. Compression level, when given, is within 0..=9.
//! 7. Every source exists.
//!
//! Later checks depend on values normalized by earlier ones, so the order is fixed.
//!
use super::matrix::{self, Algorithm, ContainerType};
use super::request::{ArchiveRequest, ValidatedArchive};
use crate::common::fs::io;
use crate::core::error::{ArchiverError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};

/// Longest accepted archive name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Characters rejected anywhere in an archive name.
pub const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Highest accepted compression level.
pub const MAX_LEVEL: u32 = 9;

/// Runs every check in order and returns the normalized archive description.
///
/// The destination directory is created as a side effect of check 2, even if a
/// later check fails.
pub fn validate(request: &ArchiveRequest) -> Result<ValidatedArchive> {
    check_name(&request.name)?;
    io::ensure_dir_exists(&request.destination)?;
    let container = parse_container(&request.name)?;
    let (name, container) = normalize_name(&request.name, container, request.algorithm);
    let algorithm = resolve_algorithm(container, request.algorithm)?;
    check_level(request.level)?;
    check_sources(&request.sources)?;

    let output_path = request.destination.join(&name);
    info!(
        "Validated archive {:?} ({} / {})",
        output_path, container, algorithm
    );
    Ok(ValidatedArchive {
        name,
        container,
        algorithm,
        level: request.level,
        output_path,
        sources: request.sources.clone(),
    })
}

/// Checks the archive name's length and character set.
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!(ArchiverError::InvalidName(
            "archive name cannot be empty".into()
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        anyhow::bail!(ArchiverError::InvalidName(format!(
            "archive name is too long (max {} characters)",
            MAX_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_NAME_CHARS.contains(c)) {
        anyhow::bail!(ArchiverError::InvalidName(format!(
            "archive name contains invalid character '{}'",
            c
        )));
    }
    Ok(())
}

/// Maps the name's suffix to its container type.
pub fn parse_container(name: &str) -> Result<ContainerType> {
    ContainerType::from_name(name).ok_or_else(|| {
        ArchiverError::UnsupportedArchiveType {
            name: name.to_string(),
        }
        .into()
    })
}

/// Appends the compression suffix to a bare `.tar` name when a compressing
/// algorithm was requested, upgrading the container type to match.
pub fn normalize_name(
    name: &str,
    container: ContainerType,
    algorithm: Option<Algorithm>,
) -> (String, ContainerType) {
    if container != ContainerType::Tar {
        return (name.to_string(), container);
    }
    match algorithm.and_then(Algorithm::tar_upgrade) {
        Some(upgraded) => {
            let extra = &upgraded.suffix()[ContainerType::Tar.suffix().len()..];
            let normalized = format!("{}{}", name, extra);
            debug!("Normalized archive name {:?} -> {:?}", name, normalized);
            (normalized, upgraded)
        }
        None => (name.to_string(), container),
    }
}

/// Picks the container's default algorithm, or checks the requested one against the matrix.
pub fn resolve_algorithm(
    container: ContainerType,
    requested: Option<Algorithm>,
) -> Result<Algorithm> {
    let algorithm = match requested {
        Some(algorithm) => algorithm,
        None => {
            let default = matrix::default_for(container);
            debug!("No algorithm requested, using {} for {}", default, container);
            default
        }
    };
    if !matrix::is_supported(container, algorithm) {
        anyhow::bail!(ArchiverError::UnsupportedAlgorithm {
            algorithm: algorithm.to_string(),
            container: container.to_string(),
        });
    }
    Ok(algorithm)
}

pub fn check_level(level: Option<u32>) -> Result<()> {
    match level {
        Some(level) if level > MAX_LEVEL => Err(ArchiverError::InvalidLevel { level }.into()),
        _ => Ok(()),
    }
}

/// Fails on the first source that does not exist.
pub fn check_sources(sources: &[PathBuf]) -> Result<()> {
    for source in sources {
        match fs::metadata(source) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                anyhow::bail!(ArchiverError::SourceNotFound {
                    path: source.clone()
                });
            }
            Err(e) => return Err(ArchiverError::fs(source, e).into()),
        }
    }
    Ok(())
}
