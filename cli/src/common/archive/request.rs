//! # arcpack Archive Requests (`common::archive::request`)
//!
//! File: cli/src/common/archive/request.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! The values that flow through one archive run. An `ArchiveRequest` is built once
//! from user input; the validator consumes it and produces a `ValidatedArchive`
//! carrying the normalized name and the parsed container/algorithm pair that every
//! later stage dispatches on. Neither value is mutated after construction.
//!
use super::matrix::{Algorithm, ContainerType};
use std::path::PathBuf;

/// Raw user input for one archive run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Directory the archive is written into. Created if missing.
    pub destination: PathBuf,
    /// Archive file name, including its container suffix.
    pub name: String,
    /// Requested algorithm; `None` selects the container's default.
    pub algorithm: Option<Algorithm>,
    /// Compression level (0-9); `None` uses each encoder's default.
    pub level: Option<u32>,
    /// Files and directories to archive, in order.
    pub sources: Vec<PathBuf>,
}

/// An `ArchiveRequest` that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArchive {
    /// Archive name after `.tar` upgrade normalization.
    pub name: String,
    pub container: ContainerType,
    pub algorithm: Algorithm,
    pub level: Option<u32>,
    /// `destination/name`.
    pub output_path: PathBuf,
    pub sources: Vec<PathBuf>,
}
