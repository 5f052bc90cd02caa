//! # arcpack Compatibility Matrix (`common::archive::matrix`)
//!
//! File: cli/src/common/archive/matrix.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Defines the closed sets of container types and compression algorithms and the
//! static table describing which algorithms each container accepts. The table is
//! the single source of truth for both validation (`is_supported`) and default
//! selection (`default_for`), so the two can never drift apart.
//!
//! | Container  | Algorithms                    | Default  |
//! |------------|-------------------------------|----------|
//! | `.zip`     | deflate, lzma (unimplemented) | deflate  |
//! | `.tar`     | none, gzip, bzip2, xz         | none     |
//! | `.tar.gz`  | gzip                          | gzip     |
//! | `.tar.bz2` | bzip2                         | bzip2    |
//! | `.tar.xz`  | xz                            | xz       |
//!
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;

/// Archive framing format, derived from the archive name's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerType {
    Zip,
    Tar,
    TarGz,
    TarBz2,
    TarXz,
}

/// Compression algorithm applied to the container's bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    None,
    Gzip,
    Bzip2,
    Xz,
    Deflate,
    Lzma,
}

impl ContainerType {
    /// Every container type, ordered so longer suffixes are checked first.
    pub const ALL: [ContainerType; 5] = [
        ContainerType::TarGz,
        ContainerType::TarBz2,
        ContainerType::TarXz,
        ContainerType::Tar,
        ContainerType::Zip,
    ];

    /// The file-name suffix identifying this container.
    pub const fn suffix(self) -> &'static str {
        match self {
            ContainerType::Zip => ".zip",
            ContainerType::Tar => ".tar",
            ContainerType::TarGz => ".tar.gz",
            ContainerType::TarBz2 => ".tar.bz2",
            ContainerType::TarXz => ".tar.xz",
        }
    }

    /// Parses the container type from an archive name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<ContainerType> {
        Self::ALL
            .into_iter()
            .find(|container| name.ends_with(container.suffix()))
    }

    /// True for the TAR family (bare or compressed).
    pub const fn is_tar(self) -> bool {
        !matches!(self, ContainerType::Zip)
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl Algorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::None => "none",
            Algorithm::Gzip => "gzip",
            Algorithm::Bzip2 => "bzip2",
            Algorithm::Xz => "xz",
            Algorithm::Deflate => "deflate",
            Algorithm::Lzma => "lzma",
        }
    }

    /// The compressed TAR container a bare `.tar` name is upgraded to when
    /// this algorithm is selected, if any.
    pub const fn tar_upgrade(self) -> Option<ContainerType> {
        match self {
            Algorithm::Gzip => Some(ContainerType::TarGz),
            Algorithm::Bzip2 => Some(ContainerType::TarBz2),
            Algorithm::Xz => Some(ContainerType::TarXz),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepted algorithms per container. The first entry is the container's default.
const MATRIX: [(ContainerType, &[Algorithm]); 5] = [
    (ContainerType::Zip, &[Algorithm::Deflate, Algorithm::Lzma]),
    (
        ContainerType::Tar,
        &[Algorithm::None, Algorithm::Gzip, Algorithm::Bzip2, Algorithm::Xz],
    ),
    (ContainerType::TarGz, &[Algorithm::Gzip]),
    (ContainerType::TarBz2, &[Algorithm::Bzip2]),
    (ContainerType::TarXz, &[Algorithm::Xz]),
];

/// Returns the algorithms accepted by `container`.
pub fn algorithms_for(container: ContainerType) -> &'static [Algorithm] {
    MATRIX
        .iter()
        .find(|(c, _)| *c == container)
        .map(|(_, algorithms)| *algorithms)
        .unwrap_or(&[])
}

/// Whether `algorithm` may be used with `container`.
pub fn is_supported(container: ContainerType, algorithm: Algorithm) -> bool {
    algorithms_for(container).contains(&algorithm)
}

/// The algorithm used for `container` when none was requested.
pub fn default_for(container: ContainerType) -> Algorithm {
    algorithms_for(container)
        .first()
        .copied()
        .unwrap_or(Algorithm::None)
}
