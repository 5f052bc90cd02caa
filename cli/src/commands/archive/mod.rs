//! # arcpack Archive Command
//!
//! File: cli/src/commands/archive/mod.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Entry point for `arcpack archive`. Parses the command's flags, fills in
//! anything missing from the loaded configuration, and hands an `ArchiveRequest`
//! to the archive orchestrator.
//!
//! ## Examples
//!
//! ```bash
//! # Zip a directory and a file into ./backup.zip
//! arcpack archive --name backup.zip ./docs ./notes.txt
//!
//! # A bare .tar name plus an algorithm becomes site.tar.xz
//! arcpack archive -n site.tar -a xz -p ./dist ./public
//!
//! # Maximum gzip compression
//! arcpack archive -n logs.tar.gz --level 9 /var/log/app
//! ```
//!
//! Resolution order for each setting: flag, then `.arcpack.toml` / user config,
//! then the built-in default (current directory, container default algorithm).
//!
use crate::common::archive::matrix::Algorithm;
use crate::common::archive::orchestrator;
use crate::common::archive::request::ArchiveRequest;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Archive Command Arguments (`ArchiveArgs`)
///
/// Flags accepted by `arcpack archive`.
#[derive(Parser, Debug)]
pub struct ArchiveArgs {
    /// Archive file name; its suffix selects the container
    /// (.zip, .tar, .tar.gz, .tar.bz2, .tar.xz).
    #[arg(short, long)]
    pub name: String,

    /// Directory the archive is created in (created if missing).
    /// Defaults to the configured path, then the current directory.
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Compression algorithm. Defaults to the container's natural choice.
    #[arg(short, long, value_enum)]
    pub algorithm: Option<Algorithm>,

    /// Compression level, 0-9.
    #[arg(short, long)]
    pub level: Option<u32>,

    /// Files and directories to add, in order.
    #[arg(required = true)]
    pub sources: Vec<PathBuf>,
}

/// # Handle Archive Command (`handle_archive`)
///
/// Loads configuration, builds the request, and runs the orchestrator. Prints a
/// one-line summary on success.
pub fn handle_archive(args: ArchiveArgs) -> Result<()> {
    info!("Handling archive command with args: {:?}", args);
    let cfg = config::load_config()?;
    let request = build_request(args, &cfg)?;
    debug!("Archive request: {:?}", request);

    let report = orchestrator::create_archive(&request)?;
    println!(
        "Created {} ({}, {}): {} entries, {} bytes",
        report.path.display(),
        report.container,
        report.algorithm,
        report.entries,
        report.bytes
    );
    Ok(())
}

/// Merges command-line flags with configured defaults.
fn build_request(args: ArchiveArgs, cfg: &Config) -> Result<ArchiveRequest> {
    let destination = match args.path.or_else(|| cfg.archive.destination()) {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    Ok(ArchiveRequest {
        destination,
        name: args.name,
        algorithm: args.algorithm,
        level: args.level.or(cfg.archive.level),
        sources: args.sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ArchiveDefaults;

    fn parse(argv: &[&str]) -> ArchiveArgs {
        ArchiveArgs::try_parse_from(argv).expect("arguments should parse")
    }

    #[test]
    fn test_parse_full_flags() {
        let args = parse(&["archive", "-n", "x.tar", "-a", "bzip2", "-p", "out", "-l", "4", "a", "b"]);
        assert_eq!(args.name, "x.tar");
        assert_eq!(args.algorithm, Some(Algorithm::Bzip2));
        assert_eq!(args.path, Some(PathBuf::from("out")));
        assert_eq!(args.level, Some(4));
        assert_eq!(args.sources, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_sources_and_name_required() {
        assert!(ArchiveArgs::try_parse_from(["archive", "-n", "x.zip"]).is_err());
        assert!(ArchiveArgs::try_parse_from(["archive", "file.txt"]).is_err());
    }

    #[test]
    fn test_unknown_algorithm_rejected_by_parser() {
        assert!(ArchiveArgs::try_parse_from(["archive", "-n", "x.zip", "-a", "zstd", "f"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cfg = Config {
            archive: ArchiveDefaults {
                path: Some("/configured".into()),
                level: Some(2),
            },
        };
        let request = build_request(parse(&["archive", "-n", "x.zip", "-p", "/flag", "-l", "8", "f"]), &cfg).unwrap();
        assert_eq!(request.destination, PathBuf::from("/flag"));
        assert_eq!(request.level, Some(8));

        let request = build_request(parse(&["archive", "-n", "x.zip", "f"]), &cfg).unwrap();
        assert_eq!(request.destination, PathBuf::from("/configured"));
        assert_eq!(request.level, Some(2));
        assert_eq!(request.algorithm, None);
    }

    #[test]
    fn test_destination_defaults_to_current_dir() {
        let request = build_request(parse(&["archive", "-n", "x.zip", "f"]), &Config::default()).unwrap();
        assert_eq!(request.destination, std::env::current_dir().unwrap());
    }
}
