//! # arcpack Archive Orchestrator (`common::archive::orchestrator`)
//!
//! File: cli/src/common/archive/orchestrator.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Drives one archive run from an `ArchiveRequest` to a finished file on disk.
//!
//! ## Architecture
//!
//! A run moves through fixed stages:
//!
//! ```text
//! Validating -> Dispatching -> Streaming -> Finalizing -> Done
//!      \             \             \             \
//!       +-------------+-------------+-------------+--> Failed
//! ```
//!
//! - **Validating**: `validate::validate` checks and normalizes the request.
//! - **Dispatching**: picks the container/compression pipeline, creates the
//!   destination file, and builds the writer chain on top of it.
//! - **Streaming**: walks each source in order and appends its entries.
//! - **Finalizing**: TAR trailer or ZIP central directory, then compressor footer,
//!   then the file is synced.
//!
//! Any error moves the run to `Failed` and is returned with the stage attached.
//! A failure after the destination file was created leaves an incomplete archive
//! on disk; it is not deleted.
//!
//! Entry names are tracked for the whole run. A name reached twice is rejected
//! with `ArchiverError::EntryCollision`, except for directories, which are only
//! written the first time.
//!
//! When the destination lies inside a directory source, the walk reaches the
//! archive being written; that file is skipped.
//!
use super::container::{self, ContainerWriter};
use super::matrix::{Algorithm, ContainerType};
use super::request::ArchiveRequest;
use super::validate;
use super::walker::{self, Entry};
use crate::common::fs::io;
use crate::core::error::{ArchiverError, Result};
use anyhow::Context;
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Position of a run in the archive state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    #[default]
    Validating,
    Dispatching,
    Streaming,
    Finalizing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::Dispatching => "dispatching",
            Stage::Streaming => "streaming",
            Stage::Finalizing => "finalizing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Summary of a finished archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub container: ContainerType,
    pub algorithm: Algorithm,
    /// Entries written, directories included.
    pub entries: usize,
    /// Content bytes read from source files.
    pub bytes: u64,
}

/// Builds the archive described by `request`.
pub fn create_archive(request: &ArchiveRequest) -> Result<ArchiveReport> {
    let mut run = ArchiveRun::default();
    match run.execute(request) {
        Ok(report) => Ok(report),
        Err(err) => {
            run.report_failure(&err);
            Err(err).with_context(|| format!("Archive creation failed while {}", run.stage))
        }
    }
}

#[derive(Default)]
struct ArchiveRun {
    stage: Stage,
    output: Option<PathBuf>,
}

impl ArchiveRun {
    fn advance(&mut self, stage: Stage) {
        debug!("Archive stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn execute(&mut self, request: &ArchiveRequest) -> Result<ArchiveReport> {
        info!("Creating archive {:?} in {:?}", request.name, request.destination);
        let archive = validate::validate(request)?;

        self.advance(Stage::Dispatching);
        let pipeline = container::dispatch(&archive)?;
        debug!("Selected pipeline {:?}", pipeline);
        let file = io::create_file(&archive.output_path)?;
        self.output = Some(archive.output_path.clone());
        let output_identity = fs::canonicalize(&archive.output_path)
            .map_err(|e| ArchiverError::fs(&archive.output_path, e))?;
        let mut writer = container::open_container(pipeline, file)?;

        self.advance(Stage::Streaming);
        let mut names = EntryNames::default();
        let mut entries = 0;
        let mut bytes = 0;
        for source in &archive.sources {
            info!("Adding {:?}", source);
            for entry in walker::walk_source(source)? {
                let entry = entry?;
                if is_output_file(&entry, &output_identity) {
                    warn!("Skipping {:?}: it is the archive being written", entry.source);
                    continue;
                }
                if !names.admit(&entry)? {
                    continue;
                }
                bytes += writer.append(&entry)?;
                entries += 1;
            }
        }

        self.advance(Stage::Finalizing);
        finalize(writer, &archive.output_path)?;

        self.advance(Stage::Done);
        info!(
            "Wrote {} entries ({} bytes of content) to {:?}",
            entries, bytes, archive.output_path
        );
        Ok(ArchiveReport {
            path: archive.output_path,
            container: archive.container,
            algorithm: archive.algorithm,
            entries,
            bytes,
        })
    }

    fn report_failure(&self, err: &anyhow::Error) {
        let validation = err
            .downcast_ref::<ArchiverError>()
            .is_some_and(ArchiverError::is_validation);
        match &self.output {
            Some(path) => warn!(
                "Archive failed while {}; incomplete archive left at {:?}",
                self.stage, path
            ),
            None if validation => warn!("Archive request rejected; nothing was written"),
            None => warn!("Archive failed while {} before any output was created", self.stage),
        }
    }
}

/// Closes the writer chain inner-to-outer and syncs the destination file.
fn finalize(writer: Box<dyn ContainerWriter<File>>, path: &Path) -> Result<()> {
    let file = writer.finish()?;
    file.sync_all().map_err(|e| ArchiverError::fs(path, e))?;
    Ok(())
}

/// True when `entry` is the destination archive itself, reached through a
/// source directory that contains the destination.
fn is_output_file(entry: &Entry, output: &Path) -> bool {
    !entry.is_dir()
        && fs::canonicalize(&entry.source)
            .map(|path| path == output)
            .unwrap_or(false)
}

/// Names written so far, keyed without the trailing directory slash.
#[derive(Default)]
struct EntryNames {
    seen: HashMap<String, bool>,
}

impl EntryNames {
    /// Returns `Ok(true)` if the entry should be written, `Ok(false)` for a
    /// directory that is already present, or a collision error.
    fn admit(&mut self, entry: &Entry) -> Result<bool> {
        let key = entry.relative_path.trim_end_matches('/').to_string();
        match self.seen.get(&key) {
            None => {
                self.seen.insert(key, entry.is_dir());
                Ok(true)
            }
            Some(true) if entry.is_dir() => {
                debug!("Directory {} already archived", entry.relative_path);
                Ok(false)
            }
            Some(_) => Err(ArchiverError::EntryCollision {
                name: entry.relative_path.clone(),
            }
            .into()),
        }
    }
}
