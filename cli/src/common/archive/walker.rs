//! # arcpack Entry Walker (`common::archive::walker`)
//!
//! File: cli/src/common/archive/walker.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Converts one source argument into the lazy sequence of `Entry` values that the
//! container writers consume.
//!
//! - A **file** argument yields exactly one entry named by the file's base name, so
//!   `/home/me/notes/f.txt` is stored as `f.txt`.
//! - A **directory** argument is walked recursively with `walkdir`, depth-first and
//!   sorted by file name. The directory itself is not emitted; its descendants are
//!   named relative to it, so `d/sub/g.txt` is stored as `sub/g.txt` next to a
//!   `sub/` directory entry.
//!
//! Entries only carry metadata and the source path. File content is opened by the
//! writer through `Entry::open`, copied, and dropped before the next entry is
//! requested, so at most one source file is open at a time and nothing is buffered.
//!
//! Symbolic links are followed: a link to a file is archived as that file's
//! content, a link to a directory is descended into. Link loops and special files
//! (sockets, FIFOs, devices) abort the walk.
//!
use crate::common::fs::io;
use crate::core::error::{ArchiverError, Result};
use std::fs::{self, File, Metadata};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use std::io as stdio;
use tracing::trace;
use walkdir::WalkDir;

/// Permission bits recorded for directory entries.
pub const DIR_MODE: u32 = 0o755;
/// Permission bits recorded for files when the platform has no unix mode.
#[cfg(not(unix))]
pub const DEFAULT_FILE_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { size: u64 },
}

/// One filesystem object as it will appear in the archive.
#[derive(Debug, Clone)]
pub struct Entry {
    /// `/`-separated path inside the archive. Directory names end with `/`.
    pub relative_path: String,
    pub kind: EntryKind,
    /// Source mtime for files; walk time for directories.
    pub modified: SystemTime,
    pub mode: u32,
    /// Where the content is read from.
    pub source: PathBuf,
}

impl Entry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Content length; zero for directories.
    pub fn size(&self) -> u64 {
        match self.kind {
            EntryKind::File { size } => size,
            EntryKind::Directory => 0,
        }
    }

    /// Opens the entry's source file for streaming.
    pub fn open(&self) -> Result<File> {
        io::open_file(&self.source)
    }

    fn directory(relative_path: String, source: PathBuf) -> Entry {
        Entry {
            relative_path: format!("{}/", relative_path),
            kind: EntryKind::Directory,
            modified: SystemTime::now(),
            mode: DIR_MODE,
            source,
        }
    }

    fn file(relative_path: String, source: PathBuf, meta: &Metadata) -> Result<Entry> {
        let modified = meta
            .modified()
            .map_err(|e| ArchiverError::fs(&source, e))?;
        Ok(Entry {
            relative_path,
            kind: EntryKind::File { size: meta.len() },
            modified,
            mode: file_mode(meta),
            source,
        })
    }
}

/// Lazy, forward-only sequence of entries for one source argument.
pub struct SourceWalk {
    root: PathBuf,
    state: WalkState,
}

enum WalkState {
    Single(Option<Entry>),
    Tree(walkdir::IntoIter),
}

/// Starts walking `source`, which must be a file or a directory.
pub fn walk_source(source: &Path) -> Result<SourceWalk> {
    let meta = fs::metadata(source).map_err(|e| ArchiverError::fs(source, e))?;
    let state = if meta.is_dir() {
        let iter = WalkDir::new(source)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();
        WalkState::Tree(iter)
    } else if meta.is_file() {
        let base_name = source
            .file_name()
            .ok_or_else(|| unsupported(source, "path has no file name"))
            .and_then(|name| {
                name.to_str()
                    .map(str::to_string)
                    .ok_or_else(|| unsupported(source, "file name is not valid UTF-8"))
            })?;
        WalkState::Single(Some(Entry::file(base_name, source.to_path_buf(), &meta)?))
    } else {
        return Err(unsupported(source, "not a regular file or directory").into());
    };
    Ok(SourceWalk {
        root: source.to_path_buf(),
        state,
    })
}

impl SourceWalk {
    fn tree_entry(&self, dent: walkdir::DirEntry) -> Result<Entry> {
        let path = dent.path();
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| unsupported(path, "entry escaped its source directory"))?;
        let name = archive_name(relative).ok_or_else(|| unsupported(path, "path is not valid UTF-8"))?;
        let meta = dent.metadata().map_err(|e| walk_error(&self.root, e))?;

        if meta.is_dir() {
            Ok(Entry::directory(name, path.to_path_buf()))
        } else if meta.is_file() {
            Entry::file(name, path.to_path_buf(), &meta)
        } else {
            Err(unsupported(path, "not a regular file or directory").into())
        }
    }
}

impl Iterator for SourceWalk {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let dent = match &mut self.state {
            WalkState::Single(entry) => return entry.take().map(Ok),
            WalkState::Tree(iter) => iter.next()?,
        };
        let entry = match dent {
            Ok(dent) => self.tree_entry(dent),
            Err(e) => Err(walk_error(&self.root, e).into()),
        };
        if let Ok(entry) = &entry {
            trace!("Walked {:?} -> {}", entry.source, entry.relative_path);
        }
        Some(entry)
    }
}

/// Joins the normal components of `relative` with `/`.
fn archive_name(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}

#[cfg(unix)]
fn file_mode(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_meta: &Metadata) -> u32 {
    DEFAULT_FILE_MODE
}

fn unsupported(path: &Path, reason: &str) -> ArchiverError {
    ArchiverError::fs(path, stdio::Error::new(stdio::ErrorKind::InvalidInput, reason.to_string()))
}

fn walk_error(root: &Path, err: walkdir::Error) -> ArchiverError {
    let path = err.path().unwrap_or(root).to_path_buf();
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| stdio::Error::new(stdio::ErrorKind::Other, message));
    ArchiverError::fs(path, source)
}
