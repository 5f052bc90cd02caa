//! # arcpack TAR Container Writer (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Writes `.tar`, `.tar.gz`, `.tar.bz2` and `.tar.xz` archives.
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for the archive structure. The builder
//! writes into a `CompressedWriter`, which was wrapped around the destination
//! stream before the builder existed.
//!
//! - Every entry gets an explicit GNU header: name, mode, size, mtime, typeflag.
//! - Directory headers use mode `0755`, the walk time, and a name ending in `/`.
//! - File headers use mode `0644` and the source file's size and mtime; the
//!   content is streamed straight from the source file.
//! - Names too long for the header field are written with the GNU long-name extension.
//! - `finish` writes the TAR trailer, then the compressor footer.
//!
use super::compression::CompressedWriter;
use super::container::{self, ContainerWriter, CountingReader};
use super::walker::{Entry, DIR_MODE};
use crate::core::error::{ArchiverError, Result};
use std::io::{self, Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};
use tar::{Builder, EntryType, Header};
use tracing::debug;

/// Mode recorded for every regular file.
pub const FILE_MODE: u32 = 0o644;

/// TAR writer on top of an optional compressor.
pub struct TarContainer<W: Write> {
    builder: Builder<CompressedWriter<W>>,
}

impl<W: Write> TarContainer<W> {
    pub fn new(stream: CompressedWriter<W>) -> Self {
        TarContainer {
            builder: Builder::new(stream),
        }
    }

    fn append_dir(&mut self, entry: &Entry) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_mode(DIR_MODE);
        header.set_size(0);
        header.set_mtime(unix_seconds(entry.modified));

        let name = entry.relative_path.as_bytes();
        let slot = &mut header.as_old_mut().name;
        if name.len() <= slot.len() {
            // Written by hand: `set_path` would drop the trailing slash.
            slot[..name.len()].copy_from_slice(name);
            header.set_cksum();
            self.builder.append(&header, io::empty())
        } else {
            self.builder
                .append_data(&mut header, &entry.relative_path, io::empty())
        }
    }

    fn append_file(&mut self, entry: &Entry) -> Result<u64> {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_mode(FILE_MODE);
        header.set_size(entry.size());
        header.set_mtime(unix_seconds(entry.modified));

        // append_data copies to EOF; bound it to the size in the header.
        let mut source = CountingReader::new(entry.open()?.take(entry.size()));
        self.builder
            .append_data(&mut header, &entry.relative_path, &mut source)
            .map_err(|e| ArchiverError::write(format!("entry '{}'", entry.relative_path), e))?;
        container::check_copied(entry, source.count())?;
        Ok(source.count())
    }
}

impl<W: Write> ContainerWriter<W> for TarContainer<W> {
    fn append(&mut self, entry: &Entry) -> Result<u64> {
        debug!("tar: {}", entry.relative_path);
        if entry.is_dir() {
            self.append_dir(entry).map_err(|e| {
                ArchiverError::write(format!("directory '{}'", entry.relative_path), e)
            })?;
            Ok(0)
        } else {
            self.append_file(entry)
        }
    }

    fn finish(self: Box<Self>) -> Result<W> {
        let stream = self
            .builder
            .into_inner()
            .map_err(|e| ArchiverError::write("tar trailer", e))?;
        let inner = stream
            .finish()
            .map_err(|e| ArchiverError::write("compression footer", e))?;
        Ok(inner)
    }
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::matrix::Algorithm;
    use crate::common::archive::walker::walk_source;
    use flate2::read::GzDecoder;
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::Read;
    use tar::Archive;
    use tempfile::tempdir;

    fn build(dir: &std::path::Path, algorithm: Algorithm) -> Result<Vec<u8>> {
        let stream = CompressedWriter::for_tar(Vec::new(), algorithm, None)?;
        let mut writer: Box<dyn ContainerWriter<Vec<u8>>> = Box::new(TarContainer::new(stream));
        for entry in walk_source(dir)? {
            writer.append(&entry?)?;
        }
        writer.finish()
    }

    fn read_entries<R: Read>(reader: R) -> Result<BTreeMap<String, (EntryType, u32, Vec<u8>)>> {
        let mut archive = Archive::new(reader);
        let mut found = BTreeMap::new();
        for entry in archive.entries()? {
            let mut entry = entry?;
            let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
            let kind = entry.header().entry_type();
            let mode = entry.header().mode()?;
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            found.insert(name, (kind, mode, data));
        }
        Ok(found)
    }

    #[test]
    fn test_tar_gz_headers_and_content() -> Result<()> {
        let temp_dir = tempdir()?;
        let dir_path = temp_dir.path();
        fs::write(dir_path.join("file1.txt"), "hello")?;
        fs::create_dir(dir_path.join("subdir"))?;
        fs::write(dir_path.join("subdir/file2.txt"), "world")?;

        let tar_data = build(dir_path, Algorithm::Gzip)?;
        assert!(!tar_data.is_empty());
        let found = read_entries(GzDecoder::new(tar_data.as_slice()))?;

        let keys: Vec<&str> = found.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["file1.txt", "subdir/", "subdir/file2.txt"]);
        assert_eq!(found["subdir/"].0, EntryType::Directory);
        assert_eq!(found["subdir/"].1, DIR_MODE);
        assert_eq!(found["file1.txt"], (EntryType::Regular, FILE_MODE, b"hello".to_vec()));
        assert_eq!(found["subdir/file2.txt"].2, b"world".to_vec());
        Ok(())
    }

    #[test]
    fn test_plain_tar_records_mtime() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = temp_dir.path().join("dated.txt");
        fs::write(&file, "x")?;
        let expected = unix_seconds(fs::metadata(&file)?.modified()?);

        let data = build(temp_dir.path(), Algorithm::None)?;
        let mut archive = Archive::new(data.as_slice());
        let entry = archive.entries()?.next().expect("one entry")?;
        assert_eq!(entry.header().mtime()?, expected);
        Ok(())
    }

    #[test]
    fn test_copy_stops_at_walked_size() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("grew.txt");
        fs::write(&path, "abcdef")?;
        let entry = Entry {
            relative_path: "grew.txt".to_string(),
            kind: crate::common::archive::walker::EntryKind::File { size: 3 },
            modified: SystemTime::now(),
            mode: FILE_MODE,
            source: path,
        };

        let stream = CompressedWriter::for_tar(Vec::new(), Algorithm::None, None)?;
        let mut writer: Box<dyn ContainerWriter<Vec<u8>>> = Box::new(TarContainer::new(stream));
        assert_eq!(writer.append(&entry)?, 3);
        let found = read_entries(writer.finish()?.as_slice())?;
        assert_eq!(found["grew.txt"].2, b"abc".to_vec());
        Ok(())
    }

    #[test]
    fn test_long_names_survive() -> Result<()> {
        let temp_dir = tempdir()?;
        let long_dir = "d".repeat(120);
        fs::create_dir(temp_dir.path().join(&long_dir))?;
        fs::write(temp_dir.path().join(&long_dir).join("f.txt"), "deep")?;

        let data = build(temp_dir.path(), Algorithm::None)?;
        let found = read_entries(data.as_slice())?;
        let file_name = format!("{}/f.txt", long_dir);
        assert_eq!(found[&file_name].2, b"deep".to_vec());
        assert!(found
            .keys()
            .any(|k| k.trim_end_matches('/') == long_dir));
        Ok(())
    }
}
