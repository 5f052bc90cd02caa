//! # arcpack ZIP Container Writer (`common::archive::zip`)
//!
//! File: cli/src/common/archive/zip.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Writes `.zip` archives with the `zip` crate. Directories become `name/` marker
//! entries without content; files are streamed into an entry named by their
//! relative path. Compression is applied per entry by the method chosen when the
//! writer was created (`deflate`), so this writer has no separate compression step.
//!
//! File entries carry the source modification time (converted to the MS-DOS
//! local-time format with `chrono`) and unix permission bits. Files of 4 GiB or
//! more switch the entry to ZIP64.
//!
use super::compression::ZipCompression;
use super::container::{self, ContainerWriter, CountingReader};
use super::walker::Entry;
use crate::core::error::{ArchiverError, Result};
use chrono::{Datelike, Local, Timelike};
use std::io::{self, Read, Seek, Write};
use std::time::SystemTime;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{DateTime, ZipWriter};

/// Entries at least this large need ZIP64 extensions.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

pub struct ZipContainer<W: Write + Seek> {
    zip: ZipWriter<W>,
    compression: ZipCompression,
}

impl<W: Write + Seek> ZipContainer<W> {
    pub fn new(sink: W, compression: ZipCompression) -> Self {
        ZipContainer {
            zip: ZipWriter::new(sink),
            compression,
        }
    }

    fn options(&self, entry: &Entry) -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(self.compression.method)
            .compression_level(self.compression.level)
            .last_modified_time(zip_timestamp(entry.modified))
            .unix_permissions(entry.mode)
            .large_file(entry.size() >= ZIP64_THRESHOLD)
    }
}

impl<W: Write + Seek> ContainerWriter<W> for ZipContainer<W> {
    fn append(&mut self, entry: &Entry) -> Result<u64> {
        debug!("zip: {}", entry.relative_path);
        let options = self.options(entry);
        if entry.is_dir() {
            self.zip
                .add_directory(entry.relative_path.as_str(), options)
                .map_err(|e| zip_error(format!("directory '{}'", entry.relative_path), e))?;
            return Ok(0);
        }

        self.zip
            .start_file(entry.relative_path.as_str(), options)
            .map_err(|e| zip_error(format!("entry '{}'", entry.relative_path), e))?;
        let mut source = CountingReader::new(entry.open()?.take(entry.size()));
        io::copy(&mut source, &mut self.zip)
            .map_err(|e| ArchiverError::write(format!("entry '{}'", entry.relative_path), e))?;
        container::check_copied(entry, source.count())?;
        Ok(source.count())
    }

    fn finish(self: Box<Self>) -> Result<W> {
        let sink = self
            .zip
            .finish()
            .map_err(|e| zip_error("zip central directory", e))?;
        Ok(sink)
    }
}

/// Converts a modification time to a ZIP timestamp, clamping to the format's
/// 1980-2107 range by falling back to 1980-01-01.
fn zip_timestamp(time: SystemTime) -> DateTime {
    let local: chrono::DateTime<Local> = time.into();
    u16::try_from(local.year())
        .ok()
        .and_then(|year| {
            DateTime::from_date_and_time(
                year,
                local.month() as u8,
                local.day() as u8,
                local.hour() as u8,
                local.minute() as u8,
                local.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

fn zip_error(target: impl Into<String>, err: zip::result::ZipError) -> ArchiverError {
    ArchiverError::write(target, io::Error::new(io::ErrorKind::Other, err))
}
