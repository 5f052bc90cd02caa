//! # arcpack Container Dispatch (`common::archive::container`)
//!
//! File: cli/src/common/archive/container.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! The seam between the orchestrator and the concrete container writers.
//!
//! - `ContainerWriter` is implemented by `tar::TarContainer` and `zip::ZipContainer`.
//! - `Pipeline` is the tagged (container, compression) choice computed once from a
//!   `ValidatedArchive` by `dispatch`. Unavailable pipelines (LZMA inside ZIP) are
//!   rejected here, before the destination file exists.
//! - `open_container` builds the compression adapter and writer pair for a pipeline
//!   on top of the destination stream.
//!
use super::compression::{self, CompressedWriter, ZipCompression};
use super::matrix::Algorithm;
use super::request::ValidatedArchive;
use super::tar::TarContainer;
use super::walker::Entry;
use super::zip::ZipContainer;
use crate::core::error::{ArchiverError, Result};
use std::io::{self, Read, Seek, Write};

/// Writes framed entries into one archive.
pub trait ContainerWriter<W> {
    /// Writes `entry`'s header and content. Returns the number of content bytes copied.
    fn append(&mut self, entry: &Entry) -> Result<u64>;

    /// Writes the container trailer and any compressor footer, in that order,
    /// and returns the destination stream.
    fn finish(self: Box<Self>) -> Result<W>;
}

/// The container/compression pair an archive is written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Tar {
        algorithm: Algorithm,
        level: Option<u32>,
    },
    Zip(ZipCompression),
}

/// Selects the pipeline for a validated archive.
pub fn dispatch(archive: &ValidatedArchive) -> Result<Pipeline> {
    let pipeline = if archive.container.is_tar() {
        Pipeline::Tar {
            algorithm: archive.algorithm,
            level: archive.level,
        }
    } else {
        Pipeline::Zip(compression::zip_compression(archive.algorithm, archive.level)?)
    };
    Ok(pipeline)
}

/// Builds the writer chain for `pipeline` on top of `sink`.
pub fn open_container<W>(pipeline: Pipeline, sink: W) -> Result<Box<dyn ContainerWriter<W>>>
where
    W: Write + Seek + 'static,
{
    let writer: Box<dyn ContainerWriter<W>> = match pipeline {
        Pipeline::Tar { algorithm, level } => {
            let stream = CompressedWriter::for_tar(sink, algorithm, level)?;
            Box::new(TarContainer::new(stream))
        }
        Pipeline::Zip(compression) => Box::new(ZipContainer::new(sink, compression)),
    };
    Ok(writer)
}

/// Source reader that counts the bytes handed out.
pub(crate) struct CountingReader<R> {
    inner: R,
    count: u64,
}

impl<R: Read> CountingReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        CountingReader { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

/// Fails if a source file's length changed between the walk and the copy.
pub(crate) fn check_copied(entry: &Entry, copied: u64) -> Result<()> {
    if copied != entry.size() {
        anyhow::bail!(ArchiverError::write(
            format!("entry '{}'", entry.relative_path),
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "source changed size while archiving ({} bytes expected, {} copied)",
                    entry.size(),
                    copied
                ),
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::archive::matrix::ContainerType;
    use std::path::PathBuf;

    fn validated(container: ContainerType, algorithm: Algorithm) -> ValidatedArchive {
        ValidatedArchive {
            name: format!("a{}", container.suffix()),
            container,
            algorithm,
            level: None,
            output_path: PathBuf::from("unused"),
            sources: Vec::new(),
        }
    }

    #[test]
    fn test_dispatch_tar_family() {
        for (container, algorithm) in [
            (ContainerType::Tar, Algorithm::None),
            (ContainerType::TarGz, Algorithm::Gzip),
            (ContainerType::TarBz2, Algorithm::Bzip2),
            (ContainerType::TarXz, Algorithm::Xz),
        ] {
            assert_eq!(
                dispatch(&validated(container, algorithm)).unwrap(),
                Pipeline::Tar {
                    algorithm,
                    level: None
                }
            );
        }
    }

    #[test]
    fn test_dispatch_zip_lzma_is_unimplemented() {
        let err = dispatch(&validated(ContainerType::Zip, Algorithm::Lzma)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchiverError>(),
            Some(ArchiverError::Unimplemented(_))
        ));
    }

    #[test]
    fn test_counting_reader() {
        let mut reader = CountingReader::new(&b"12345"[..]);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(reader.count(), 5);
    }
}
