//! # arcpack Compression Adapters (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//! Author: Christi Mahu
//! Repository: https://github.com/christimahu/arcpack
//!
//! ## Overview
//!
//! Stream transforms interposed between a container writer and the destination
//! file.
//!
//! - **TAR family**: `CompressedWriter` wraps the destination stream *before* the
//!   TAR builder is created. `none` passes bytes through; `gzip` (`flate2`),
//!   `bzip2` (`bzip2`) and `xz` (`xz2`) encode them. `finish` writes the
//!   compressor's footer and hands back the inner stream, so the caller can close
//!   the chain inner-to-outer: TAR trailer, then compressor footer, then file.
//! - **ZIP**: compression happens per entry inside the `zip` crate.
//!   `zip_compression` resolves the method for an algorithm; `deflate` is the only
//!   implemented method and `lzma` fails with `ArchiverError::Unimplemented`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::archive::compression::CompressedWriter;
//! use crate::common::archive::matrix::Algorithm;
//! # use crate::core::error::Result;
//! # fn run() -> Result<()> {
//! let mut sink = CompressedWriter::for_tar(Vec::new(), Algorithm::Gzip, Some(9))?;
//! std::io::Write::write_all(&mut sink, b"tar bytes")?;
//! let gz_bytes: Vec<u8> = sink.finish()?;
//! # Ok(())
//! # }
//! ```
//!
use super::matrix::Algorithm;
use crate::core::error::{ArchiverError, Result};
use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use std::io::{self, Write};
use tracing::debug;
use xz2::write::XzEncoder;
use zip::CompressionMethod;

/// Preset used by `xz` when no level is requested.
const XZ_DEFAULT_PRESET: u32 = 6;

/// Output stream of a TAR builder, optionally compressed.
pub enum CompressedWriter<W: Write> {
    Plain(W),
    Gzip(GzEncoder<W>),
    Bzip2(BzEncoder<W>),
    Xz(XzEncoder<W>),
}

impl<W: Write> CompressedWriter<W> {
    /// Wraps `inner` with the stream compressor for `algorithm`.
    ///
    /// Only the TAR algorithms (`none`, `gzip`, `bzip2`, `xz`) are stream
    /// compressors; anything else is rejected.
    pub fn for_tar(inner: W, algorithm: Algorithm, level: Option<u32>) -> Result<Self> {
        debug!("Opening {} stream (level {:?})", algorithm, level);
        let writer = match algorithm {
            Algorithm::None => CompressedWriter::Plain(inner),
            Algorithm::Gzip => {
                let compression = level
                    .map(flate2::Compression::new)
                    .unwrap_or_default();
                CompressedWriter::Gzip(GzEncoder::new(inner, compression))
            }
            Algorithm::Bzip2 => {
                // bzip2 block sizes run from 1 to 9.
                let compression = level
                    .map(|l| bzip2::Compression::new(l.clamp(1, 9)))
                    .unwrap_or_default();
                CompressedWriter::Bzip2(BzEncoder::new(inner, compression))
            }
            Algorithm::Xz => {
                CompressedWriter::Xz(XzEncoder::new(inner, level.unwrap_or(XZ_DEFAULT_PRESET)))
            }
            Algorithm::Deflate | Algorithm::Lzma => {
                anyhow::bail!(ArchiverError::UnsupportedAlgorithm {
                    algorithm: algorithm.to_string(),
                    container: "tar stream".into(),
                })
            }
        };
        Ok(writer)
    }

    /// Writes the compressor footer (if any) and returns the wrapped stream.
    pub fn finish(self) -> io::Result<W> {
        match self {
            CompressedWriter::Plain(mut inner) => {
                inner.flush()?;
                Ok(inner)
            }
            CompressedWriter::Gzip(encoder) => encoder.finish(),
            CompressedWriter::Bzip2(encoder) => encoder.finish(),
            CompressedWriter::Xz(encoder) => encoder.finish(),
        }
    }
}

impl<W: Write> Write for CompressedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            CompressedWriter::Plain(w) => w.write(buf),
            CompressedWriter::Gzip(w) => w.write(buf),
            CompressedWriter::Bzip2(w) => w.write(buf),
            CompressedWriter::Xz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            CompressedWriter::Plain(w) => w.flush(),
            CompressedWriter::Gzip(w) => w.flush(),
            CompressedWriter::Bzip2(w) => w.flush(),
            CompressedWriter::Xz(w) => w.flush(),
        }
    }
}

/// Per-entry compression settings for ZIP archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipCompression {
    pub method: CompressionMethod,
    pub level: Option<i64>,
}

/// Resolves the ZIP compression method for `algorithm`.
pub fn zip_compression(algorithm: Algorithm, level: Option<u32>) -> Result<ZipCompression> {
    match algorithm {
        Algorithm::Deflate => Ok(ZipCompression {
            method: CompressionMethod::Deflated,
            // The zip crate accepts deflate levels 1 through 9.
            level: level.map(|l| i64::from(l.clamp(1, 9))),
        }),
        Algorithm::Lzma => Err(ArchiverError::Unimplemented(
            "LZMA compression for ZIP archives".into(),
        )
        .into()),
        other => Err(ArchiverError::UnsupportedAlgorithm {
            algorithm: other.to_string(),
            container: ".zip".into(),
        }
        .into()),
    }
}
