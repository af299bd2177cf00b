//! Raw file decoding - format detection, header parsing, binary body reading
//!
//! A raw file interleaves a short text preamble with a large binary body of
//! time-series samples. The preamble exists in two incompatible encodings
//! (single-byte ASCII and little-endian UTF-16) and the body in two sample
//! widths (4-byte and 8-byte IEEE-754), all detected at decode time.

pub mod body;
pub mod header;

pub use body::Matrix;
pub use header::{HeaderEncoding, RawHeader, SampleWidth};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

/// Errors raised while decoding a raw file.
///
/// All variants are fatal to the decode: a structurally corrupt file never
/// yields a partial matrix.
#[derive(Debug, Error)]
pub enum RawError {
    #[error("not a raw file (bad or missing header magic)")]
    NotRawFile,

    #[error("unexpected end of header")]
    HeaderTruncated,

    #[error("required header field missing: {0}")]
    MissingField(&'static str),

    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),

    #[error("header declares {expected} variables but lists {found}")]
    VariableCountMismatch { expected: usize, found: usize },

    #[error("compressed raw files are not supported")]
    CompressedUnsupported,

    #[error("file truncated in binary body at row {row}, column {col}")]
    Truncated { row: usize, col: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A fully decoded raw file: header metadata plus the sample matrix.
#[derive(Debug, Clone)]
pub struct RawFile {
    pub header: RawHeader,
    pub matrix: Matrix,
}

/// Decode a complete raw file from any byte source.
///
/// The header is read line by line up to the `Binary:` marker; the binary
/// body starts at the byte where line reading stopped.
pub fn decode<R: Read>(reader: R) -> Result<RawFile, RawError> {
    let mut reader = BufReader::new(reader);
    let header = header::read_header(&mut reader)?;
    let matrix = body::read_body(&mut reader, &header)?;
    Ok(RawFile { header, matrix })
}

/// Decode a raw file from a path.
///
/// The file handle is released as soon as decoding completes or fails.
pub fn read_file(path: &Path) -> Result<RawFile, RawError> {
    let file = File::open(path)?;
    decode(file)
}

/// Decode a raw file from standard input.
pub fn read_stdin() -> Result<RawFile, RawError> {
    decode(std::io::stdin().lock())
}
