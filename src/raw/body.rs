//! Binary body decoding into a column-major matrix
//!
//! The wire format is row-major: an 8-byte little-endian time stamp followed
//! by one sample per remaining column, 4 or 8 bytes wide. Samples are stored
//! per column so that later column reductions touch contiguous memory.

use std::io::{ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::raw::{RawError, RawHeader, SampleWidth};

/// Column-major sample storage. Column 0 is time.
///
/// Immutable after construction; every column holds exactly
/// `point_count` values.
#[derive(Debug, Clone)]
pub struct Matrix {
    columns: Vec<Vec<f64>>,
}

impl Matrix {
    /// Build a matrix directly from columns. All columns must have the
    /// same length.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Matrix {
        if let Some(first) = columns.first() {
            assert!(
                columns.iter().all(|c| c.len() == first.len()),
                "matrix columns must have equal lengths"
            );
        }
        Matrix { columns }
    }

    /// Number of columns, including time.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn point_count(&self) -> usize {
        self.columns.first().map(Vec::len).unwrap_or(0)
    }

    /// One column's samples.
    pub fn column(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    /// The time column.
    pub fn time(&self) -> &[f64] {
        self.column(0)
    }
}

/// Read the binary body into a matrix, using the shape announced by the
/// header. A short read aborts the whole decode; no partial matrix is
/// ever returned.
pub fn read_body<R: Read>(reader: &mut R, header: &RawHeader) -> Result<Matrix, RawError> {
    let cols = header.variable_count;
    let rows = header.point_count;
    let mut columns = vec![vec![0.0f64; rows]; cols];

    for row in 0..rows {
        columns[0][row] = reader
            .read_f64::<LittleEndian>()
            .map_err(|e| map_body_err(e, row, 0))?;

        for col in 1..cols {
            let value = match header.sample_width {
                SampleWidth::Double => reader.read_f64::<LittleEndian>(),
                SampleWidth::Single => reader.read_f32::<LittleEndian>().map(f64::from),
            };
            columns[col][row] = value.map_err(|e| map_body_err(e, row, col))?;
        }
    }

    Ok(Matrix { columns })
}

fn map_body_err(err: std::io::Error, row: usize, col: usize) -> RawError {
    if err.kind() == ErrorKind::UnexpectedEof {
        RawError::Truncated { row, col }
    } else {
        RawError::Io(err)
    }
}
