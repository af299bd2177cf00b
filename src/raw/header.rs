//! Header detection and decoding
//!
//! The text preamble announces the shape of the binary body: variable count,
//! point count, variable names, and the sample width flag. Older simulators
//! write the preamble as single-byte ASCII, newer ones as little-endian
//! UTF-16; the variant is detected from the first two bytes and a single
//! line-decoding routine is parameterized by code-unit width.

use std::io::{ErrorKind, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::raw::RawError;

/// Header text encoding, detected from the first two bytes of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderEncoding {
    /// One byte per character
    Ascii,
    /// Two bytes per character, little-endian
    Utf16Le,
}

impl std::fmt::Display for HeaderEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderEncoding::Ascii => write!(f, "ascii"),
            HeaderEncoding::Utf16Le => write!(f, "utf16le"),
        }
    }
}

/// Width of the binary samples in columns 1..N.
///
/// Column 0 (time) is always 8 bytes regardless of this flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleWidth {
    /// 4-byte IEEE-754, widened to f64 on decode
    #[default]
    Single,
    /// 8-byte IEEE-754
    Double,
}

impl SampleWidth {
    /// Size of one sample on the wire, in bytes.
    pub fn bytes(self) -> usize {
        match self {
            SampleWidth::Single => 4,
            SampleWidth::Double => 8,
        }
    }
}

impl std::fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleWidth::Single => write!(f, "single (4-byte)"),
            SampleWidth::Double => write!(f, "double (8-byte)"),
        }
    }
}

/// Decoded header metadata. Built once per file, immutable afterwards.
#[derive(Debug, Clone)]
pub struct RawHeader {
    /// Detected text encoding of the preamble
    pub encoding: HeaderEncoding,

    /// Sample width of columns 1..N, from the `double` flag
    pub sample_width: SampleWidth,

    /// Number of columns, including time at column 0
    pub variable_count: usize,

    /// Number of rows in the binary body
    pub point_count: usize,

    /// Ordered variable names, one per column
    pub variables: Vec<String>,

    /// Simulation title, if the preamble carried one
    pub title: Option<String>,

    /// Plot name line, if present
    pub plotname: Option<String>,

    /// Simulation date line, if present
    pub date: Option<String>,
}

/// Read and parse the text preamble, leaving the reader positioned at the
/// first byte of the binary body.
pub fn read_header<R: Read>(reader: &mut R) -> Result<RawHeader, RawError> {
    let mut magic = [0u8; 2];
    reader.read_exact(&mut magic).map_err(|_| RawError::NotRawFile)?;

    if magic[0] != b'T' {
        return Err(RawError::NotRawFile);
    }

    // A NUL high byte after 'T' means 16-bit code units
    let encoding = if magic[1] == 0 {
        HeaderEncoding::Utf16Le
    } else {
        HeaderEncoding::Ascii
    };

    let lines = match encoding {
        HeaderEncoding::Ascii => read_ascii_lines(reader, magic[1])?,
        HeaderEncoding::Utf16Le => read_utf16_lines(reader)?,
    };

    parse_lines(encoding, lines)
}

/// Accumulate LF-terminated lines until the `Binary:` marker.
///
/// The two sniffed magic bytes are the start of the first line and are
/// re-seeded into the buffer here.
fn read_ascii_lines<R: Read>(reader: &mut R, second: u8) -> Result<Vec<String>, RawError> {
    let mut lines = Vec::new();
    let mut line = String::from("T");
    let mut pending = Some(second);

    loop {
        let byte = match pending.take() {
            Some(b) => b,
            None => reader.read_u8().map_err(map_header_eof)?,
        };

        if byte == b'\n' {
            if line == "Binary:" {
                return Ok(lines);
            }
            lines.push(std::mem::take(&mut line));
        } else {
            line.push(byte as char);
        }
    }
}

/// 16-bit variant of the line reader. Code units are combined into
/// characters before line splitting, so surrogate pairs survive.
fn read_utf16_lines<R: Read>(reader: &mut R) -> Result<Vec<String>, RawError> {
    let mut lines = Vec::new();
    let mut units: Vec<u16> = vec![u16::from(b'T')];

    loop {
        let unit = reader.read_u16::<LittleEndian>().map_err(map_header_eof)?;

        if unit == u16::from(b'\n') {
            let line = String::from_utf16_lossy(&units);
            units.clear();
            if line == "Binary:" {
                return Ok(lines);
            }
            lines.push(line);
        } else {
            units.push(unit);
        }
    }
}

fn map_header_eof(err: std::io::Error) -> RawError {
    if err.kind() == ErrorKind::UnexpectedEof {
        RawError::HeaderTruncated
    } else {
        RawError::Io(err)
    }
}

/// Parse the accumulated preamble lines by fixed textual prefixes.
/// Unrecognized lines are ignored.
fn parse_lines(encoding: HeaderEncoding, lines: Vec<String>) -> Result<RawHeader, RawError> {
    let mut sample_width = SampleWidth::Single;
    let mut variable_count: Option<usize> = None;
    let mut point_count: Option<usize> = None;
    let mut variables: Vec<String> = Vec::new();
    let mut title = None;
    let mut plotname = None;
    let mut date = None;

    let mut i = 0;
    while i < lines.len() {
        let line = &lines[i];

        if let Some(rest) = line.strip_prefix("Title:") {
            title = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Plotname:") {
            plotname = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Date:") {
            date = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Flags:") {
            for flag in rest.split_whitespace() {
                match flag {
                    "double" => sample_width = SampleWidth::Double,
                    "compressed" => return Err(RawError::CompressedUnsupported),
                    _ => {}
                }
            }
        } else if let Some(rest) = line.strip_prefix("No. Variables:") {
            let count: usize = rest
                .trim()
                .parse()
                .map_err(|_| RawError::MalformedHeader(line.clone()))?;
            if count == 0 {
                return Err(RawError::MalformedHeader(line.clone()));
            }
            variable_count = Some(count);
        } else if let Some(rest) = line.strip_prefix("No. Points:") {
            point_count = Some(
                rest.trim()
                    .parse()
                    .map_err(|_| RawError::MalformedHeader(line.clone()))?,
            );
        } else if line.starts_with("Variables:") {
            let count = variable_count.ok_or(RawError::MissingField("No. Variables"))?;
            for _ in 0..count {
                i += 1;
                let decl = lines.get(i).ok_or(RawError::VariableCountMismatch {
                    expected: count,
                    found: variables.len(),
                })?;
                // Declaration lines are tab-delimited; the name is the
                // third field ("\t<index>\t<name>\t<kind>")
                let name = decl
                    .split('\t')
                    .nth(2)
                    .ok_or_else(|| RawError::MalformedHeader(decl.clone()))?;
                variables.push(name.to_string());
            }
        }

        i += 1;
    }

    let variable_count = variable_count.ok_or(RawError::MissingField("No. Variables"))?;
    let point_count = point_count.ok_or(RawError::MissingField("No. Points"))?;
    if variables.len() != variable_count {
        return Err(RawError::VariableCountMismatch {
            expected: variable_count,
            found: variables.len(),
        });
    }

    Ok(RawHeader {
        encoding,
        sample_width,
        variable_count,
        point_count,
        variables,
        title,
        plotname,
        date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascii_header(flags: &str) -> Vec<u8> {
        let mut text = String::new();
        text.push_str("Title: * test circuit\n");
        text.push_str("Date: Thu Jun 12 10:00:00 2025\n");
        text.push_str("Plotname: Transient Analysis\n");
        text.push_str(&format!("Flags: {flags}\n"));
        text.push_str("No. Variables: 3\n");
        text.push_str("No. Points: 4\n");
        text.push_str("Variables:\n");
        text.push_str("\t0\ttime\ttime\n");
        text.push_str("\t1\tV(out)\tvoltage\n");
        text.push_str("\t2\tI(R1)\tdevice_current\n");
        text.push_str("Binary:\n");
        text.into_bytes()
    }

    fn utf16_bytes(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    #[test]
    fn test_parse_ascii_header() {
        let bytes = ascii_header("real forward");
        let header = read_header(&mut bytes.as_slice()).unwrap();

        assert_eq!(header.encoding, HeaderEncoding::Ascii);
        assert_eq!(header.sample_width, SampleWidth::Single);
        assert_eq!(header.variable_count, 3);
        assert_eq!(header.point_count, 4);
        assert_eq!(header.variables, vec!["time", "V(out)", "I(R1)"]);
        assert_eq!(header.title.as_deref(), Some("* test circuit"));
        assert_eq!(header.plotname.as_deref(), Some("Transient Analysis"));
    }

    #[test]
    fn test_double_flag_selects_wide_samples() {
        let bytes = ascii_header("real forward double");
        let header = read_header(&mut bytes.as_slice()).unwrap();
        assert_eq!(header.sample_width, SampleWidth::Double);
        assert_eq!(header.sample_width.bytes(), 8);
    }

    #[test]
    fn test_compressed_flag_is_rejected() {
        let bytes = ascii_header("real compressed");
        let err = read_header(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, RawError::CompressedUnsupported));
    }

    #[test]
    fn test_parse_utf16_header() {
        let text = "Title: wide\nNo. Variables: 2\nNo. Points: 1\nVariables:\n\t0\ttime\ttime\n\t1\tV(n1)\tvoltage\nBinary:\n";
        let bytes = utf16_bytes(text);
        let header = read_header(&mut bytes.as_slice()).unwrap();

        assert_eq!(header.encoding, HeaderEncoding::Utf16Le);
        assert_eq!(header.variable_count, 2);
        assert_eq!(header.variables, vec!["time", "V(n1)"]);
    }

    #[test]
    fn test_bad_magic_is_not_a_raw_file() {
        let err = read_header(&mut &b"Xitle: nope\n"[..]).unwrap_err();
        assert!(matches!(err, RawError::NotRawFile));

        let err = read_header(&mut &b"T"[..]).unwrap_err();
        assert!(matches!(err, RawError::NotRawFile));
    }

    #[test]
    fn test_header_without_binary_marker_is_truncated() {
        let err = read_header(&mut &b"Title: x\nNo. Variables: 1\n"[..]).unwrap_err();
        assert!(matches!(err, RawError::HeaderTruncated));
    }

    #[test]
    fn test_missing_counts_are_reported() {
        let bytes = b"Title: x\nBinary:\n".to_vec();
        let err = read_header(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, RawError::MissingField("No. Variables")));

        let bytes =
            b"Title: x\nNo. Variables: 1\nVariables:\n\t0\ttime\ttime\nBinary:\n".to_vec();
        let err = read_header(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, RawError::MissingField("No. Points")));
    }

    #[test]
    fn test_short_variable_list_is_a_mismatch() {
        let bytes =
            b"No. Variables: 2\nNo. Points: 1\nVariables:\n\t0\ttime\ttime\nBinary:\n".to_vec();
        let err = read_header(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            RawError::VariableCountMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_malformed_variable_declaration() {
        let bytes = b"No. Variables: 1\nNo. Points: 1\nVariables:\nnot tab delimited\nBinary:\n"
            .to_vec();
        let err = read_header(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, RawError::MalformedHeader(_)));
    }

    #[test]
    fn test_unknown_lines_are_ignored() {
        let bytes = b"Title: x\nCommand: sim -run\nOffset: 0\nNo. Variables: 1\nNo. Points: 0\nVariables:\n\t0\ttime\ttime\nBinary:\n".to_vec();
        let header = read_header(&mut bytes.as_slice()).unwrap();
        assert_eq!(header.variable_count, 1);
        assert_eq!(header.point_count, 0);
    }
}
