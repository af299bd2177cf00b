//! Shared test helpers for integration tests
//!
//! Builds synthetic raw files (both header encodings, both sample widths)
//! so the CLI can be exercised end to end without simulator output.

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get an rdt command
pub fn rdt() -> Command {
    Command::new(cargo::cargo_bin!("rdt"))
}

/// Sample width of the encoded binary body
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Single,
    Double,
}

/// Encode the text preamble lines shared by both header variants.
fn header_text(names: &[&str], points: usize, flags: &str) -> String {
    let mut text = String::new();
    text.push_str("Title: * synthetic test circuit\n");
    text.push_str("Date: Thu Jun 12 10:00:00 2025\n");
    text.push_str("Plotname: Transient Analysis\n");
    text.push_str(&format!("Flags: {flags}\n"));
    text.push_str(&format!("No. Variables: {}\n", names.len()));
    text.push_str(&format!("No. Points: {points}\n"));
    text.push_str("Variables:\n");
    for (i, name) in names.iter().enumerate() {
        let kind = if i == 0 { "time" } else { "voltage" };
        text.push_str(&format!("\t{i}\t{name}\t{kind}\n"));
    }
    text.push_str("Binary:\n");
    text
}

fn append_body(out: &mut Vec<u8>, columns: &[Vec<f64>], width: Width) {
    let points = columns[0].len();
    for row in 0..points {
        out.extend_from_slice(&columns[0][row].to_le_bytes());
        for col in columns.iter().skip(1) {
            match width {
                Width::Double => out.extend_from_slice(&col[row].to_le_bytes()),
                Width::Single => out.extend_from_slice(&(col[row] as f32).to_le_bytes()),
            }
        }
    }
}

/// Build a complete raw file with an ASCII header.
pub fn encode_ascii_raw(names: &[&str], columns: &[Vec<f64>], width: Width) -> Vec<u8> {
    let flags = match width {
        Width::Double => "real forward double",
        Width::Single => "real forward",
    };
    let mut out = header_text(names, columns[0].len(), flags).into_bytes();
    append_body(&mut out, columns, width);
    out
}

/// Build a complete raw file with a little-endian UTF-16 header.
pub fn encode_utf16_raw(names: &[&str], columns: &[Vec<f64>], width: Width) -> Vec<u8> {
    let flags = match width {
        Width::Double => "real forward double",
        Width::Single => "real forward",
    };
    let mut out: Vec<u8> = header_text(names, columns[0].len(), flags)
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    append_body(&mut out, columns, width);
    out
}

/// Write raw file bytes into a temp dir and return the path.
pub fn write_raw(tmp: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = tmp.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Two-run fixture with a measurement column and paired spec limits.
///
/// V(out) varies around 5.0; V(out_min) and V(out_max) carry the constant
/// limits 4.5 and 5.5.
pub fn spec_limit_fixture() -> Vec<u8> {
    let time = vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0];
    let vout = vec![4.9, 5.0, 5.1, 5.0, 4.8, 5.2, 5.0, 5.0];
    let vmin = vec![4.5; 8];
    let vmax = vec![5.5; 8];
    encode_ascii_raw(
        &["time", "V(out)", "V(out_min)", "V(out_max)"],
        &[time, vout, vmin, vmax],
        Width::Double,
    )
}

/// Two-run square wave fixture with exact 50% duty.
pub fn square_wave_fixture() -> Vec<u8> {
    let mut time = Vec::new();
    let mut wave = Vec::new();
    for _ in 0..2 {
        for i in 0..100usize {
            time.push(i as f64);
            wave.push(if i % 20 < 10 { 0.0 } else { 1.0 });
        }
    }
    encode_ascii_raw(&["time", "V(sq)"], &[time, wave], Width::Double)
}
