//! CLI tests - decoding, info, export, completions, error handling

mod common;

use common::{encode_ascii_raw, encode_utf16_raw, rdt, write_raw, Width};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_info_shows_header_metadata() {
    let tmp = TempDir::new().unwrap();
    let bytes = encode_ascii_raw(
        &["time", "V(out)"],
        &[vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]],
        Width::Single,
    );
    let path = write_raw(&tmp, "sim.raw", &bytes);

    rdt()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("encoding:  ascii"))
        .stdout(predicate::str::contains("samples:   single (4-byte)"))
        .stdout(predicate::str::contains("variables: 2"))
        .stdout(predicate::str::contains("points:    3"))
        .stdout(predicate::str::contains("runs:      1"))
        .stdout(predicate::str::contains("V(out)"))
        .stdout(predicate::str::contains("Transient Analysis"));
}

#[test]
fn test_info_detects_utf16_header() {
    let tmp = TempDir::new().unwrap();
    let bytes = encode_utf16_raw(
        &["time", "V(n1)"],
        &[vec![0.0, 1.0], vec![5.0, 5.0]],
        Width::Double,
    );
    let path = write_raw(&tmp, "wide.raw", &bytes);

    rdt()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("encoding:  utf16le"))
        .stdout(predicate::str::contains("samples:   double (8-byte)"));
}

#[test]
fn test_info_counts_runs() {
    let tmp = TempDir::new().unwrap();
    let bytes = encode_ascii_raw(
        &["time", "V(a)"],
        &[
            vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0],
            vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
        ],
        Width::Double,
    );
    let path = write_raw(&tmp, "runs.raw", &bytes);

    rdt()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("runs:      2"));
}

#[test]
fn test_info_reads_stdin() {
    let bytes = encode_ascii_raw(
        &["time", "V(a)"],
        &[vec![0.0, 1.0], vec![1.0, 1.0]],
        Width::Single,
    );

    rdt()
        .args(["info", "-"])
        .write_stdin(bytes)
        .assert()
        .success()
        .stdout(predicate::str::contains("variables: 2"));
}

#[test]
fn test_export_round_trips_values() {
    let tmp = TempDir::new().unwrap();
    let bytes = encode_ascii_raw(
        &["time", "V(out)"],
        &[vec![0.0, 1.0], vec![2.5, -3.5]],
        Width::Double,
    );
    let path = write_raw(&tmp, "sim.raw", &bytes);

    rdt()
        .arg("export")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("time,V(out)"))
        .stdout(predicate::str::contains("0,2.5"))
        .stdout(predicate::str::contains("1,-3.5"));
}

#[test]
fn test_export_row_count_matches_points() {
    let tmp = TempDir::new().unwrap();
    let points = 10;
    let time: Vec<f64> = (0..points).map(|i| i as f64).collect();
    let values = vec![1.0; points];
    let bytes = encode_ascii_raw(&["time", "V(a)"], &[time, values], Width::Single);
    let path = write_raw(&tmp, "sim.raw", &bytes);

    let output = rdt().arg("export").arg(&path).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    // Header line plus one line per point
    assert_eq!(stdout.lines().count(), points + 1);
}

#[test]
fn test_bad_magic_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = write_raw(&tmp, "bogus.raw", b"not a raw file at all\n");

    rdt()
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a raw file"));
}

#[test]
fn test_compressed_files_fail_during_header_parse() {
    let tmp = TempDir::new().unwrap();
    let text = "Title: x\nFlags: real compressed\nNo. Variables: 2\nNo. Points: 1\nVariables:\n\t0\ttime\ttime\n\t1\tV(a)\tvoltage\nBinary:\n";
    let path = write_raw(&tmp, "comp.raw", text.as_bytes());

    rdt()
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "compressed raw files are not supported",
        ));
}

#[test]
fn test_truncated_body_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut bytes = encode_ascii_raw(
        &["time", "V(a)", "V(b)"],
        &[
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0; 4],
            vec![2.0; 4],
        ],
        Width::Single,
    );
    // Drop the final byte of the body
    bytes.pop();
    let path = write_raw(&tmp, "short.raw", &bytes);

    rdt()
        .arg("stats")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("truncated"));
}

#[test]
fn test_missing_file_is_reported() {
    rdt()
        .args(["info", "/nonexistent/path.raw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode"));
}

#[test]
fn test_completions_generate() {
    rdt()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rdt"));
}
