//! Shared fixtures: small price CSVs written into a temp directory.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two products, four countries (one unmapped), three weekly dates, plus a
/// handful of malformed fields.
pub const SAMPLE_CSV: &str = "\
 Country , Product , Date , Price
IT,Euro-super 95,01/01/2024,1.800
IT,Euro-super 95,08/01/2024,1.850
IT,Euro-super 95,15/01/2024,1.900
FR,Euro-super 95,01/01/2024,1.700
FR,Euro-super 95,08/01/2024,1.750
FR,Euro-super 95,15/01/2024,abc
DE,Euro-super 95,01/01/2024,1.600
DE,Euro-super 95,2024-01-08,1.650
DE,Euro-super 95,15/01/2024,1.700
XX,Euro-super 95,01/01/2024,1.500
IT,Automotive gas oil,01/01/2024,1.700
FR,Automotive gas oil,01/01/2024,1.600
";

/// Write `contents` as `prices.csv` in a fresh temp dir.
///
/// The caller keeps the `TempDir` alive for as long as the file is needed.
pub fn write_csv(contents: &str) -> (PathBuf, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.csv");
    fs::write(&path, contents).unwrap();
    (path, dir)
}

pub fn sample_csv() -> (PathBuf, TempDir) {
    write_csv(SAMPLE_CSV)
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
