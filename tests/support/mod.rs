#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use skd_redate::domain::model::ScanRecord;
use skd_redate::domain::services::schedule::{self, ScheduleDocument};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 24-hour session starting 2021-06-22 18:00 UTC, 72 scans.
pub const FULL_DAY: &str = "r4999.skd";
/// One-hour intensive starting 2021-06-22 18:30 UTC.
pub const INTENSIVE: &str = "i21173.skd";

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copies a fixture into a fresh temp directory so outputs land next to it.
pub fn workspace_with(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    fs::copy(fixture(name), &path).unwrap();
    (dir, path)
}

pub fn load(path: &Path) -> ScheduleDocument {
    ScheduleDocument::from_text(&fs::read_to_string(path).unwrap())
}

pub fn scans(document: &ScheduleDocument) -> Vec<ScanRecord> {
    schedule::scan_records(document.lines())
        .unwrap()
        .into_iter()
        .map(|(_, scan)| scan)
        .collect()
}

/// Lines of a `$` block, header excluded.
pub fn block(document: &ScheduleDocument, name: &str) -> Vec<String> {
    let span = schedule::locate_block(document.lines(), name).unwrap();
    document.lines()[span.content()].to_vec()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}
