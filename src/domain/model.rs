use crate::utils::error::{RedateError, Result};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of an encoded schedule timestamp (`YYDDDHHMMSS`).
pub const SKD_TIME_WIDTH: usize = 11;

/// Absolute UTC timestamp as written in `.skd` files: `YYDDDHHMMSS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkdTime(NaiveDateTime);

impl SkdTime {
    pub fn new(time: NaiveDateTime) -> Self {
        Self(time)
    }

    /// Parses the 11-digit field. Two-digit years pivot like `%y`:
    /// 69..=99 are 19xx, 00..=68 are 20xx.
    pub fn parse(field: &str) -> Result<Self> {
        let invalid = || RedateError::InvalidTimestamp {
            value: field.to_string(),
        };

        if field.len() != SKD_TIME_WIDTH || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let num = |range: std::ops::Range<usize>| -> Result<u32> {
            field[range].parse::<u32>().map_err(|_| invalid())
        };

        let yy = num(0..2)?;
        let year = (if yy >= 69 { 1900 + yy } else { 2000 + yy }) as i32;
        let date = NaiveDate::from_yo_opt(year, num(2..5)?).ok_or_else(invalid)?;
        let time = date
            .and_hms_opt(num(5..7)?, num(7..9)?, num(9..11)?)
            .ok_or_else(invalid)?;

        Ok(Self(time))
    }

    /// 編碼回固定 11 位數字，秒以下直接截去
    pub fn encode(&self) -> String {
        let t = &self.0;
        format!(
            "{:02}{:03}{:02}{:02}{:02}",
            t.year().rem_euclid(100),
            t.ordinal(),
            t.hour(),
            t.minute(),
            t.second()
        )
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Same elapsed offset from `reference`, re-anchored on `anchor`.
    pub fn shifted(&self, reference: SkdTime, anchor: SkdTime) -> SkdTime {
        SkdTime(anchor.0 + (self.0 - reference.0))
    }

    pub fn plus_seconds(&self, seconds: f64) -> SkdTime {
        SkdTime(self.0 + seconds_to_duration(seconds))
    }
}

impl From<NaiveDateTime> for SkdTime {
    fn from(time: NaiveDateTime) -> Self {
        Self(time)
    }
}

impl fmt::Display for SkdTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

pub fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::milliseconds((seconds * 1000.0).round() as i64)
}

pub fn duration_to_seconds(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

/// Session start and end from the `START` / `END` header records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionWindow {
    pub start: SkdTime,
    pub end: SkdTime,
}

impl SessionWindow {
    pub fn duration(&self) -> Duration {
        self.end.datetime() - self.start.datetime()
    }

    pub fn hours(&self) -> f64 {
        duration_to_seconds(self.duration()) / 3600.0
    }

    pub fn is_full_day(&self) -> bool {
        self.duration() == Duration::hours(24)
    }
}

/// One observation in the `$SKED` block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanRecord {
    pub start: SkdTime,
    pub duration_seconds: f64,
}

impl ScanRecord {
    pub fn end(&self) -> SkdTime {
        self.start.plus_seconds(self.duration_seconds)
    }
}

/// Right ascension as written in a `$SOURCE` record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RightAscension {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl RightAscension {
    const SECONDS_PRECISION: usize = 5;

    pub fn to_hours(&self) -> f64 {
        self.hours as f64 + self.minutes as f64 / 60.0 + self.seconds / 3600.0
    }

    /// Builds the sexagesimal value from decimal hours, wrapped into `[0, 24)`.
    pub fn from_hours(hours: f64) -> Self {
        let scale = 10f64.powi(Self::SECONDS_PRECISION as i32);
        // 先四捨五入到輸出精度，避免秒數印成 60.00000
        let mut total = (hours.rem_euclid(24.0) * 3600.0 * scale).round() / scale;
        if total >= 86_400.0 {
            total -= 86_400.0;
        }

        let whole = total.floor();
        let h = (whole / 3600.0).floor();
        let m = ((whole - h * 3600.0) / 60.0).floor();
        let s = total - h * 3600.0 - m * 60.0;

        Self {
            hours: h as u32,
            minutes: m as u32,
            seconds: s,
        }
    }

    pub fn rotated(&self, delta_hours: f64) -> Self {
        Self::from_hours(self.to_hours() + delta_hours)
    }

    pub fn hours_field(&self) -> String {
        format!("{:02}", self.hours)
    }

    pub fn minutes_field(&self) -> String {
        format!("{:02}", self.minutes)
    }

    pub fn seconds_field(&self) -> String {
        format!("{:.*}", Self::SECONDS_PRECISION, self.seconds)
    }
}

/// A `$SOURCE` line split around its three right-ascension numbers.
///
/// Display writes the line back with only the RA numbers re-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub(crate) prefix: String,
    pub ra: RightAscension,
    pub(crate) hour_minute_gap: String,
    pub(crate) minute_second_gap: String,
    pub(crate) suffix: String,
}

impl fmt::Display for SourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}{}",
            self.prefix,
            self.ra.hours_field(),
            self.hour_minute_gap,
            self.ra.minutes_field(),
            self.minute_second_gap,
            self.ra.seconds_field(),
            self.suffix
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Approach {
    /// Keep the sidereal start time, shift the clock time.
    Gmst,
    /// Keep the clock time, rotate source right ascensions.
    Sky,
    /// Reorder the scans of a 24-hour session.
    Rotate,
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Approach::Gmst => "gmst",
            Approach::Sky => "sky",
            Approach::Rotate => "rotate",
        };
        f.write_str(name)
    }
}

/// Time span covered by one of the restitched `$SKED` sub-blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockWindow {
    pub first_scan: SkdTime,
    pub last_scan_end: SkdTime,
    pub scans: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationSummary {
    pub chosen_scan: SkdTime,
    pub chosen_offset_seconds: f64,
    pub leading_block: BlockWindow,
    pub trailing_block: Option<BlockWindow>,
    /// Gap between the end of the leading block and the first trailing scan.
    pub turnaround_seconds: Option<f64>,
}

/// Diagnostics produced by one redate run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedateReport {
    pub approach: Approach,
    pub original_start: SkdTime,
    pub new_start: SkdTime,
    pub sidereal_residual_arcsec: Option<f64>,
    pub sidereal_shift_hours: Option<f64>,
    pub rotated_sources: Option<usize>,
    pub rotation: Option<RotationSummary>,
    pub output_path: Option<String>,
}

impl RedateReport {
    pub fn new(approach: Approach, original_start: SkdTime, new_start: SkdTime) -> Self {
        Self {
            approach,
            original_start,
            new_start,
            sidereal_residual_arcsec: None,
            sidereal_shift_hours: None,
            rotated_sources: None,
            rotation: None,
            output_path: None,
        }
    }
}
