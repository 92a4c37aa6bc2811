//! Line-oriented view of a `.skd` schedule.
//!
//! Blocks start at a line whose trimmed content begins with `$` and run until
//! the next such line. Boundaries are recomputed on every lookup.

use crate::domain::model::{ScanRecord, SessionWindow, SkdTime};
use crate::utils::error::{RedateError, Result};
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

pub const SKED_BLOCK: &str = "SKED";
pub const SOURCE_BLOCK: &str = "SOURCE";

/// Whitespace token index of the scan duration in a `$SKED` line.
const SCAN_DURATION_TOKEN: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleDocument {
    lines: Vec<String>,
}

impl ScheduleDocument {
    /// Lines keep their terminators so untouched lines are written back byte for byte.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            RedateError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        Ok(Self::from_text(text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [String] {
        &mut self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn replace_range(&mut self, range: Range<usize>, replacement: Vec<String>) {
        self.lines.splice(range, replacement);
    }

    pub fn to_text(&self) -> String {
        self.lines.concat()
    }
}

/// Bounds of a named block: the header line and its content lines `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub header: usize,
    pub start: usize,
    pub end: usize,
}

impl BlockSpan {
    pub fn content(&self) -> Range<usize> {
        self.start..self.end
    }
}

static START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bSTART\s+(\d{11})\b").expect("START pattern is a valid regex"));
static END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bEND\s+(\d{11})\b").expect("END pattern is a valid regex"));
static SCAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bPREOB\s+(\d{11})\b").expect("PREOB pattern is a valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPattern {
    Start,
    End,
    Scan,
}

impl RecordPattern {
    pub fn label(&self) -> &'static str {
        match self {
            RecordPattern::Start => "START",
            RecordPattern::End => "END",
            RecordPattern::Scan => "PREOB",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            RecordPattern::Start => &START_REGEX,
            RecordPattern::End => &END_REGEX,
            RecordPattern::Scan => &SCAN_REGEX,
        }
    }
}

/// Header name of a `$` line, e.g. `SKED` for `$SKED`.
pub fn header_name(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let rest = trimmed.strip_prefix('$')?;
    Some(rest.split_whitespace().next().unwrap_or(""))
}

pub fn locate_block(lines: &[String], name: &str) -> Option<BlockSpan> {
    let mut current: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        let Some(header) = header_name(line) else {
            continue;
        };
        if let Some(header_idx) = current {
            return Some(BlockSpan {
                header: header_idx,
                start: header_idx + 1,
                end: idx,
            });
        }
        if header == name {
            current = Some(idx);
        }
    }

    current.map(|header_idx| BlockSpan {
        header: header_idx,
        start: header_idx + 1,
        end: lines.len(),
    })
}

/// Byte range of the timestamp field matched by `pattern`.
pub fn timestamp_span(line: &str, pattern: RecordPattern) -> Option<Range<usize>> {
    pattern
        .regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.range())
}

/// `Ok(None)` when the pattern is absent; an error when the field is present but not a valid time.
pub fn extract_timestamp(line: &str, pattern: RecordPattern) -> Result<Option<SkdTime>> {
    match timestamp_span(line, pattern) {
        Some(span) => SkdTime::parse(&line[span]).map(Some),
        None => Ok(None),
    }
}

/// Re-encodes the matched timestamp field, leaving the rest of the line as is.
pub fn replace_timestamp(line: &str, pattern: RecordPattern, time: SkdTime) -> Option<String> {
    let span = timestamp_span(line, pattern)?;
    let mut updated = String::with_capacity(line.len());
    updated.push_str(&line[..span.start]);
    updated.push_str(&time.encode());
    updated.push_str(&line[span.end..]);
    Some(updated)
}

pub fn find_first_match(
    lines: &[String],
    pattern: RecordPattern,
) -> Result<Option<(usize, SkdTime)>> {
    for (idx, line) in lines.iter().enumerate() {
        if let Some(time) = extract_timestamp(line, pattern)? {
            return Ok(Some((idx, time)));
        }
    }
    Ok(None)
}

pub fn find_last_match(
    lines: &[String],
    pattern: RecordPattern,
) -> Result<Option<(usize, SkdTime)>> {
    for (idx, line) in lines.iter().enumerate().rev() {
        if let Some(time) = extract_timestamp(line, pattern)? {
            return Ok(Some((idx, time)));
        }
    }
    Ok(None)
}

pub fn session_start(lines: &[String]) -> Result<SkdTime> {
    find_first_match(lines, RecordPattern::Start)?
        .map(|(_, time)| time)
        .ok_or_else(|| RedateError::missing(RecordPattern::Start.label(), "schedule"))
}

pub fn session_window(lines: &[String]) -> Result<SessionWindow> {
    let start = session_start(lines)?;
    let end = find_first_match(lines, RecordPattern::End)?
        .map(|(_, time)| time)
        .ok_or_else(|| RedateError::missing(RecordPattern::End.label(), "schedule"))?;
    Ok(SessionWindow { start, end })
}

/// Parses a `$SKED` scan line. `Ok(None)` when the line carries no `PREOB` time.
pub fn parse_scan(line: &str) -> Result<Option<ScanRecord>> {
    let Some(start) = extract_timestamp(line, RecordPattern::Scan)? else {
        return Ok(None);
    };

    let duration_seconds = line
        .split_whitespace()
        .nth(SCAN_DURATION_TOKEN)
        .and_then(|token| token.parse::<f64>().ok())
        .ok_or_else(|| RedateError::missing("scan duration", line.trim_end()))?;

    Ok(Some(ScanRecord {
        start,
        duration_seconds,
    }))
}

/// Scan records of a line slice, with their index in that slice.
pub fn scans_in(lines: &[String]) -> Result<Vec<(usize, ScanRecord)>> {
    let mut scans = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if let Some(scan) = parse_scan(line)? {
            scans.push((idx, scan));
        }
    }
    Ok(scans)
}

/// Scan records of the `$SKED` block, indexed by document line.
pub fn scan_records(lines: &[String]) -> Result<Vec<(usize, ScanRecord)>> {
    let block = locate_block(lines, SKED_BLOCK)
        .ok_or_else(|| RedateError::missing("$SKED", "schedule"))?;
    Ok(scans_in(&lines[block.content()])?
        .into_iter()
        .map(|(idx, scan)| (block.start + idx, scan))
        .collect())
}
