use crate::domain::model::{RightAscension, SourceRecord};
use crate::domain::services::schedule::{self, ScheduleDocument, SOURCE_BLOCK};
use crate::utils::error::{RedateError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Name, alias, RA `h m s.sss`, then declination `±d m s.sss`.
static SOURCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\S*\s+\S+\s+(\d+)\s+(\d+)\s+(\d+\.\d+)\s+[+\d-]*\s+\d+\s+\d+\.\d+")
        .expect("source pattern is a valid regex")
});

/// Splits a `$SOURCE` line into a [`SourceRecord`]; `Ok(None)` if it is not a source line.
pub fn parse_source(line: &str) -> Result<Option<SourceRecord>> {
    let Some(caps) = SOURCE_REGEX.captures(line) else {
        return Ok(None);
    };
    let (Some(h), Some(m), Some(s)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        return Ok(None);
    };

    let invalid = || RedateError::missing("right ascension", line.trim_end());
    let ra = RightAscension {
        hours: h.as_str().parse().map_err(|_| invalid())?,
        minutes: m.as_str().parse().map_err(|_| invalid())?,
        seconds: s.as_str().parse().map_err(|_| invalid())?,
    };

    Ok(Some(SourceRecord {
        prefix: line[..h.start()].to_string(),
        ra,
        hour_minute_gap: line[h.end()..m.start()].to_string(),
        minute_second_gap: line[m.end()..s.start()].to_string(),
        suffix: line[s.end()..].to_string(),
    }))
}

/// Rotates source right ascensions by a sidereal-time difference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRotator {
    delta_hours: f64,
}

impl SourceRotator {
    pub fn new(delta_hours: f64) -> Self {
        Self { delta_hours }
    }

    /// Delta that moves the sky seen at `original_gmst` to `target_gmst`.
    pub fn from_sidereal(original_gmst: f64, target_gmst: f64) -> Self {
        Self::new(target_gmst - original_gmst)
    }

    pub fn delta_hours(&self) -> f64 {
        self.delta_hours
    }

    pub fn rotate_record(&self, record: &SourceRecord) -> SourceRecord {
        SourceRecord {
            ra: record.ra.rotated(self.delta_hours),
            ..record.clone()
        }
    }

    /// Rewrites every source record in `$SOURCE`; returns how many were rotated.
    pub fn apply(&self, document: &mut ScheduleDocument) -> Result<usize> {
        let block = schedule::locate_block(document.lines(), SOURCE_BLOCK)
            .ok_or_else(|| RedateError::missing("$SOURCE", "schedule"))?;

        let mut rotated = 0;
        for line in &mut document.lines_mut()[block.content()] {
            if let Some(record) = parse_source(line)? {
                let updated = self.rotate_record(&record);
                tracing::debug!(
                    "RA {:.6} h -> {:.6} h",
                    record.ra.to_hours(),
                    updated.ra.to_hours()
                );
                *line = updated.to_string();
                rotated += 1;
            }
        }

        if rotated == 0 {
            return Err(RedateError::missing("source", "$SOURCE block"));
        }
        tracing::info!("🌌 Rotated {} sources by {:.6} h", rotated, self.delta_hours);
        Ok(rotated)
    }
}
