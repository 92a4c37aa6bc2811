//! Reorders a 24-hour `$SKED` block so it starts at the scan whose sidereal
//! time best matches the new start, wrapping the earlier scans to the end.

use crate::domain::model::{
    duration_to_seconds, BlockWindow, RotationSummary, ScanRecord, SkdTime,
};
use crate::domain::ports::SiderealClock;
use crate::domain::services::schedule::{self, ScheduleDocument, SKED_BLOCK};
use crate::domain::services::search::sidereal_delta;
use crate::domain::services::shifter::{ShiftScope, TimeShifter};
use crate::utils::error::{RedateError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnaroundAction {
    /// Log the short gap and keep going.
    #[default]
    Warn,
    Reject,
}

/// Minimum gap required between the end of the leading block and the first
/// scan of the wrapped block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnaroundPolicy {
    pub min_seconds: f64,
    pub action: TurnaroundAction,
}

impl Default for TurnaroundPolicy {
    fn default() -> Self {
        Self {
            min_seconds: 0.0,
            action: TurnaroundAction::Warn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestScan {
    /// Index inside the `$SKED` content lines.
    pub index: usize,
    pub scan: ScanRecord,
    pub offset_hours: f64,
}

/// Scan whose sidereal time is closest to `target_hours`; ties keep the earlier scan.
pub fn nearest_scan<K: SiderealClock>(
    clock: &K,
    scans: &[(usize, ScanRecord)],
    target_hours: f64,
) -> Option<NearestScan> {
    let mut best: Option<NearestScan> = None;
    for &(index, scan) in scans {
        let offset = sidereal_delta(clock.gmst_hours(scan.start.datetime()), target_hours).abs();
        if best.map_or(true, |b| offset < b.offset_hours) {
            best = Some(NearestScan {
                index,
                scan,
                offset_hours: offset,
            });
        }
    }
    best
}

fn block_window(lines: &[String]) -> Result<Option<BlockWindow>> {
    let scans = schedule::scans_in(lines)?;
    let (Some((_, first)), Some((_, last))) = (scans.first(), scans.last()) else {
        return Ok(None);
    };
    Ok(Some(BlockWindow {
        first_scan: first.start,
        last_scan_end: last.end(),
        scans: scans.len(),
    }))
}

pub struct ScheduleRotator<K: SiderealClock> {
    clock: K,
    policy: TurnaroundPolicy,
}

impl<K: SiderealClock> ScheduleRotator<K> {
    pub fn new(clock: K) -> Self {
        Self {
            clock,
            policy: TurnaroundPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TurnaroundPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Rotates the session to start at `target_start`. The document is only
    /// replaced once every step succeeded.
    pub fn rotate(
        &self,
        document: &mut ScheduleDocument,
        target_start: SkdTime,
    ) -> Result<RotationSummary> {
        let window = schedule::session_window(document.lines())?;
        if !window.is_full_day() {
            tracing::error!("Rotating a schedule only works for 24-hour sessions");
            return Err(RedateError::SessionTooShort {
                hours: window.hours(),
            });
        }

        let target_gmst = self.clock.gmst_hours(target_start.datetime());
        tracing::info!("New start time {} is at GMST {:.6}", target_start, target_gmst);

        let sked = schedule::locate_block(document.lines(), SKED_BLOCK)
            .ok_or_else(|| RedateError::missing("$SKED", "schedule"))?;
        let block = &document.lines()[sked.content()];
        let scans = schedule::scans_in(block)?;
        let nearest = nearest_scan(&self.clock, &scans, target_gmst)
            .ok_or_else(|| RedateError::missing("PREOB scan", "$SKED block"))?;
        tracing::info!(
            "Scan at {} matches new start GMST best (offset = {:.2} sec)",
            nearest.scan.start,
            nearest.offset_hours * 3600.0
        );

        // A：選中的掃描到結尾；B：開頭到選中的掃描之前
        let mut leading = block[nearest.index..].to_vec();
        let mut trailing = block[..nearest.index].to_vec();
        tracing::info!(
            "Splitting $SKED into {} lines from {} and {} lines before it",
            leading.len(),
            nearest.scan.start,
            trailing.len()
        );

        TimeShifter::new(nearest.scan.start, target_start).apply_to_scans(&mut leading)?;

        let trailing_scans = schedule::scans_in(&trailing)?;
        if let (Some((_, first)), Some((_, last))) = (trailing_scans.first(), trailing_scans.last())
        {
            let span = last.end().datetime() - first.start.datetime();
            let anchor = SkdTime::new(target_start.datetime() + Duration::hours(24) - span);
            tracing::info!("Wrapped block now starts at {}", anchor);
            TimeShifter::new(first.start, anchor).apply_to_scans(&mut trailing)?;
        }

        let leading_block = block_window(&leading)?
            .ok_or_else(|| RedateError::missing("PREOB scan", "rotated $SKED block"))?;
        let trailing_block = block_window(&trailing)?;
        let turnaround_seconds = trailing_block.map(|b| {
            duration_to_seconds(b.first_scan.datetime() - leading_block.last_scan_end.datetime())
        });

        if let (Some(gap), Some(wrapped)) = (turnaround_seconds, trailing_block) {
            tracing::info!(
                "Turnaround between {} and {} is {:.0} s",
                leading_block.last_scan_end,
                wrapped.first_scan,
                gap
            );
            self.check_turnaround(gap)?;
        }

        let mut rotated = document.clone();
        leading.append(&mut trailing);
        rotated.replace_range(sked.content(), leading);
        TimeShifter::new(window.start, target_start).apply(&mut rotated, ShiftScope::HeaderOnly)?;
        *document = rotated;

        Ok(RotationSummary {
            chosen_scan: nearest.scan.start,
            chosen_offset_seconds: nearest.offset_hours * 3600.0,
            leading_block,
            trailing_block,
            turnaround_seconds,
        })
    }

    fn check_turnaround(&self, gap_seconds: f64) -> Result<()> {
        if gap_seconds >= self.policy.min_seconds {
            return Ok(());
        }
        match self.policy.action {
            TurnaroundAction::Warn => {
                tracing::warn!(
                    "⚠️ Only {:.0} s between rotated blocks (minimum {:.0} s), check slew time",
                    gap_seconds,
                    self.policy.min_seconds
                );
                Ok(())
            }
            TurnaroundAction::Reject => Err(RedateError::InsufficientTurnaround {
                gap_seconds,
                required_seconds: self.policy.min_seconds,
            }),
        }
    }
}
