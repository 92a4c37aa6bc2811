//! Coarse-to-fine search for the UTC time of day with a given sidereal time.
//!
//! Hour scan, then minute scan, then an exhaustive second scan. Each phase
//! narrows the bracket for the next one; the last phase keeps the true
//! minimum so a target sitting on a window edge is still found.

use crate::domain::ports::SiderealClock;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::ops::Range;

/// Hour-phase band, in sidereal hours.
const HOUR_TOLERANCE: f64 = 1.1;
const MINUTE_TOLERANCE: f64 = HOUR_TOLERANCE / 60.0;

/// Offsets scanned around the bracket in the minute and second phases.
fn refine_window() -> Range<i64> {
    -5..65
}

/// Signed sidereal difference `a - b` wrapped into `[-12, 12)` hours.
pub fn sidereal_delta(a: f64, b: f64) -> f64 {
    (a - b + 12.0).rem_euclid(24.0) - 12.0
}

/// What the hour phase does when no hour lands inside the tolerance band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourFallback {
    /// Continue from 23:00 of the target date.
    LastHour,
}

impl HourFallback {
    fn bracket_hour(&self) -> i64 {
        match self {
            HourFallback::LastHour => 23,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    pub time: NaiveDateTime,
    /// `|sidereal(time) - target|` in hours.
    pub residual_hours: f64,
    pub fallback_used: Option<HourFallback>,
    /// The match sits before midnight of the requested date.
    pub previous_day: bool,
    pub evaluations: usize,
}

impl SearchOutcome {
    pub fn residual_arcsec(&self) -> f64 {
        self.residual_hours * 3600.0
    }
}

pub struct TimeSearch<K: SiderealClock> {
    clock: K,
    fallback: HourFallback,
}

impl<K: SiderealClock> TimeSearch<K> {
    pub fn new(clock: K) -> Self {
        Self {
            clock,
            fallback: HourFallback::LastHour,
        }
    }

    /// Finds the time on `date` whose sidereal time matches `target_hours`.
    pub fn find(&self, date: NaiveDate, target_hours: f64) -> SearchOutcome {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        let mut evaluations = 0;
        let mut delta_at = |time: NaiveDateTime| {
            evaluations += 1;
            sidereal_delta(self.clock.gmst_hours(time), target_hours)
        };

        // 小時：找第一個落在容忍帶內的小時，往回退一格
        let crossing_hour = (0..24).find(|&h| {
            let delta = delta_at(midnight + Duration::hours(h));
            0.0 < delta && delta < HOUR_TOLERANCE
        });
        let (bracket, fallback_used) = match crossing_hour {
            Some(h) => (midnight + Duration::hours(h - 1), None),
            None => {
                tracing::warn!(
                    "No hour of {} within {:.1} h of GMST {:.6}, continuing from {:02}:00",
                    date,
                    HOUR_TOLERANCE,
                    target_hours,
                    self.fallback.bracket_hour()
                );
                (
                    midnight + Duration::hours(self.fallback.bracket_hour()),
                    Some(self.fallback),
                )
            }
        };

        // 分鐘
        let bracket = refine_window()
            .find(|&m| {
                let delta = delta_at(bracket + Duration::minutes(m));
                0.0 < delta && delta < MINUTE_TOLERANCE
            })
            .map(|m| bracket + Duration::minutes(m - 1))
            .unwrap_or(bracket);

        // 秒：整個窗口取最小值
        let mut best = bracket;
        let mut residual = f64::INFINITY;
        for s in refine_window() {
            let candidate = bracket + Duration::seconds(s);
            let delta = delta_at(candidate).abs();
            if delta < residual {
                best = candidate;
                residual = delta;
            }
        }

        tracing::info!(
            "🎯 Best match for {} is {} with GMST offset of {:.4} arcsec",
            date,
            best.time(),
            residual * 3600.0
        );
        let previous_day = best.date() < date;
        if previous_day {
            tracing::warn!(
                "⚠️ GMST {:.6} h is reached just before midnight, new start moves to {}",
                target_hours,
                best
            );
        }

        SearchOutcome {
            time: best,
            residual_hours: residual,
            fallback_used,
            previous_day,
            evaluations,
        }
    }
}
