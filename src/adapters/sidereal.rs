use crate::domain::ports::SiderealClock;
use astro::time::{julian_day, mn_sidr, CalType, Date};
use chrono::{Datelike, NaiveDateTime, Timelike};
use std::f64::consts::PI;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Mean Greenwich sidereal time from the `astro` crate, with UT1 taken equal to UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSiderealClock;

impl MeanSiderealClock {
    pub fn new() -> Self {
        Self
    }
}

impl SiderealClock for MeanSiderealClock {
    fn gmst_hours(&self, utc: NaiveDateTime) -> f64 {
        let jd = julian_day(&calendar_date(utc));
        // mn_sidr 回傳弧度，已限制在 [0, 2π)
        (mn_sidr(jd) * 12.0 / PI).rem_euclid(24.0)
    }
}

/// Gregorian date whose day carries the time of day as a fraction.
fn calendar_date(utc: NaiveDateTime) -> Date {
    Date {
        year: utc.year() as i16,
        month: utc.month() as u8,
        decimal_day: utc.day() as f64
            + utc.num_seconds_from_midnight() as f64 / SECONDS_PER_DAY,
        cal_type: CalType::Gregorian,
    }
}
