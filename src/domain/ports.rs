use crate::domain::model::{Approach, RedateReport};
use crate::domain::services::rotator::TurnaroundPolicy;
use crate::domain::services::schedule::ScheduleDocument;
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use std::path::Path;

pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn output_suffix(&self, approach: Approach) -> &str;
    fn output_directory(&self) -> Option<&Path>;
    fn turnaround_policy(&self) -> TurnaroundPolicy;
}

/// Mean Greenwich sidereal time of a UTC timestamp, in hours `[0, 24)`.
pub trait SiderealClock {
    fn gmst_hours(&self, utc: NaiveDateTime) -> f64;
}

impl<K: SiderealClock + ?Sized> SiderealClock for &K {
    fn gmst_hours(&self, utc: NaiveDateTime) -> f64 {
        (**self).gmst_hours(utc)
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub document: ScheduleDocument,
    pub report: RedateReport,
}

pub trait Pipeline {
    fn approach(&self) -> Approach;
    fn extract(&self) -> Result<ScheduleDocument>;
    fn transform(&self, document: ScheduleDocument) -> Result<TransformResult>;
    fn load(&self, result: &TransformResult) -> Result<String>;
}
