use crate::adapters::sidereal::MeanSiderealClock;
use crate::core::pipeline::{read_schedule, write_schedule};
use crate::domain::model::{Approach, RedateReport, SkdTime};
use crate::domain::ports::{ConfigProvider, Pipeline, SiderealClock, Storage, TransformResult};
use crate::domain::services::rotator::ScheduleRotator;
use crate::domain::services::schedule::{self, ScheduleDocument};
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Reorders the scans of a 24-hour session so it starts at `target`.
pub struct RotatePipeline<S: Storage, C: ConfigProvider, K: SiderealClock = MeanSiderealClock> {
    storage: S,
    config: C,
    clock: K,
    schedule_path: PathBuf,
    target: NaiveDateTime,
}

impl<S: Storage, C: ConfigProvider> RotatePipeline<S, C> {
    pub fn new<P: Into<PathBuf>>(
        storage: S,
        config: C,
        schedule_path: P,
        target: NaiveDateTime,
    ) -> Self {
        Self {
            storage,
            config,
            clock: MeanSiderealClock,
            schedule_path: schedule_path.into(),
            target,
        }
    }
}

impl<S: Storage, C: ConfigProvider, K: SiderealClock> RotatePipeline<S, C, K> {
    pub fn with_clock<K2: SiderealClock>(self, clock: K2) -> RotatePipeline<S, C, K2> {
        RotatePipeline {
            storage: self.storage,
            config: self.config,
            clock,
            schedule_path: self.schedule_path,
            target: self.target,
        }
    }
}

impl<S: Storage, C: ConfigProvider, K: SiderealClock> Pipeline for RotatePipeline<S, C, K> {
    fn approach(&self) -> Approach {
        Approach::Rotate
    }

    fn extract(&self) -> Result<ScheduleDocument> {
        read_schedule(&self.storage, &self.schedule_path)
    }

    fn transform(&self, mut document: ScheduleDocument) -> Result<TransformResult> {
        let original_start = schedule::session_start(document.lines())?;
        let new_start = SkdTime::new(self.target);

        let rotation = ScheduleRotator::new(&self.clock)
            .with_policy(self.config.turnaround_policy())
            .rotate(&mut document, new_start)?;

        let mut report = RedateReport::new(Approach::Rotate, original_start, new_start);
        report.rotation = Some(rotation);

        Ok(TransformResult { document, report })
    }

    fn load(&self, result: &TransformResult) -> Result<String> {
        write_schedule(
            &self.storage,
            &self.config,
            Approach::Rotate,
            &self.schedule_path,
            &result.document,
        )
    }
}
