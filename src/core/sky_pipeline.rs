use crate::adapters::sidereal::MeanSiderealClock;
use crate::core::pipeline::{read_schedule, write_schedule};
use crate::domain::model::{Approach, RedateReport, SkdTime};
use crate::domain::ports::{ConfigProvider, Pipeline, SiderealClock, Storage, TransformResult};
use crate::domain::services::schedule::{self, ScheduleDocument};
use crate::domain::services::shifter::{ShiftScope, TimeShifter};
use crate::domain::services::sky::SourceRotator;
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Starts the session at exactly `target`, rotating every source's RA by the
/// sidereal difference so the sky geometry at each scan is unchanged.
pub struct SkyPipeline<S: Storage, C: ConfigProvider, K: SiderealClock = MeanSiderealClock> {
    storage: S,
    config: C,
    clock: K,
    schedule_path: PathBuf,
    target: NaiveDateTime,
}

impl<S: Storage, C: ConfigProvider> SkyPipeline<S, C> {
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

impl<S: Storage, C: ConfigProvider, K: SiderealClock> SkyPipeline<S, C, K> {
    pub fn with_clock<K2: SiderealClock>(self, clock: K2) -> SkyPipeline<S, C, K2> {
        SkyPipeline {
            storage: self.storage,
            config: self.config,
            clock,
            schedule_path: self.schedule_path,
            target: self.target,
        }
    }
}

impl<S: Storage, C: ConfigProvider, K: SiderealClock> Pipeline for SkyPipeline<S, C, K> {
    fn approach(&self) -> Approach {
        Approach::Sky
    }

    fn extract(&self) -> Result<ScheduleDocument> {
        read_schedule(&self.storage, &self.schedule_path)
    }

    fn transform(&self, mut document: ScheduleDocument) -> Result<TransformResult> {
        let original_start = schedule::session_start(document.lines())?;
        let new_start = SkdTime::new(self.target);

        let original_gmst = self.clock.gmst_hours(original_start.datetime());
        let target_gmst = self.clock.gmst_hours(new_start.datetime());
        tracing::info!(
            "GMST {:.6} h at {} -> {:.6} h at {}",
            original_gmst,
            original_start,
            target_gmst,
            new_start
        );

        let rotator = SourceRotator::from_sidereal(original_gmst, target_gmst);
        let rotated_sources = rotator.apply(&mut document)?;
        TimeShifter::new(original_start, new_start).apply(&mut document, ShiftScope::All)?;

        let mut report = RedateReport::new(Approach::Sky, original_start, new_start);
        report.sidereal_shift_hours = Some(rotator.delta_hours());
        report.rotated_sources = Some(rotated_sources);

        Ok(TransformResult { document, report })
    }

    fn load(&self, result: &TransformResult) -> Result<String> {
        write_schedule(
            &self.storage,
            &self.config,
            Approach::Sky,
            &self.schedule_path,
            &result.document,
        )
    }
}
