use crate::adapters::sidereal::MeanSiderealClock;
use crate::core::pipeline::{read_schedule, write_schedule};
use crate::domain::model::{Approach, RedateReport, SkdTime};
use crate::domain::ports::{ConfigProvider, Pipeline, SiderealClock, Storage, TransformResult};
use crate::domain::services::schedule::{self, ScheduleDocument};
use crate::domain::services::search::TimeSearch;
use crate::domain::services::shifter::{ShiftScope, TimeShifter};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::path::PathBuf;

/// Moves the session to `target_date` at the clock time whose sidereal time
/// matches the original start.
pub struct GmstPipeline<S: Storage, C: ConfigProvider, K: SiderealClock = MeanSiderealClock> {
    storage: S,
    config: C,
    clock: K,
    schedule_path: PathBuf,
    target_date: NaiveDate,
}

impl<S: Storage, C: ConfigProvider> GmstPipeline<S, C> {
    pub fn new<P: Into<PathBuf>>(
        storage: S,
        config: C,
        schedule_path: P,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            storage,
            config,
            clock: MeanSiderealClock,
            schedule_path: schedule_path.into(),
            target_date,
        }
    }
}

impl<S: Storage, C: ConfigProvider, K: SiderealClock> GmstPipeline<S, C, K> {
    pub fn with_clock<K2: SiderealClock>(self, clock: K2) -> GmstPipeline<S, C, K2> {
        GmstPipeline {
            storage: self.storage,
            config: self.config,
            clock,
            schedule_path: self.schedule_path,
            target_date: self.target_date,
        }
    }
}

impl<S: Storage, C: ConfigProvider, K: SiderealClock> Pipeline for GmstPipeline<S, C, K> {
    fn approach(&self) -> Approach {
        Approach::Gmst
    }

    fn extract(&self) -> Result<ScheduleDocument> {
        read_schedule(&self.storage, &self.schedule_path)
    }

    fn transform(&self, mut document: ScheduleDocument) -> Result<TransformResult> {
        let original_start = schedule::session_start(document.lines())?;
        let original_gmst = self.clock.gmst_hours(original_start.datetime());
        tracing::info!(
            "Session start time in skd file is {} (GMST {:.6} h)",
            original_start,
            original_gmst
        );

        let outcome = TimeSearch::new(&self.clock).find(self.target_date, original_gmst);
        let new_start = SkdTime::new(outcome.time);

        let summary =
            TimeShifter::new(original_start, new_start).apply(&mut document, ShiftScope::All)?;
        tracing::info!(
            "🔄 New start {}: shifted {} header and {} scan records",
            new_start,
            summary.header_records,
            summary.scan_records
        );

        let mut report = RedateReport::new(Approach::Gmst, original_start, new_start);
        report.sidereal_residual_arcsec = Some(outcome.residual_arcsec());

        Ok(TransformResult { document, report })
    }

    fn load(&self, result: &TransformResult) -> Result<String> {
        write_schedule(
            &self.storage,
            &self.config,
            Approach::Gmst,
            &self.schedule_path,
            &result.document,
        )
    }
}
