//! In-memory doubles and small schedules for the pipeline unit tests.

use crate::domain::model::Approach;
use crate::domain::ports::{ConfigProvider, SiderealClock, Storage};
use crate::domain::services::rotator::TurnaroundPolicy;
use crate::utils::error::{RedateError, Result};
use chrono::{NaiveDateTime, Timelike};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// 24-hour session, one scan every four hours.
pub const FULL_SESSION: &str = "\
$EXPER R4999
$PARAM
SCHEDULER  TST  CORRELATOR   TST  START 21173180000 END 21174180000
$SOURCE
 0552+398 $         5 55 30.80561207  39 48 49.1649670 2000.0 0.0
 1749+096 $        17 51 32.81857318   9 39  0.7284190 2000.0 0.0
$SKED
0552+398  10 SX PREOB 21173180000      300 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000 1F000000
1749+096  10 SX PREOB 21173220000      300 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000 1F000000
0552+398  10 SX PREOB 21174020000      300 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000 1F000000
1749+096  10 SX PREOB 21174060000      300 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000 1F000000
0552+398  10 SX PREOB 21174100000      300 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000 1F000000
1749+096  10 SX PREOB 21174140000      300 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000 1F000000
$HEAD
";

/// One-hour intensive.
pub const SHORT_SESSION: &str = "\
$EXPER I21173
$PARAM
SCHEDULER  TST  CORRELATOR   TST  START 21173183000 END 21173193000
$SOURCE
 0552+398 $         5 55 30.80561207  39 48 49.1649670 2000.0 0.0
 1749+096 $        17 51 32.81857318   9 39  0.7284190 2000.0 0.0
$SKED
0552+398  10 SX PREOB 21173183000       60 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000
1749+096  10 SX PREOB 21173184500       60 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000
0552+398  10 SX PREOB 21173190000       60 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000
1749+096  10 SX PREOB 21173191500       60 MIDOB         0 POSTOB K-W-|Y-|V- 1F000000 1F000000
$HEAD
";

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(path: &str, content: &str) -> Self {
        let storage = Self::new();
        storage
            .files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.as_bytes().to_vec());
        storage
    }

    pub fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

impl Storage for MockStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| RedateError::FileNotFound {
                path: path.display().to_string(),
            })
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub directory: Option<PathBuf>,
    pub policy: TurnaroundPolicy,
}

impl ConfigProvider for MockConfig {
    fn output_suffix(&self, approach: Approach) -> &str {
        match approach {
            Approach::Gmst => "_gmst",
            Approach::Sky => "_sky",
            Approach::Rotate => "_rot",
        }
    }

    fn output_directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    fn turnaround_policy(&self) -> TurnaroundPolicy {
        self.policy
    }
}

/// Sidereal time equal to the UTC time of day, so expected results are exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolarClock;

impl SiderealClock for SolarClock {
    fn gmst_hours(&self, utc: NaiveDateTime) -> f64 {
        utc.num_seconds_from_midnight() as f64 / 3600.0
    }
}
