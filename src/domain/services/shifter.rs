use crate::domain::model::SkdTime;
use crate::domain::services::schedule::{
    self, header_name, replace_timestamp, RecordPattern, ScheduleDocument, SKED_BLOCK,
};
use crate::utils::error::Result;

/// Which time-tagged records a shift touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftScope {
    /// First `START` and first `END` record.
    HeaderOnly,
    /// `PREOB` times inside `$SKED`.
    ScansOnly,
    All,
}

impl ShiftScope {
    fn header(&self) -> bool {
        matches!(self, ShiftScope::HeaderOnly | ShiftScope::All)
    }

    fn scans(&self) -> bool {
        matches!(self, ShiftScope::ScansOnly | ShiftScope::All)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftSummary {
    pub header_records: usize,
    pub scan_records: usize,
}

/// Moves records so that `reference` lands on `anchor`, keeping every elapsed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeShifter {
    reference: SkdTime,
    anchor: SkdTime,
}

impl TimeShifter {
    pub fn new(reference: SkdTime, anchor: SkdTime) -> Self {
        Self { reference, anchor }
    }

    /// Uses the document's `START` record as reference.
    pub fn from_session_start(document: &ScheduleDocument, anchor: SkdTime) -> Result<Self> {
        let reference = schedule::session_start(document.lines())?;
        Ok(Self::new(reference, anchor))
    }

    pub fn reference(&self) -> SkdTime {
        self.reference
    }

    pub fn anchor(&self) -> SkdTime {
        self.anchor
    }

    pub fn shift(&self, time: SkdTime) -> SkdTime {
        time.shifted(self.reference, self.anchor)
    }

    fn rewrite(&self, line: &mut String, pattern: RecordPattern) -> Result<bool> {
        let Some(old) = schedule::extract_timestamp(line, pattern)? else {
            return Ok(false);
        };
        if let Some(updated) = replace_timestamp(line, pattern, self.shift(old)) {
            *line = updated;
        }
        Ok(true)
    }

    pub fn apply(&self, document: &mut ScheduleDocument, scope: ShiftScope) -> Result<ShiftSummary> {
        let mut summary = ShiftSummary::default();
        let mut start_done = false;
        let mut end_done = false;
        let mut in_sked = false;

        for line in document.lines_mut() {
            // START 與 END 常在同一行，兩個都要檢查
            if scope.header() && !start_done && self.rewrite(line, RecordPattern::Start)? {
                start_done = true;
                summary.header_records += 1;
            }
            if scope.header() && !end_done && self.rewrite(line, RecordPattern::End)? {
                end_done = true;
                summary.header_records += 1;
            }

            if let Some(name) = header_name(line) {
                in_sked = name == SKED_BLOCK;
                continue;
            }

            if scope.scans() && in_sked && self.rewrite(line, RecordPattern::Scan)? {
                summary.scan_records += 1;
            }
        }

        tracing::debug!(
            "Shifted {} header and {} scan records ({} -> {})",
            summary.header_records,
            summary.scan_records,
            self.reference,
            self.anchor
        );
        Ok(summary)
    }

    /// Re-times every scan line of a detached `$SKED` slice.
    pub fn apply_to_scans(&self, lines: &mut [String]) -> Result<usize> {
        let mut count = 0;
        for line in lines.iter_mut() {
            if self.rewrite(line, RecordPattern::Scan)? {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RedateError;

    const SAMPLE: &str = "$PARAM\n\
START 21173180000  END 21174180000\n\
$SKED\n\
SRC1  10 SX PREOB 21173180000       30 MIDOB\n\
SRC2  10 SX PREOB 21174175500       60 MIDOB\n\
$FLUX\n\
SRC1  PREOB 21173180000 is not a scan here\n";

    fn t(s: &str) -> SkdTime {
        SkdTime::parse(s).unwrap()
    }

    #[test]
    fn test_shift_all_keeps_offsets() {
        let mut doc = ScheduleDocument::from_text(SAMPLE);
        let shifter = TimeShifter::from_session_start(&doc, t("21365120000")).unwrap();
        let summary = shifter.apply(&mut doc, ShiftScope::All).unwrap();

        assert_eq!(summary, ShiftSummary { header_records: 2, scan_records: 2 });
        let lines = doc.lines();
        assert_eq!(lines[1], "START 21365120000  END 22001120000\n");
        assert!(lines[3].contains("PREOB 21365120000       30"));
        assert!(lines[4].contains("PREOB 22001115500       60"));
        // $SKED 以外的行不動
        assert_eq!(lines[6], "SRC1  PREOB 21173180000 is not a scan here\n");
    }

    #[test]
    fn test_header_only_leaves_scans() {
        let mut doc = ScheduleDocument::from_text(SAMPLE);
        let shifter = TimeShifter::new(t("21173180000"), t("21173190000"));
        let summary = shifter.apply(&mut doc, ShiftScope::HeaderOnly).unwrap();

        assert_eq!(summary.scan_records, 0);
        assert_eq!(doc.lines()[1], "START 21173190000  END 21174190000\n");
        assert!(doc.lines()[3].contains("PREOB 21173180000"));
    }

    #[test]
    fn test_scans_only_leaves_header() {
        let mut doc = ScheduleDocument::from_text(SAMPLE);
        let shifter = TimeShifter::new(t("21173180000"), t("21173190000"));
        shifter.apply(&mut doc, ShiftScope::ScansOnly).unwrap();

        assert_eq!(doc.lines()[1], "START 21173180000  END 21174180000\n");
        assert!(doc.lines()[3].contains("PREOB 21173190000"));
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        let doc = ScheduleDocument::from_text("$SKED\nnothing\n");
        assert!(matches!(
            TimeShifter::from_session_start(&doc, t("21173180000")),
            Err(RedateError::MissingRecord { .. })
        ));
    }

    #[test]
    fn test_apply_to_scans_slice() {
        let mut lines = vec![
            "A  10 SX PREOB 21173180000  30\n".to_string(),
            "comment line\n".to_string(),
            "B  10 SX PREOB 21173181000  30\n".to_string(),
        ];
        let shifter = TimeShifter::new(t("21173180000"), t("21200000000"));
        assert_eq!(shifter.apply_to_scans(&mut lines).unwrap(), 2);
        assert!(lines[0].contains("21200000000"));
        assert_eq!(lines[1], "comment line\n");
        assert!(lines[2].contains("21200001000"));
    }
}
