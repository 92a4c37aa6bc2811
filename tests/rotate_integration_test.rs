mod support;

use chrono::Duration;
use skd_redate::domain::services::schedule;
use skd_redate::{LocalStorage, RedateEngine, RedateError, RotatePipeline, TomlConfig};
use std::fs;
use std::path::Path;
use support::{FULL_DAY, INTENSIVE};

fn files_in(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_rotate_full_day_for_every_month() {
    let (_dir, input) = support::workspace_with(FULL_DAY);
    let original = support::load(&input);
    let before = support::scans(&original);
    let mut durations_before: Vec<u64> = before.iter().map(|s| s.duration_seconds as u64).collect();
    durations_before.sort_unstable();

    for month in 1..=12 {
        let target = support::utc(2021, month, 10, 12, 0, 0);
        let pipeline =
            RotatePipeline::new(LocalStorage::new(), TomlConfig::default(), &input, target);
        let report = RedateEngine::new(pipeline).run().unwrap();
        let output = support::load(Path::new(report.output_path.as_deref().unwrap()));

        let window = schedule::session_window(output.lines()).unwrap();
        assert_eq!(window.start.datetime(), target);
        assert_eq!(window.end.datetime(), target + Duration::hours(24));

        let after = support::scans(&output);
        assert_eq!(after.len(), before.len(), "month {}", month);
        assert_eq!(after[0].start.datetime(), target);
        assert!(
            after.windows(2).all(|w| w[0].start <= w[1].start),
            "month {}: scans out of order",
            month
        );

        let mut durations_after: Vec<u64> = after.iter().map(|s| s.duration_seconds as u64).collect();
        durations_after.sort_unstable();
        assert_eq!(durations_after, durations_before);

        let rotation = report.rotation.unwrap();
        // 掃描間隔 20 分鐘，最近的掃描不會超過半個間隔
        assert!(rotation.chosen_offset_seconds < 610.0);
        if let Some(gap) = rotation.turnaround_seconds {
            assert!(gap >= 0.0);
        }
    }
}

#[test]
fn test_rotate_rejects_intensive_without_output() {
    let (dir, input) = support::workspace_with(INTENSIVE);

    let target = support::utc(2021, 7, 9, 6, 0, 0);
    let pipeline = RotatePipeline::new(LocalStorage::new(), TomlConfig::default(), &input, target);
    let err = RedateEngine::new(pipeline).run().unwrap_err();

    assert!(matches!(err, RedateError::SessionTooShort { hours } if hours == 1.0));
    assert_eq!(files_in(dir.path()), 1);
}

#[test]
fn test_reject_policy_leaves_no_output() {
    let (dir, input) = support::workspace_with(FULL_DAY);
    let settings = TomlConfig::from_toml_str(
        r#"
[rotation]
min_turnaround_seconds = 86400
on_insufficient_turnaround = "reject"
"#,
    )
    .unwrap();

    let target = support::utc(2021, 7, 9, 6, 0, 0);
    let pipeline = RotatePipeline::new(LocalStorage::new(), settings, &input, target);
    let report_path = dir.path().join("report.json");
    let err = RedateEngine::new(pipeline)
        .with_report(Some(&report_path))
        .run()
        .unwrap_err();

    assert!(matches!(err, RedateError::InsufficientTurnaround { .. }));
    assert_eq!(files_in(dir.path()), 1);
}

#[test]
fn test_warn_policy_still_writes_output() {
    let (dir, input) = support::workspace_with(FULL_DAY);
    let settings = TomlConfig::from_toml_str(
        r#"
[rotation]
min_turnaround_seconds = 86400
"#,
    )
    .unwrap();

    let target = support::utc(2021, 7, 9, 6, 0, 0);
    let pipeline = RotatePipeline::new(LocalStorage::new(), settings, &input, target);
    let report = RedateEngine::new(pipeline).run().unwrap();

    assert!(report.rotation.unwrap().trailing_block.is_some());
    assert!(dir.path().join("r4999_rot.skd").exists());
}
