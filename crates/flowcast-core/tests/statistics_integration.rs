//! Integration tests for the cycle-time analytics pipeline: records in,
//! reconstruction, outlier filtering, aggregate snapshot out.

use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use flowcast_core::{
    backfill_story_points, IntervalReconstructor, OutlierFilter, StatisticsAnalyzer,
    StatusChangeEvent, WorkItem, WorkItemRecord,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
}

fn record(
    key: &str,
    points: Option<f64>,
    assignee: Option<&str>,
    completed_day: Option<u32>,
    progress_hours: i64,
) -> WorkItemRecord {
    let start = base();
    WorkItemRecord {
        key: key.to_string(),
        story_points: points,
        created_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
        completed_date: completed_day.map(|d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap()),
        assignee: assignee.map(str::to_string),
        description_length: 100,
        acceptance_criteria_length: 50,
        changelog: vec![
            StatusChangeEvent::new(start, "Backlog", "In Progress"),
            StatusChangeEvent::new(
                start + Duration::hours(progress_hours),
                "In Progress",
                "Done",
            ),
        ],
    }
}

fn build_items(records: Vec<WorkItemRecord>) -> Vec<WorkItem> {
    let reconstructor = IntervalReconstructor::new();
    let now = base() + Duration::days(60);
    records
        .into_iter()
        .map(|r| WorkItem::from_record(r, &reconstructor, now))
        .collect()
}

#[test]
fn full_pipeline_produces_consistent_snapshot() {
    let items = build_items(vec![
        record("A-1", Some(3.0), Some("kim"), Some(3), 4),
        record("A-2", Some(5.0), Some("kim"), Some(5), 8),
        record("A-3", None, Some("ada"), Some(7), 6),
    ]);

    let combined: HashSet<String> = ["In Progress".to_string()].into();
    let stats = StatisticsAnalyzer::with_combined(combined)
        .analyze(&items)
        .unwrap();

    let in_progress = &stats.cycle_time["In Progress"];
    assert_eq!(in_progress.count, 3);
    assert_eq!(in_progress.mean_secs, 6.0 * 3600.0);
    assert_eq!(in_progress.min_key, "A-1");
    assert_eq!(in_progress.max_key, "A-2");

    // Combined view selected only In Progress, so it matches per-status.
    let combined_stats = stats.combined.unwrap();
    assert_eq!(combined_stats.mean_secs, 6.0 * 3600.0);

    let range = stats.completion_range.unwrap();
    assert_eq!(range.first_key, "A-1");
    assert_eq!(range.last_key, "A-3");

    assert_eq!(stats.contributors.count, 2);
    assert_eq!(stats.transitions.total, 3);
    assert_eq!(stats.transitions.items_with_transitions, 3);
}

#[test]
fn backfilled_points_never_bias_the_sizing_average() {
    let mut items = build_items(vec![
        record("A-1", Some(3.0), None, None, 2),
        record("A-2", Some(5.0), None, None, 2),
        record("A-3", None, None, None, 2),
        record("A-4", None, None, None, 2),
        record("A-5", None, None, None, 2),
    ]);

    let summary = backfill_story_points(&mut items);
    assert_eq!(summary.average_used, 4.0);
    assert_eq!(summary.backfilled, 3);

    let stats = StatisticsAnalyzer::new().analyze(&items).unwrap();
    assert_eq!(stats.story_points.average_original, Some(4.0));
    assert_eq!(stats.story_points.total_all, 8.0 + 12.0);
    assert_eq!(stats.story_points.backfilled, 3);
}

#[test]
fn outlier_filtering_reports_exclusions_and_feeds_statistics() {
    let mut records: Vec<WorkItemRecord> = (1..=9)
        .map(|i| record(&format!("A-{i}"), None, None, Some(i), 10 + i as i64))
        .collect();
    records.push(record("A-slow", None, None, Some(15), 900));
    let items = build_items(records);

    let outcome = OutlierFilter::new().partition(items);
    assert_eq!(outcome.excluded.len(), 1);
    assert_eq!(outcome.excluded[0].key, "A-slow");

    let stats = StatisticsAnalyzer::new().analyze(&outcome.retained).unwrap();
    assert_eq!(stats.cycle_time["In Progress"].count, 9);
    assert!(stats.cycle_time["In Progress"].max_secs < 900.0 * 3600.0);
}

#[test]
fn correlations_survive_missing_attributes() {
    // Items start at different times, so their total cycle times (credited
    // up to the shared "now") differ. One item lacks story points; the
    // story-point correlation filters its pairs independently.
    let reconstructor = IntervalReconstructor::new();
    let now = base() + Duration::days(60);
    let make = |key: &str, points: Option<f64>, desc_len: usize, start_days: i64| {
        let start = base() + Duration::days(start_days);
        let record = WorkItemRecord {
            key: key.to_string(),
            story_points: points,
            created_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            completed_date: None,
            assignee: None,
            description_length: desc_len,
            acceptance_criteria_length: 50,
            changelog: vec![
                StatusChangeEvent::new(start, "Backlog", "In Progress"),
                StatusChangeEvent::new(start + Duration::hours(4), "In Progress", "Done"),
            ],
        };
        WorkItem::from_record(record, &reconstructor, now)
    };

    // Total cycle time is 60/50/40 days; description lengths are linear in
    // the same order, and the two surviving story-point pairs are too.
    let items = vec![
        make("A-1", Some(3.0), 300, 0),
        make("A-2", None, 200, 10),
        make("A-3", Some(1.0), 100, 20),
    ];

    let stats = StatisticsAnalyzer::new().analyze(&items).unwrap();
    assert!(stats.correlations.description_cycle_time.unwrap() > 0.99);
    assert!(stats.correlations.story_points_cycle_time.unwrap() > 0.99);
    // Acceptance-criteria length is constant: zero variance, undefined.
    assert!(stats.correlations.acceptance_criteria_cycle_time.is_none());
}
