//! Shared helpers for CLI commands.

use std::path::Path;

use chrono::Utc;
use flowcast_core::{backfill_story_points, CountPolicy, IntervalReconstructor, WorkItem, WorkItemRecord};

/// Load an exported work-item snapshot and reconstruct cycle times against
/// the current instant.
pub fn load_items(path: &Path, story_points: bool) -> Result<Vec<WorkItem>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let records: Vec<WorkItemRecord> = serde_json::from_str(&json)?;

    let reconstructor = IntervalReconstructor::new();
    let now = Utc::now();
    let mut items: Vec<WorkItem> = records
        .into_iter()
        .map(|r| WorkItem::from_record(r, &reconstructor, now))
        .collect();

    if story_points {
        let summary = backfill_story_points(&mut items);
        if summary.backfilled > 0 {
            eprintln!(
                "backfilled {} items with the average of {:.2} story points",
                summary.backfilled, summary.average_used
            );
        }
    }
    Ok(items)
}

/// Counting policy for the throughput series.
pub fn count_policy(story_points: bool) -> CountPolicy {
    if story_points {
        CountPolicy::StoryPoints
    } else {
        CountPolicy::Items
    }
}

/// Unit label for forecast output.
pub fn unit(story_points: bool) -> &'static str {
    if story_points {
        "story points"
    } else {
        "items"
    }
}
