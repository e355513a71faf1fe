//! Per-contributor rollups.
//!
//! Only items that both have an assignee and are completed count toward a
//! contributor. Accumulation is upsert-style into private per-contributor
//! partials, so merge order cannot affect the averages.

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cycle::combined_cycle_time;
use crate::item::WorkItem;

/// Rollup for a single assignee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorStats {
    pub assignee: String,
    pub completed_count: u32,
    /// Sum of story points over completed items (missing points count 0)
    pub story_points: f64,
    /// Average time per status across this contributor's items, in seconds
    pub avg_cycle_times_secs: HashMap<String, f64>,
    /// Average combined-status time, when a combined set was requested
    pub avg_combined_secs: Option<f64>,
    pub first_completion: NaiveDate,
    pub last_completion: NaiveDate,
}

/// All contributor rollups for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributorReport {
    pub count: usize,
    /// Sorted by assignee name for stable output
    pub contributors: Vec<ContributorStats>,
}

struct Partial {
    completed_count: u32,
    story_points: f64,
    per_status: HashMap<String, (Duration, u32)>,
    combined: (Duration, u32),
    first_completion: NaiveDate,
    last_completion: NaiveDate,
}

pub(crate) fn contributor_report(
    items: &[WorkItem],
    combined_statuses: Option<&HashSet<String>>,
) -> ContributorReport {
    let mut partials: HashMap<&str, Partial> = HashMap::new();

    for item in items {
        let (Some(assignee), Some(completed)) = (item.assignee.as_deref(), item.completed_date)
        else {
            continue;
        };

        let partial = partials.entry(assignee).or_insert_with(|| Partial {
            completed_count: 0,
            story_points: 0.0,
            per_status: HashMap::new(),
            combined: (Duration::zero(), 0),
            first_completion: completed,
            last_completion: completed,
        });

        partial.completed_count += 1;
        partial.story_points += item.story_points.unwrap_or(0.0);
        partial.first_completion = partial.first_completion.min(completed);
        partial.last_completion = partial.last_completion.max(completed);

        for (status, duration) in &item.cycle_times {
            let slot = partial
                .per_status
                .entry(status.clone())
                .or_insert((Duration::zero(), 0));
            slot.0 = slot.0 + *duration;
            slot.1 += 1;
        }
        if let Some(statuses) = combined_statuses {
            let combined = combined_cycle_time(&item.cycle_times, statuses);
            partial.combined.0 = partial.combined.0 + combined;
            partial.combined.1 += 1;
        }
    }

    let mut contributors: Vec<ContributorStats> = partials
        .into_iter()
        .map(|(assignee, partial)| {
            let avg_cycle_times_secs = partial
                .per_status
                .into_iter()
                .map(|(status, (total, n))| {
                    (status, total.num_seconds() as f64 / n as f64)
                })
                .collect();
            let avg_combined_secs = (partial.combined.1 > 0)
                .then(|| partial.combined.0.num_seconds() as f64 / partial.combined.1 as f64);

            ContributorStats {
                assignee: assignee.to_string(),
                completed_count: partial.completed_count,
                story_points: partial.story_points,
                avg_cycle_times_secs,
                avg_combined_secs,
                first_completion: partial.first_completion,
                last_completion: partial.last_completion,
            }
        })
        .collect();
    contributors.sort_by(|a, b| a.assignee.cmp(&b.assignee));

    ContributorReport {
        count: contributors.len(),
        contributors,
    }
}
