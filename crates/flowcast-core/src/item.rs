//! Work item data model.
//!
//! A [`WorkItemRecord`] is the plain, already-deserialized shape the
//! tracker collaborator hands over; fetching, pagination and auth are its
//! concern. A [`WorkItem`] is the analyzed form with reconstructed cycle
//! times, built against an explicit evaluation instant so the library never
//! reads the system clock itself.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::cycle::IntervalReconstructor;

/// A single status transition parsed from an item's changelog.
///
/// Input order is not guaranteed chronological; reconstruction sorts by
/// timestamp before folding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    /// When the transition happened (UTC)
    pub at: DateTime<Utc>,
    /// Status the item left
    pub from: String,
    /// Status the item entered
    pub to: String,
}

impl StatusChangeEvent {
    pub fn new(at: DateTime<Utc>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            at,
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Accumulated time per status, additive across visits.
pub type CycleTimeMap = HashMap<String, Duration>;

/// Raw work item record as handed over by the tracker collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItemRecord {
    /// Stable unique identifier (e.g. "PROJ-123")
    pub key: String,
    #[serde(default)]
    pub story_points: Option<f64>,
    pub created_date: NaiveDate,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub description_length: usize,
    #[serde(default)]
    pub acceptance_criteria_length: usize,
    /// Status transitions, in no particular order
    #[serde(default)]
    pub changelog: Vec<StatusChangeEvent>,
}

/// A work item with reconstructed per-status cycle times.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub key: String,
    pub story_points: Option<f64>,
    pub created_date: NaiveDate,
    pub completed_date: Option<NaiveDate>,
    pub assignee: Option<String>,
    pub description_length: usize,
    pub acceptance_criteria_length: usize,
    /// Accumulated time per status
    pub cycle_times: CycleTimeMap,
    /// How often the tracked transition (e.g. Backlog -> In Progress) fired
    pub tracked_transitions: u32,
    /// False when the story-point value was backfilled from the average
    pub original_story_points: bool,
}

impl WorkItem {
    /// Build a work item from a raw record, reconstructing its cycle times
    /// against the supplied evaluation instant.
    pub fn from_record(
        record: WorkItemRecord,
        reconstructor: &IntervalReconstructor,
        now: DateTime<Utc>,
    ) -> Self {
        let reconstruction = reconstructor.reconstruct(&record.changelog, now);
        let original_story_points = record.story_points.is_some();
        Self {
            key: record.key,
            story_points: record.story_points,
            created_date: record.created_date,
            completed_date: record.completed_date,
            assignee: record.assignee,
            description_length: record.description_length,
            acceptance_criteria_length: record.acceptance_criteria_length,
            cycle_times: reconstruction.cycle_times,
            tracked_transitions: reconstruction.tracked_count,
            original_story_points,
        }
    }

    /// Total time across every status the item was observed in.
    pub fn total_cycle_time(&self) -> Duration {
        self.cycle_times
            .values()
            .fold(Duration::zero(), |acc, d| acc + *d)
    }
}

/// Summary of a story-point backfill pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BackfillSummary {
    /// Items that received the average value
    pub backfilled: usize,
    /// The value substituted for missing points
    pub average_used: f64,
}

/// Replace missing story points with the average of the originally-present
/// values, so sizing statistics can include every item.
///
/// Provenance is recorded in `original_story_points`; the sizing average in
/// [`crate::stats::StoryPointStats`] only ever uses original values. When
/// no item has points at all, 1.0 is substituted.
pub fn backfill_story_points(items: &mut [WorkItem]) -> BackfillSummary {
    let present: Vec<f64> = items.iter().filter_map(|i| i.story_points).collect();
    let average_used = if present.is_empty() {
        1.0
    } else {
        present.iter().sum::<f64>() / present.len() as f64
    };

    let mut backfilled = 0;
    for item in items.iter_mut() {
        if item.story_points.is_none() {
            item.story_points = Some(average_used);
            item.original_story_points = false;
            backfilled += 1;
        } else {
            item.original_story_points = true;
        }
    }

    tracing::info!(backfilled, average_used, "backfilled story points");
    BackfillSummary {
        backfilled,
        average_used,
    }
}
