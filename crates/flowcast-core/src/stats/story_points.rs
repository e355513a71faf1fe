//! Story-point accounting split by provenance.

use serde::{Deserialize, Serialize};

use crate::item::WorkItem;

/// Story-point totals with original-vs-backfilled provenance kept apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryPointStats {
    /// Items whose points came from the source data
    pub with_original_points: usize,
    /// Items whose points were backfilled from the average
    pub backfilled: usize,
    /// Items still without any point value
    pub without_points: usize,
    pub total_original: f64,
    pub total_backfilled: f64,
    pub total_all: f64,
    /// Average over originally-sourced values only; backfilled values
    /// never bias this figure. None when no original values exist.
    pub average_original: Option<f64>,
}

pub(crate) fn story_point_stats(items: &[WorkItem]) -> StoryPointStats {
    let mut stats = StoryPointStats::default();
    let mut original_values = Vec::new();

    for item in items {
        match (item.story_points, item.original_story_points) {
            (Some(points), true) => {
                stats.with_original_points += 1;
                stats.total_original += points;
                original_values.push(points);
            }
            (Some(points), false) => {
                stats.backfilled += 1;
                stats.total_backfilled += points;
            }
            (None, _) => stats.without_points += 1,
        }
    }

    stats.total_all = stats.total_original + stats.total_backfilled;
    stats.average_original = (!original_values.is_empty())
        .then(|| original_values.iter().sum::<f64>() / original_values.len() as f64);
    stats
}
