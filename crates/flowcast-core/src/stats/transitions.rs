//! Tracked-transition rollups.

use serde::{Deserialize, Serialize};

use crate::item::WorkItem;

/// How often the tracked transition (e.g. Backlog -> In Progress) fired
/// across the working set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionStats {
    pub total: u32,
    pub items_with_transitions: usize,
    pub max_for_single_item: u32,
    pub average_per_item: f64,
}

pub(crate) fn transition_stats(items: &[WorkItem]) -> TransitionStats {
    if items.is_empty() {
        return TransitionStats::default();
    }

    let counts: Vec<u32> = items.iter().map(|i| i.tracked_transitions).collect();
    let total: u32 = counts.iter().sum();

    TransitionStats {
        total,
        items_with_transitions: counts.iter().filter(|c| **c > 0).count(),
        max_for_single_item: counts.iter().copied().max().unwrap_or(0),
        average_per_item: total as f64 / counts.len() as f64,
    }
}
