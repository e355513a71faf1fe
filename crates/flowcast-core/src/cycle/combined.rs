//! Combined-status cycle time.

use std::collections::HashSet;

use chrono::Duration;

use crate::item::CycleTimeMap;

/// Sum of an item's durations across the selected statuses.
///
/// Statuses in the set but absent from the map contribute zero; statuses
/// in the map but outside the set are ignored.
pub fn combined_cycle_time(cycle_times: &CycleTimeMap, statuses: &HashSet<String>) -> Duration {
    statuses
        .iter()
        .filter_map(|s| cycle_times.get(s))
        .fold(Duration::zero(), |acc, d| acc + *d)
}
