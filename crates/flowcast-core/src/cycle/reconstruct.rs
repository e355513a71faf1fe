//! Status-interval reconstruction.
//!
//! Converts an unordered changelog of status transitions into accumulated
//! time-in-status. Only intervals bounded by an observed "entered" event
//! are counted; a status still open after the last event is credited up to
//! the supplied evaluation instant. The caller passes that instant
//! explicitly, which keeps reconstruction a pure function of its inputs.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{CycleTimeMap, StatusChangeEvent};

/// A (from, to) transition pair counted during reconstruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedTransition {
    pub from: String,
    pub to: String,
}

impl TrackedTransition {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    fn matches(&self, event: &StatusChangeEvent) -> bool {
        event.from == self.from && event.to == self.to
    }
}

impl Default for TrackedTransition {
    fn default() -> Self {
        Self::new("Backlog", "In Progress")
    }
}

/// Result of reconstructing one item's changelog.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    /// Accumulated time per status
    pub cycle_times: CycleTimeMap,
    /// How often the tracked transition fired
    pub tracked_count: u32,
}

/// Reconstructs per-status intervals from status-change events.
#[derive(Debug, Clone)]
pub struct IntervalReconstructor {
    /// Transition pair to count while folding; None disables counting
    pub tracked: Option<TrackedTransition>,
}

impl Default for IntervalReconstructor {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalReconstructor {
    /// Reconstructor counting the default Backlog -> In Progress pair.
    pub fn new() -> Self {
        Self {
            tracked: Some(TrackedTransition::default()),
        }
    }

    pub fn with_tracked(tracked: Option<TrackedTransition>) -> Self {
        Self { tracked }
    }

    /// Fold the events into accumulated time-in-status.
    ///
    /// Events are stable-sorted by timestamp first; source order is never
    /// assumed chronological. An event whose `from` status was never
    /// observed as entered is incomplete history and records no duration
    /// for that status. Re-entering a status restarts its clock while the
    /// accumulated total persists. Zero events yield an empty map.
    pub fn reconstruct(&self, events: &[StatusChangeEvent], now: DateTime<Utc>) -> Reconstruction {
        let mut ordered: Vec<&StatusChangeEvent> = events.iter().collect();
        ordered.sort_by_key(|e| e.at);

        let mut cycle_times = CycleTimeMap::new();
        let mut open: HashMap<&str, DateTime<Utc>> = HashMap::new();
        let mut tracked_count = 0u32;

        for event in ordered {
            if let Some(entered) = open.remove(event.from.as_str()) {
                let slot = cycle_times
                    .entry(event.from.clone())
                    .or_insert_with(Duration::zero);
                *slot = *slot + (event.at - entered);
            }
            open.insert(event.to.as_str(), event.at);

            if self.tracked.as_ref().is_some_and(|t| t.matches(event)) {
                tracked_count += 1;
            }
        }

        // Whatever is still open is the item's current status; credit it
        // up to the evaluation instant.
        for (status, entered) in open {
            let slot = cycle_times
                .entry(status.to_string())
                .or_insert_with(Duration::zero);
            *slot = *slot + (now - entered);
        }

        Reconstruction {
            cycle_times,
            tracked_count,
        }
    }
}
