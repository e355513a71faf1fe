//! Cross-item statistics over a reconstructed working set.
//!
//! Every output here is a read-only snapshot computed once from a fixed
//! collection of work items; nothing mutates the inputs.

mod contributors;
mod correlation;
mod cycle_time;
mod story_points;
mod transitions;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

pub use contributors::{ContributorReport, ContributorStats};
pub use correlation::CorrelationStats;
pub use cycle_time::{CompletionRange, DurationStats};
pub use story_points::StoryPointStats;
pub use transitions::TransitionStats;

use crate::error::{CoreError, Result};
use crate::item::WorkItem;

/// Read-only aggregate snapshot for one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterStatistics {
    /// Distribution stats per status
    pub cycle_time: HashMap<String, DurationStats>,
    /// Distribution over the combined-status durations, when a set was given
    pub combined: Option<DurationStats>,
    pub contributors: ContributorReport,
    pub completion_range: Option<CompletionRange>,
    pub story_points: StoryPointStats,
    pub correlations: CorrelationStats,
    pub transitions: TransitionStats,
}

/// Computes aggregate statistics over a fixed working set.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAnalyzer {
    /// Statuses whose durations are summed for the combined view
    pub combined_statuses: Option<HashSet<String>>,
}

impl StatisticsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_combined(statuses: HashSet<String>) -> Self {
        Self {
            combined_statuses: Some(statuses),
        }
    }

    /// Compute the full snapshot.
    ///
    /// Undefined sub-statistics (correlations without enough pairs, sizing
    /// averages without original points) come back as absent values;
    /// only an empty working set is an error.
    pub fn analyze(&self, items: &[WorkItem]) -> Result<FilterStatistics> {
        if items.is_empty() {
            return Err(CoreError::InsufficientData(
                "no work items in the working set".to_string(),
            ));
        }
        tracing::info!(items = items.len(), "calculating working-set statistics");

        Ok(FilterStatistics {
            cycle_time: cycle_time::per_status_stats(items),
            combined: self
                .combined_statuses
                .as_ref()
                .map(|statuses| cycle_time::combined_stats(items, statuses)),
            contributors: contributors::contributor_report(
                items,
                self.combined_statuses.as_ref(),
            ),
            completion_range: cycle_time::completion_range(items),
            story_points: story_points::story_point_stats(items),
            correlations: correlation::correlation_stats(items),
            transitions: transitions::transition_stats(items),
        })
    }
}
