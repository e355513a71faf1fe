//! Daily throughput series, the forecasting input.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::item::WorkItem;

/// Whether daily buckets count completed items or their story points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountPolicy {
    Items,
    StoryPoints,
}

/// Zero-filled, contiguous daily completed-count series.
///
/// Buckets span every calendar day from the earliest to the latest
/// completion date inclusive, so `completed.len()` is always
/// `(latest - earliest).num_days() + 1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThroughputSeries {
    pub start: NaiveDate,
    /// Completed per day, one bucket per calendar day from `start`
    pub completed: Vec<f64>,
    /// Running total of `completed`
    pub cumulative: Vec<f64>,
}

impl ThroughputSeries {
    /// Build the series from the completed items in the working set.
    ///
    /// The result is independent of item input order. Items without a
    /// completion date are skipped; having none at all is an error.
    pub fn build(items: &[WorkItem], policy: CountPolicy) -> Result<Self> {
        let dated: Vec<(&WorkItem, NaiveDate)> = items
            .iter()
            .filter_map(|i| i.completed_date.map(|d| (i, d)))
            .collect();
        if dated.is_empty() {
            return Err(CoreError::InsufficientData(
                "no completed items to build a throughput series from".to_string(),
            ));
        }

        let mut earliest = dated[0].1;
        let mut latest = dated[0].1;
        for (_, date) in &dated {
            earliest = earliest.min(*date);
            latest = latest.max(*date);
        }
        if latest < earliest {
            return Err(CoreError::InvalidDateRange { earliest, latest });
        }

        let days = (latest - earliest).num_days() as usize + 1;
        let mut completed = vec![0.0; days];
        for (item, date) in &dated {
            let offset = (*date - earliest).num_days();
            // Cannot fall outside the range by construction; skip if it
            // ever does rather than index out of bounds.
            if offset < 0 || offset as usize >= completed.len() {
                tracing::warn!(key = %item.key, %date, "completion date outside series range");
                continue;
            }
            let value = match policy {
                CountPolicy::Items => 1.0,
                CountPolicy::StoryPoints => item.story_points.unwrap_or(0.0),
            };
            completed[offset as usize] += value;
        }

        let mut cumulative = Vec::with_capacity(completed.len());
        let mut running = 0.0;
        for value in &completed {
            running += value;
            cumulative.push(running);
        }

        tracing::info!(
            from = %earliest,
            to = %latest,
            days,
            total = running,
            "built throughput series"
        );
        Ok(Self {
            start: earliest,
            completed,
            cumulative,
        })
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Average completed per calendar day across the whole span.
    pub fn mean_per_day(&self) -> f64 {
        if self.completed.is_empty() {
            return 0.0;
        }
        self.completed.iter().sum::<f64>() / self.completed.len() as f64
    }

    /// Calendar date of bucket `index`.
    pub fn date_at(&self, index: usize) -> NaiveDate {
        self.start + Duration::days(index as i64)
    }
}
