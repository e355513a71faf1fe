//! IQR-based outlier filtering for long-running statuses.
//!
//! Fences are the conventional interquartile-range kind:
//! `upper = Q3 + multiplier * (Q3 - Q1)`. Only the upper fence is
//! enforced; unusually short durations are kept. The lower fence is still
//! computed so callers can report it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::item::WorkItem;

/// IQR fence for a single status, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    /// Q3 + multiplier * IQR; durations above this flag the item
    pub upper: f64,
    /// Q1 - multiplier * IQR; reported but never enforced
    pub lower: f64,
}

/// Partition of a working set into retained items and flagged outliers.
///
/// Excluded items are returned in full, never silently dropped.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub retained: Vec<WorkItem>,
    pub excluded: Vec<WorkItem>,
    /// The fences the partition was computed against
    pub bounds: HashMap<String, IqrBounds>,
}

/// Flags items whose time in any status sits above the IQR upper fence.
#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    /// IQR multiplier for the fences
    pub multiplier: f64,
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl OutlierFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_multiplier(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Compute per-status fences across the whole collection.
    ///
    /// Quartiles use linear interpolation over the sorted per-item
    /// durations, held fixed for reproducibility.
    pub fn bounds(&self, items: &[WorkItem]) -> HashMap<String, IqrBounds> {
        let mut samples: HashMap<&str, Vec<f64>> = HashMap::new();
        for item in items {
            for (status, duration) in &item.cycle_times {
                samples
                    .entry(status.as_str())
                    .or_default()
                    .push(duration.num_seconds() as f64);
            }
        }

        samples
            .into_iter()
            .map(|(status, mut values)| {
                values.sort_by(f64::total_cmp);
                let q1 = quantile_linear(&values, 0.25);
                let q3 = quantile_linear(&values, 0.75);
                let iqr = q3 - q1;
                (
                    status.to_string(),
                    IqrBounds {
                        q1,
                        q3,
                        upper: q3 + self.multiplier * iqr,
                        lower: q1 - self.multiplier * iqr,
                    },
                )
            })
            .collect()
    }

    /// Partition against fences computed from `items` themselves.
    pub fn partition(&self, items: Vec<WorkItem>) -> FilterOutcome {
        let bounds = self.bounds(&items);
        self.partition_with_bounds(items, bounds)
    }

    /// Partition against pre-computed fences.
    ///
    /// Re-applying the same fences to the retained set removes nothing
    /// further.
    pub fn partition_with_bounds(
        &self,
        items: Vec<WorkItem>,
        bounds: HashMap<String, IqrBounds>,
    ) -> FilterOutcome {
        let mut retained = Vec::new();
        let mut excluded = Vec::new();

        for item in items {
            let over_fence = item.cycle_times.iter().any(|(status, duration)| {
                bounds
                    .get(status)
                    .is_some_and(|b| duration.num_seconds() as f64 > b.upper)
            });
            if over_fence {
                excluded.push(item);
            } else {
                retained.push(item);
            }
        }

        tracing::debug!(
            retained = retained.len(),
            excluded = excluded.len(),
            "applied IQR fences"
        );
        FilterOutcome {
            retained,
            excluded,
            bounds,
        }
    }
}

/// Linear-interpolation quantile over a sorted sample.
fn quantile_linear(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
