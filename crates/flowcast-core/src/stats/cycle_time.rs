//! Per-status and combined distribution statistics.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cycle::combined_cycle_time;
use crate::item::WorkItem;

/// Distribution summary for a set of per-item durations, in seconds.
///
/// The item keys attaining the minimum and maximum are retained for
/// traceability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DurationStats {
    pub count: usize,
    pub mean_secs: f64,
    pub median_secs: f64,
    /// Population standard deviation
    pub std_dev_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
    pub min_key: String,
    pub max_key: String,
}

/// First and last completed item in the working set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRange {
    pub first_key: String,
    pub first_date: NaiveDate,
    pub last_key: String,
    pub last_date: NaiveDate,
}

/// Distribution stats per status across all items.
pub(crate) fn per_status_stats(items: &[WorkItem]) -> HashMap<String, DurationStats> {
    // Samples merge per item in slice order, so ties resolve the same way
    // on every run regardless of map iteration order.
    let mut samples: HashMap<&str, Vec<(&str, f64)>> = HashMap::new();
    for item in items {
        for (status, duration) in &item.cycle_times {
            samples
                .entry(status.as_str())
                .or_default()
                .push((item.key.as_str(), duration.num_seconds() as f64));
        }
    }

    samples
        .into_iter()
        .map(|(status, values)| (status.to_string(), duration_stats(values)))
        .collect()
}

/// Distribution stats over each item's combined-status duration.
pub(crate) fn combined_stats(items: &[WorkItem], statuses: &HashSet<String>) -> DurationStats {
    let samples: Vec<(&str, f64)> = items
        .iter()
        .map(|item| {
            let combined = combined_cycle_time(&item.cycle_times, statuses);
            (item.key.as_str(), combined.num_seconds() as f64)
        })
        .collect();
    duration_stats(samples)
}

/// First and last completed item by completion date.
pub(crate) fn completion_range(items: &[WorkItem]) -> Option<CompletionRange> {
    let completed = items
        .iter()
        .filter_map(|i| i.completed_date.map(|d| (i, d)));
    let (first, first_date) = completed.clone().min_by_key(|(_, d)| *d)?;
    let (last, last_date) = completed.max_by_key(|(_, d)| *d)?;

    Some(CompletionRange {
        first_key: first.key.clone(),
        first_date,
        last_key: last.key.clone(),
        last_date,
    })
}

fn duration_stats(mut samples: Vec<(&str, f64)>) -> DurationStats {
    if samples.is_empty() {
        return DurationStats::default();
    }

    samples.sort_by(|a, b| a.1.total_cmp(&b.1));
    let count = samples.len();
    let values: Vec<f64> = samples.iter().map(|(_, v)| *v).collect();

    let mean = values.iter().sum::<f64>() / count as f64;
    let median = if count % 2 == 1 {
        values[count / 2]
    } else {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    };
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    let (min_key, min_secs) = samples[0];
    let (max_key, max_secs) = samples[count - 1];

    DurationStats {
        count,
        mean_secs: mean,
        median_secs: median,
        std_dev_secs: variance.sqrt(),
        min_secs,
        max_secs,
        min_key: min_key.to_string(),
        max_key: max_key.to_string(),
    }
}
