//! Pearson correlation between item attributes and total cycle time.

use serde::{Deserialize, Serialize};

use crate::item::WorkItem;

/// Correlation of item attributes against total cycle time.
///
/// Each coefficient is computed independently over its non-null pairs and
/// is None when undefined (fewer than 2 pairs, or zero variance on either
/// side) rather than coerced to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationStats {
    pub acceptance_criteria_cycle_time: Option<f64>,
    pub description_cycle_time: Option<f64>,
    pub story_points_cycle_time: Option<f64>,
}

pub(crate) fn correlation_stats(items: &[WorkItem]) -> CorrelationStats {
    let cycle_secs = |item: &WorkItem| item.total_cycle_time().num_seconds() as f64;

    let acceptance: Vec<(f64, f64)> = items
        .iter()
        .map(|i| (i.acceptance_criteria_length as f64, cycle_secs(i)))
        .collect();
    let description: Vec<(f64, f64)> = items
        .iter()
        .map(|i| (i.description_length as f64, cycle_secs(i)))
        .collect();
    let points: Vec<(f64, f64)> = items
        .iter()
        .filter_map(|i| i.story_points.map(|p| (p, cycle_secs(i))))
        .collect();

    CorrelationStats {
        acceptance_criteria_cycle_time: pearson(&acceptance),
        description_cycle_time: pearson(&description),
        story_points_cycle_time: pearson(&points),
    }
}

/// Pearson r over paired samples.
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let sum_x: f64 = pairs.iter().map(|p| p.0).sum();
    let sum_y: f64 = pairs.iter().map(|p| p.1).sum();
    let sum_xx: f64 = pairs.iter().map(|p| p.0 * p.0).sum();
    let sum_yy: f64 = pairs.iter().map(|p| p.1 * p.1).sum();
    let sum_xy: f64 = pairs.iter().map(|p| p.0 * p.1).sum();

    let cov = sum_xy - sum_x * sum_y / n;
    let var_x = sum_xx - sum_x * sum_x / n;
    let var_y = sum_yy - sum_y * sum_y / n;
    if var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
