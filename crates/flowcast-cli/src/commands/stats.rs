use std::collections::HashMap;
use std::path::PathBuf;

use clap::Subcommand;
use flowcast_core::{IqrBounds, OutlierFilter, StatisticsAnalyzer};
use serde::Serialize;

use crate::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Aggregate cycle-time statistics for a working set
    Show {
        /// Path to the exported work-item JSON
        #[arg(long)]
        input: PathBuf,
        /// Backfill missing story points before aggregating
        #[arg(long)]
        story_points: bool,
        /// Statuses to sum for the combined cycle-time view
        #[arg(long, value_delimiter = ',')]
        combined: Vec<String>,
        /// Drop IQR upper-fence outliers before aggregating
        #[arg(long)]
        filter_outliers: bool,
    },
    /// IQR fences and flagged outliers, without aggregating
    Outliers {
        /// Path to the exported work-item JSON
        #[arg(long)]
        input: PathBuf,
        /// IQR multiplier for the fences
        #[arg(long, default_value_t = 1.5)]
        multiplier: f64,
    },
}

#[derive(Serialize)]
struct OutlierReport {
    bounds: HashMap<String, IqrBounds>,
    excluded_keys: Vec<String>,
    retained: usize,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StatsAction::Show {
            input,
            story_points,
            combined,
            filter_outliers,
        } => {
            let mut items = common::load_items(&input, story_points)?;
            if filter_outliers {
                let outcome = OutlierFilter::new().partition(items);
                for excluded in &outcome.excluded {
                    eprintln!("excluded outlier: {}", excluded.key);
                }
                items = outcome.retained;
            }

            let analyzer = if combined.is_empty() {
                StatisticsAnalyzer::new()
            } else {
                StatisticsAnalyzer::with_combined(combined.into_iter().collect())
            };
            let stats = analyzer.analyze(&items)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Outliers { input, multiplier } => {
            let items = common::load_items(&input, false)?;
            let outcome = OutlierFilter::with_multiplier(multiplier).partition(items);

            let report = OutlierReport {
                bounds: outcome.bounds,
                excluded_keys: outcome.excluded.iter().map(|i| i.key.clone()).collect(),
                retained: outcome.retained.len(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
