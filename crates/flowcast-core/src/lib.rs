//! # Flowcast Core Library
//!
//! Cycle-time analytics and Monte Carlo throughput forecasting over a
//! stream of discretely-completed work items.
//!
//! The library consumes already-parsed ticket records (fetching,
//! pagination and auth belong to the tracker collaborator) and produces
//! read-only statistical snapshots and percentile forecasts. It performs
//! no I/O and never reads the system clock; evaluation instants are
//! always passed in.
//!
//! ## Key components
//!
//! - [`IntervalReconstructor`]: per-item time-in-status from an unordered
//!   changelog
//! - [`OutlierFilter`]: IQR fences over per-status durations
//! - [`StatisticsAnalyzer`]: cross-item aggregate snapshot
//! - [`ThroughputSeries`]: zero-filled daily completion series
//! - [`MonteCarloForecaster`]: bootstrap percentile forecasts

pub mod cycle;
pub mod error;
pub mod forecast;
pub mod item;
pub mod stats;
pub mod throughput;

pub use cycle::{
    combined_cycle_time, FilterOutcome, IntervalReconstructor, IqrBounds, OutlierFilter,
    Reconstruction, TrackedTransition,
};
pub use error::{CoreError, Result};
pub use forecast::{BacklogForecast, ForecastConfig, ForecastPercentiles, MonteCarloForecaster};
pub use item::{
    backfill_story_points, BackfillSummary, CycleTimeMap, StatusChangeEvent, WorkItem,
    WorkItemRecord,
};
pub use stats::{FilterStatistics, StatisticsAnalyzer};
pub use throughput::{CountPolicy, ThroughputSeries};
