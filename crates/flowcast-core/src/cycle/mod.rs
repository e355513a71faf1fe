//! Cycle-time reconstruction and filtering.
//!
//! This module turns per-item changelogs into accumulated time-in-status
//! and offers set-level tools over the result: combined-status sums and
//! IQR outlier fences.

mod combined;
mod outliers;
mod reconstruct;

pub use combined::combined_cycle_time;
pub use outliers::{FilterOutcome, IqrBounds, OutlierFilter};
pub use reconstruct::{IntervalReconstructor, Reconstruction, TrackedTransition};
