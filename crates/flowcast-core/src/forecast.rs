//! Monte Carlo throughput forecasting.
//!
//! Simulates many possible futures by resampling observed daily completion
//! counts with replacement (bootstrap resampling of the empirical history;
//! no distribution is fitted). Each forecast is a four-point percentile
//! summary in 50/75/85/95 confidence order.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::throughput::ThroughputSeries;

/// Configuration for the Monte Carlo forecaster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of simulated trials
    pub trials: usize,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: None,
        }
    }
}

/// Four-point percentile forecast, in 50/75/85/95 confidence order.
///
/// For completed-count forecasts the values are non-increasing (more
/// confidence means promising fewer items); for days-to-target forecasts
/// they are non-decreasing (more confidence means more buffer days).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPercentiles {
    pub p50: f64,
    pub p75: f64,
    pub p85: f64,
    pub p95: f64,
}

impl ForecastPercentiles {
    pub fn as_array(&self) -> [f64; 4] {
        [self.p50, self.p75, self.p85, self.p95]
    }
}

/// Projected calendar completion for a backlog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacklogForecast {
    /// Days to work through the backlog, per confidence level
    pub days: ForecastPercentiles,
    /// The same four values as calendar dates from the supplied `today`
    pub dates: [NaiveDate; 4],
}

/// Bootstrap forecaster over a historical daily-completion series.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloForecaster {
    config: ForecastConfig,
}

impl MonteCarloForecaster {
    /// Forecaster with the default 10,000 trials and entropy seeding.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Percentiles of the total completed after `horizon_days` more days.
    pub fn forecast_by_horizon(
        &self,
        series: &ThroughputSeries,
        horizon_days: usize,
    ) -> Result<ForecastPercentiles> {
        self.validate(series)?;
        if horizon_days == 0 {
            return Err(CoreError::invalid_input(
                "horizon_days",
                "must be at least one day",
            ));
        }
        tracing::debug!(horizon_days, trials = self.config.trials, "forecasting by horizon");

        let mut rng = self.rng();
        let mut totals: Vec<f64> = Vec::with_capacity(self.config.trials);
        for _ in 0..self.config.trials {
            let mut total = 0.0;
            for _ in 0..horizon_days {
                total += sample(series, &mut rng);
            }
            totals.push(total);
        }
        totals.sort_by(f64::total_cmp);

        // Higher confidence promises fewer items, so the 75/85/95 points
        // sit at the 25/15/5 quantiles of the outcome distribution.
        Ok(ForecastPercentiles {
            p50: quantile_lower(&totals, 0.50),
            p75: quantile_lower(&totals, 0.25),
            p85: quantile_lower(&totals, 0.15),
            p95: quantile_lower(&totals, 0.05),
        })
    }

    /// Percentiles of the days needed to complete `target` more items.
    ///
    /// With no explicit horizon the simulation runs for
    /// `floor(2 * target / mean)` days, a rule of thumb that leaves room
    /// for slow futures. A trial that never reaches the target within the
    /// horizon records the horizon itself, which caps the forecast rather
    /// than failing the run.
    pub fn forecast_days_to_target(
        &self,
        series: &ThroughputSeries,
        target: f64,
        horizon_days: Option<usize>,
    ) -> Result<ForecastPercentiles> {
        self.validate(series)?;
        // Written as a negated comparison so NaN fails validation too.
        if !(target > 0.0) {
            return Err(CoreError::invalid_input("target", "must be positive"));
        }
        let horizon = match horizon_days {
            Some(0) => {
                return Err(CoreError::invalid_input(
                    "horizon_days",
                    "must be at least one day",
                ))
            }
            Some(days) => days,
            None => default_horizon(series, target),
        };
        tracing::debug!(target, horizon, trials = self.config.trials, "forecasting days to target");

        let mut rng = self.rng();
        let mut days: Vec<f64> = Vec::with_capacity(self.config.trials);
        for _ in 0..self.config.trials {
            let mut cumulative = 0.0;
            let mut reached = horizon;
            for day in 1..=horizon {
                cumulative += sample(series, &mut rng);
                if cumulative >= target {
                    reached = day;
                    break;
                }
            }
            days.push(reached as f64);
        }
        days.sort_by(f64::total_cmp);

        Ok(ForecastPercentiles {
            p50: quantile_lower(&days, 0.50),
            p75: quantile_lower(&days, 0.75),
            p85: quantile_lower(&days, 0.85),
            p95: quantile_lower(&days, 0.95),
        })
    }

    /// Days-to-target translated to calendar dates from an explicit `today`.
    pub fn forecast_backlog(
        &self,
        series: &ThroughputSeries,
        backlog_size: f64,
        today: NaiveDate,
    ) -> Result<BacklogForecast> {
        let days = self.forecast_days_to_target(series, backlog_size, None)?;
        let dates = days.as_array().map(|d| today + Duration::days(d as i64));
        Ok(BacklogForecast { days, dates })
    }

    fn validate(&self, series: &ThroughputSeries) -> Result<()> {
        if self.config.trials == 0 {
            return Err(CoreError::invalid_input(
                "trials",
                "at least one simulated trial is required",
            ));
        }
        if series.is_empty() || series.completed.iter().sum::<f64>() <= 0.0 {
            return Err(CoreError::InsufficientData(
                "historical series is empty or has no completions".to_string(),
            ));
        }
        Ok(())
    }

    fn rng(&self) -> Mcg128Xsl64 {
        match self.config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        }
    }
}

/// One bootstrap draw: a historical day's completed count, uniformly at
/// random with replacement.
fn sample(series: &ThroughputSeries, rng: &mut Mcg128Xsl64) -> f64 {
    series.completed[rng.gen_range(0..series.completed.len())]
}

fn default_horizon(series: &ThroughputSeries, target: f64) -> usize {
    // mean_per_day > 0 holds here; validate() already rejected all-zero
    // series.
    let mean = series.mean_per_day();
    ((2.0 * target / mean).floor() as usize).max(1)
}

/// numpy-style "lower" quantile: the value at `floor(q * (n - 1))` in the
/// sorted sample. Held fixed so seeded runs reproduce exactly.
fn quantile_lower(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = (q * (sorted.len() - 1) as f64).floor() as usize;
    sorted[index.min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn series_of(values: &[f64]) -> ThroughputSeries {
        let mut cumulative = Vec::with_capacity(values.len());
        let mut running = 0.0;
        for v in values {
            running += v;
            cumulative.push(running);
        }
        ThroughputSeries {
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            completed: values.to_vec(),
            cumulative,
        }
    }

    fn seeded(trials: usize) -> MonteCarloForecaster {
        MonteCarloForecaster::with_config(ForecastConfig {
            trials,
            seed: Some(42),
        })
    }

    #[test]
    fn quantile_lower_picks_floor_index() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(quantile_lower(&sorted, 0.0), 1.0);
        assert_eq!(quantile_lower(&sorted, 0.5), 3.0);
        assert_eq!(quantile_lower(&sorted, 0.85), 4.0);
        assert_eq!(quantile_lower(&sorted, 1.0), 5.0);
    }

    #[test]
    fn horizon_forecast_is_reproducible_with_seed() {
        let series = series_of(&[2.0, 0.0, 1.0, 3.0, 1.0]);
        let a = seeded(500).forecast_by_horizon(&series, 14).unwrap();
        let b = seeded(500).forecast_by_horizon(&series, 14).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn horizon_percentiles_are_non_increasing() {
        let series = series_of(&[2.0, 0.0, 1.0, 3.0, 1.0, 0.0, 4.0]);
        let forecast = seeded(2_000).forecast_by_horizon(&series, 14).unwrap();

        assert!(forecast.p50 >= forecast.p75);
        assert!(forecast.p75 >= forecast.p85);
        assert!(forecast.p85 >= forecast.p95);
    }

    #[test]
    fn days_to_target_percentiles_are_non_decreasing() {
        let series = series_of(&[2.0, 0.0, 1.0, 3.0, 1.0, 0.0, 4.0]);
        let forecast = seeded(2_000)
            .forecast_days_to_target(&series, 20.0, None)
            .unwrap();

        assert!(forecast.p50 <= forecast.p75);
        assert!(forecast.p75 <= forecast.p85);
        assert!(forecast.p85 <= forecast.p95);
    }

    #[test]
    fn constant_series_reaches_target_in_exactly_ceil_days() {
        let series = series_of(&[3.0, 3.0, 3.0, 3.0]);
        let forecast = seeded(200)
            .forecast_days_to_target(&series, 10.0, None)
            .unwrap();

        // ceil(10 / 3) = 4 on every trial; zero variance.
        for value in forecast.as_array() {
            assert_eq!(value, 4.0);
        }
    }

    #[test]
    fn constant_series_exact_fit_needs_no_extra_day() {
        let series = series_of(&[2.0, 2.0]);
        let forecast = seeded(200)
            .forecast_days_to_target(&series, 6.0, None)
            .unwrap();
        for value in forecast.as_array() {
            assert_eq!(value, 3.0);
        }
    }

    #[test]
    fn unreachable_target_caps_at_horizon() {
        let series = series_of(&[1.0, 1.0]);
        let forecast = seeded(200)
            .forecast_days_to_target(&series, 100.0, Some(5))
            .unwrap();
        for value in forecast.as_array() {
            assert_eq!(value, 5.0);
        }
    }

    #[test]
    fn backlog_forecast_translates_days_to_dates() {
        let series = series_of(&[2.0, 2.0, 2.0]);
        let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let forecast = seeded(200).forecast_backlog(&series, 10.0, today).unwrap();

        // ceil(10 / 2) = 5 days at every confidence level.
        assert_eq!(forecast.days.p50, 5.0);
        assert_eq!(
            forecast.dates,
            [NaiveDate::from_ymd_opt(2024, 8, 6).unwrap(); 4]
        );
    }

    #[test]
    fn empty_series_is_insufficient_data() {
        let series = series_of(&[]);
        let err = seeded(100).forecast_by_horizon(&series, 7).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientData(_)));
    }

    #[test]
    fn all_zero_series_is_insufficient_data() {
        let series = series_of(&[0.0, 0.0, 0.0]);
        let err = seeded(100)
            .forecast_days_to_target(&series, 5.0, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::InsufficientData(_)));
    }

    #[test]
    fn nan_target_is_rejected_not_forecast() {
        // A NaN target defeats every cumulative comparison, so without
        // validation the forecast would claim one day at full confidence.
        let series = series_of(&[1.0, 2.0]);
        let forecaster = seeded(100);

        assert!(matches!(
            forecaster.forecast_days_to_target(&series, f64::NAN, None),
            Err(CoreError::InvalidInput { .. })
        ));
        let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        assert!(matches!(
            forecaster.forecast_backlog(&series, f64::NAN, today),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    #[test]
    fn non_positive_parameters_are_rejected() {
        let series = series_of(&[1.0, 2.0]);
        let forecaster = seeded(100);

        assert!(matches!(
            forecaster.forecast_by_horizon(&series, 0),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            forecaster.forecast_days_to_target(&series, 0.0, None),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            forecaster.forecast_days_to_target(&series, -3.0, None),
            Err(CoreError::InvalidInput { .. })
        ));
        assert!(matches!(
            forecaster.forecast_days_to_target(&series, 5.0, Some(0)),
            Err(CoreError::InvalidInput { .. })
        ));

        let zero_trials = MonteCarloForecaster::with_config(ForecastConfig {
            trials: 0,
            seed: None,
        });
        assert!(matches!(
            zero_trials.forecast_by_horizon(&series, 7),
            Err(CoreError::InvalidInput { .. })
        ));
    }

    proptest! {
        #[test]
        fn horizon_monotonicity_holds_for_any_history(
            values in proptest::collection::vec(0.0f64..10.0, 1..15),
            horizon in 1usize..20,
            seed in any::<u64>(),
        ) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let series = series_of(&values);
            let forecaster = MonteCarloForecaster::with_config(ForecastConfig {
                trials: 200,
                seed: Some(seed),
            });
            let f = forecaster.forecast_by_horizon(&series, horizon).unwrap();
            prop_assert!(f.p50 >= f.p75 && f.p75 >= f.p85 && f.p85 >= f.p95);
        }

        #[test]
        fn days_monotonicity_holds_for_any_history(
            // Zero days mixed with values >= 1 keep the mean large enough
            // that the default horizon stays small.
            values in proptest::collection::vec(
                prop_oneof![Just(0.0f64), 1.0f64..10.0],
                1..15,
            ),
            target in 1.0f64..50.0,
            seed in any::<u64>(),
        ) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let series = series_of(&values);
            let forecaster = MonteCarloForecaster::with_config(ForecastConfig {
                trials: 200,
                seed: Some(seed),
            });
            let f = forecaster
                .forecast_days_to_target(&series, target, None)
                .unwrap();
            prop_assert!(f.p50 <= f.p75 && f.p75 <= f.p85 && f.p85 <= f.p95);
        }
    }
}
