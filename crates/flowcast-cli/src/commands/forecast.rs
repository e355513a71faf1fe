use std::path::PathBuf;

use chrono::Utc;
use clap::{Args, Subcommand};
use flowcast_core::{ForecastConfig, MonteCarloForecaster, ThroughputSeries};

use crate::common;

#[derive(Args)]
pub struct SimulationArgs {
    /// Path to the exported work-item JSON
    #[arg(long)]
    pub input: PathBuf,
    /// Count story points instead of items
    #[arg(long)]
    pub story_points: bool,
    /// Number of simulated trials
    #[arg(long, default_value_t = 10_000)]
    pub trials: usize,
    /// Random seed for reproducible forecasts
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum ForecastAction {
    /// Completed items/points at a fixed horizon
    Horizon {
        #[command(flatten)]
        sim: SimulationArgs,
        /// Days from now
        #[arg(long)]
        days: usize,
    },
    /// Days needed to complete a target count
    Target {
        #[command(flatten)]
        sim: SimulationArgs,
        /// Items or story points to complete
        #[arg(long)]
        count: f64,
        /// Simulation horizon override in days
        #[arg(long)]
        horizon: Option<usize>,
    },
    /// Calendar completion dates for a backlog
    Backlog {
        #[command(flatten)]
        sim: SimulationArgs,
        /// Backlog size in items or story points
        #[arg(long)]
        size: f64,
    },
}

pub fn run(action: ForecastAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ForecastAction::Horizon { sim, days } => {
            let (series, forecaster) = prepare(&sim)?;
            let forecast = forecaster.forecast_by_horizon(&series, days)?;

            let unit = common::unit(sim.story_points);
            println!("Projected {unit} completed within {days} days:");
            for (level, value) in [50, 75, 85, 95].iter().zip(forecast.as_array()) {
                println!("  {level}th percentile: {value:.0}");
            }
        }
        ForecastAction::Target { sim, count, horizon } => {
            let (series, forecaster) = prepare(&sim)?;
            let forecast = forecaster.forecast_days_to_target(&series, count, horizon)?;

            let unit = common::unit(sim.story_points);
            println!("Estimated days to complete {count} {unit}:");
            for (level, value) in [50, 75, 85, 95].iter().zip(forecast.as_array()) {
                println!("  {level}% chance of completion within {value:.0} days");
            }
        }
        ForecastAction::Backlog { sim, size } => {
            let (series, forecaster) = prepare(&sim)?;
            let today = Utc::now().date_naive();
            let forecast = forecaster.forecast_backlog(&series, size, today)?;

            let unit = common::unit(sim.story_points);
            println!("Projected completion dates for {size} {unit}:");
            for ((level, days), date) in [50, 75, 85, 95]
                .iter()
                .zip(forecast.days.as_array())
                .zip(forecast.dates)
            {
                println!("  {level}% chance of completion by {date} (in {days:.0} days)");
            }
        }
    }
    Ok(())
}

fn prepare(
    sim: &SimulationArgs,
) -> Result<(ThroughputSeries, MonteCarloForecaster), Box<dyn std::error::Error>> {
    let items = common::load_items(&sim.input, sim.story_points)?;
    let series = ThroughputSeries::build(&items, common::count_policy(sim.story_points))?;
    eprintln!(
        "history: {} days starting {}, {:.2} per day on average",
        series.len(),
        series.start,
        series.mean_per_day()
    );

    let forecaster = MonteCarloForecaster::with_config(ForecastConfig {
        trials: sim.trials,
        seed: sim.seed,
    });
    Ok((series, forecaster))
}
