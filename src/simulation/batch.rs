//! Running many independent simulations at once.
use super::{DailyResult, SimulationConfig, simulate};
use crate::error::SimulationResult;
use crate::weather::WeatherSeries;
use rayon::prelude::*;

/// Simulate every configuration against the same weather series, in parallel.
///
/// Runs share nothing mutable: each worker owns its own simulator and the weather is only read.
/// A failing run does not affect the others.
///
/// # Returns
///
/// One result per configuration, in the same order as `configs`.
pub fn simulate_batch<C>(
    configs: &[C],
    weather: &WeatherSeries,
) -> Vec<SimulationResult<Vec<DailyResult>>>
where
    C: AsRef<SimulationConfig> + Sync,
{
    configs
        .par_iter()
        .map(|config| simulate(config.as_ref(), weather))
        .collect()
}
