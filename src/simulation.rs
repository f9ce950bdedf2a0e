//! The day-stepped crop growth simulation.
use crate::error::{SimulationError, SimulationResult, ensure_data};
use crate::growth::{biomass, canopy, partitioning, thermal_time, tuber_yield};
use crate::model::{Model, Run};
use crate::output::DataWriter;
use crate::output::metadata::write_metadata;
use crate::units::{Biomass, Dimensionless, GramsPerPlant, ThermalTime, TonnesPerHectare};
use crate::weather::{WeatherRecord, WeatherSeries};
use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use itertools::Itertools;
use log::{debug, info, warn};
use std::path::Path;

pub mod batch;
pub use batch::simulate_batch;
pub mod config;
pub use config::{Harvest, SimulationConfig};

/// The stage a [`GrowthSimulator`] has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No days have been simulated yet
    NotStarted,
    /// Between sowing and harvest
    Growing,
    /// The harvest day has been simulated
    Completed,
}

/// The crop state carried from one day to the next
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationState {
    /// Cumulative thermal time since emergence
    pub thermal_time: ThermalTime,
    /// Cumulative total dry matter
    pub total_dry_matter: Biomass,
    /// Cumulative tuber dry matter
    pub tuber_dry_matter: Biomass,
    /// Current canopy cover fraction
    pub canopy_cover: Dimensionless,
    /// Current harvest index
    pub harvest_index: Dimensionless,
}

/// The crop on one simulated day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyResult {
    /// The calendar date
    pub date: NaiveDate,
    /// Days since sowing
    pub days_after_planting: u32,
    /// Cumulative thermal time since emergence
    pub thermal_time: ThermalTime,
    /// Canopy cover fraction
    pub canopy_cover: Dimensionless,
    /// Cumulative total dry matter
    pub total_dry_matter: Biomass,
    /// Cumulative tuber dry matter
    pub tuber_dry_matter: Biomass,
    /// Fresh tuber yield
    pub fresh_yield: TonnesPerHectare,
    /// Fraction of dry matter allocated to tubers
    pub harvest_index: Dimensionless,
    /// Thermal time gained on this day
    pub thermal_time_increment: ThermalTime,
    /// Dry matter produced on this day
    pub dry_matter_increment: Biomass,
    /// Fresh tuber mass per plant
    pub fresh_mass_per_plant: GramsPerPlant,
}

/// Steps a crop through one season, one day at a time.
///
/// The simulator must be fed a weather record for every day from sowing to harvest, in order.
/// Days before emergence are still reported, but with all crop quantities at zero.
#[derive(Debug)]
pub struct GrowthSimulator<'a> {
    config: &'a SimulationConfig,
    phase: Phase,
    state: SimulationState,
    /// Days after sowing of the next day to simulate
    next_day: u32,
    season_length: u32,
}

impl<'a> GrowthSimulator<'a> {
    /// Create a new simulator, failing if the configuration is invalid
    pub fn new(config: &'a SimulationConfig) -> SimulationResult<Self> {
        config.validate()?;
        let season_length = config.season_length()?;

        Ok(Self {
            config,
            phase: Phase::NotStarted,
            state: SimulationState::default(),
            next_day: 0,
            season_length,
        })
    }

    /// The current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The crop state after the most recent day
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// The date of the next day to simulate, or `None` if the season is over
    pub fn next_date(&self) -> Option<NaiveDate> {
        (self.phase != Phase::Completed)
            .then(|| self.config.sowing_date + Days::new(self.next_day.into()))
    }

    /// Simulate one day.
    ///
    /// # Arguments
    ///
    /// * `record` - Weather for the day after the last simulated day (the sowing date for the
    ///   first call)
    ///
    /// # Returns
    ///
    /// The crop on that day, or a data error if the record is for the wrong date, has invalid
    /// temperatures or the season has already been harvested.
    pub fn step(&mut self, record: &WeatherRecord) -> SimulationResult<DailyResult> {
        let Some(expected_date) = self.next_date() else {
            return Err(SimulationError::Data(format!(
                "{}: crop was already harvested",
                record.date
            )));
        };
        ensure_data!(
            record.date == expected_date,
            "Expected weather for {expected_date}, got {}",
            record.date
        );

        let days_after_planting = self.next_day;
        let crop = &self.config.crop;
        let mut thermal_time_increment = ThermalTime(0.0);
        let mut dry_matter_increment = Biomass(0.0);

        if days_after_planting >= self.config.emergence_offset {
            thermal_time_increment = thermal_time::daily_increment(
                record.tmax,
                record.tmin,
                self.config.base_temperature,
            )?;

            let state = &mut self.state;
            state.thermal_time =
                thermal_time::accumulate(state.thermal_time, thermal_time_increment);
            state.canopy_cover =
                canopy::cover_fraction(state.thermal_time, crop, self.config.senescence);
            state.harvest_index = partitioning::harvest_index(state.thermal_time, crop);

            dry_matter_increment =
                biomass::daily_dry_matter(state.canopy_cover, record.srad, crop.rue);
            state.total_dry_matter =
                biomass::accumulate(state.total_dry_matter, dry_matter_increment);
            state.tuber_dry_matter =
                tuber_yield::tuber_dry_matter(state.total_dry_matter, state.harvest_index);
        }

        let state = &self.state;
        let result = DailyResult {
            date: record.date,
            days_after_planting,
            thermal_time: state.thermal_time,
            canopy_cover: state.canopy_cover,
            total_dry_matter: state.total_dry_matter,
            tuber_dry_matter: state.tuber_dry_matter,
            fresh_yield: tuber_yield::fresh_yield(state.tuber_dry_matter, crop.dmc),
            harvest_index: state.harvest_index,
            thermal_time_increment,
            dry_matter_increment,
            fresh_mass_per_plant: tuber_yield::fresh_mass_per_plant(
                state.tuber_dry_matter,
                crop.dmc,
                self.config.planting_density,
            ),
        };

        self.phase = if days_after_planting == self.season_length {
            Phase::Completed
        } else {
            Phase::Growing
        };
        self.next_day += 1;

        Ok(result)
    }

    /// Simulate every remaining day up to and including harvest.
    ///
    /// Any failure discards the whole trajectory.
    pub fn run(mut self, weather: &WeatherSeries) -> SimulationResult<Vec<DailyResult>> {
        let mut results = Vec::with_capacity(self.season_length as usize + 1);
        while let Some(date) = self.next_date() {
            let record = weather.require(date)?;
            results.push(self.step(record)?);
        }

        Ok(results)
    }
}

/// Simulate a crop from sowing to harvest.
///
/// # Arguments
///
/// * `config` - The sowing/harvest dates and crop to simulate
/// * `weather` - Weather covering at least the sowing to harvest window
///
/// # Returns
///
/// One [`DailyResult`] per day from sowing to harvest inclusive, or an error. Configuration
/// errors are detected before any day is simulated.
pub fn simulate(
    config: &SimulationConfig,
    weather: &WeatherSeries,
) -> SimulationResult<Vec<DailyResult>> {
    let simulator = GrowthSimulator::new(config)?;
    debug!(
        "Simulating crop sown on {} for {} days",
        config.sowing_date, simulator.season_length
    );

    simulator.run(weather)
}

/// Warn if a run was harvested before the canopy reached maximum cover
fn check_canopy_maturity(run: &Run, results: &[DailyResult]) {
    let Some(last) = results.last() else {
        return;
    };

    let te = run.config.crop.te;
    if last.thermal_time < te {
        warn!(
            "Scenario {run} was harvested before maximum canopy cover was reached \
            ({:.0} of {:.0} °C·day)",
            last.thermal_time.value(),
            te.value()
        );
    }
}

/// Run the simulation.
///
/// Every run described by the model is simulated before anything is written, so a failing run
/// leaves no results on disk.
///
/// # Arguments:
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write additional information (e.g. daily increments) to file
pub fn run(model: &Model, output_path: &Path, debug_model: bool) -> Result<()> {
    let runs = model.runs()?;
    info!("Simulating {} runs", runs.len());
    let all_results: Vec<Vec<DailyResult>> = simulate_batch(&runs, &model.weather)
        .into_iter()
        .zip(&runs)
        .map(|(result, run)| {
            result.with_context(|| format!("Simulation failed for scenario {run}"))
        })
        .try_collect()?;

    write_metadata(output_path, model, &runs).context("Failed to save metadata")?;

    let mut writer = DataWriter::create(output_path, debug_model)?;
    for (run, results) in runs.iter().zip(&all_results) {
        check_canopy_maturity(run, results);
        if let Some(last) = results.last() {
            info!(
                "Scenario {run}: harvested {} with fresh yield {:.2} t/ha",
                last.date,
                last.fresh_yield.value()
            );
        }
        writer.write_run(run, results)?;
    }
    writer.flush()?;

    Ok(())
}
