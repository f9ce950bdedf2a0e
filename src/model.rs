//! The model represents the loaded inputs and the simulation runs they describe.
use crate::crop::{VarietyID, VarietyMap};
use crate::growth::SenescencePolicy;
use crate::id::IDMap;
use crate::scenario::{Scenario, ScenarioID};
use crate::simulation::{Harvest, SimulationConfig};
use crate::weather::WeatherSeries;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::{Itertools, iproduct};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_dir: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Calibrated varieties
    pub varieties: VarietyMap,
    /// Planting scenarios
    pub scenarios: IndexMap<ScenarioID, Scenario>,
    /// Daily weather for the site
    pub weather: WeatherSeries,
}

/// Changes made to a loaded model before it is run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ModelOverrides {
    /// Only run these scenarios. Every scenario is run if empty.
    pub scenarios: Vec<String>,
    /// Repeat each scenario in these years instead of the years in `model.toml`
    pub years: Vec<i32>,
    /// Canopy behaviour after maximum cover, replacing the `model.toml` value
    pub senescence: Option<SenescencePolicy>,
}

/// A single simulation to perform: one scenario in one season
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// The scenario this run was derived from
    pub scenario_id: ScenarioID,
    /// The variety grown
    pub variety_id: VarietyID,
    /// Everything the growth engine needs
    pub config: SimulationConfig,
}

impl AsRef<SimulationConfig> for Run {
    fn as_ref(&self) -> &SimulationConfig {
        &self.config
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (variety {}, sown {})",
            self.scenario_id, self.variety_id, self.config.sowing_date
        )
    }
}

impl Model {
    /// Build the simulation configuration for a scenario, filling in model-wide defaults
    fn run_for_scenario(&self, scenario: Scenario) -> Result<Run> {
        let variety = self
            .varieties
            .get(&scenario.variety_id)
            .with_context(|| format!("Unknown variety {}", scenario.variety_id))?;

        let config = SimulationConfig {
            sowing_date: scenario.sowing_date,
            emergence_offset: scenario
                .emergence_offset
                .unwrap_or(self.parameters.emergence_offset),
            harvest: scenario
                .harvest
                .unwrap_or(Harvest::DaysAfterSowing(self.parameters.season_length)),
            planting_density: self.parameters.planting_density,
            base_temperature: self.parameters.base_temperature,
            senescence: self.parameters.senescence,
            crop: variety.parameters,
        };

        Ok(Run {
            scenario_id: scenario.id,
            variety_id: scenario.variety_id,
            config,
        })
    }

    /// All the runs described by this model.
    ///
    /// If the model parameters list years, every scenario is repeated in each of those years
    /// (ordered by scenario, then year). Otherwise there is exactly one run per scenario.
    pub fn runs(&self) -> Result<Vec<Run>> {
        let scenarios: Vec<Scenario> = if self.parameters.years.is_empty() {
            self.scenarios.values().cloned().collect()
        } else {
            iproduct!(self.scenarios.values(), &self.parameters.years)
                .map(|(scenario, &year)| {
                    let id = &scenario.id;
                    scenario
                        .in_year(year)
                        .with_context(|| format!("Cannot move scenario {id} to {year}"))
                })
                .try_collect()?
        };

        scenarios
            .into_iter()
            .map(|scenario| self.run_for_scenario(scenario))
            .collect()
    }

    /// Apply overrides to the model and check that it is still valid.
    ///
    /// Changing the years can move a scenario outside the weather data, so the whole model is
    /// validated again afterwards.
    pub fn apply_overrides(&mut self, overrides: &ModelOverrides) -> Result<()> {
        if !overrides.scenarios.is_empty() {
            let selected: HashSet<ScenarioID> = overrides
                .scenarios
                .iter()
                .map(|id| {
                    let (found, _) = self
                        .scenarios
                        .get_by_str(id)
                        .with_context(|| format!("Cannot select scenario {id}"))?;
                    anyhow::Ok(found.clone())
                })
                .try_collect()?;
            self.scenarios.retain(|id, _| selected.contains(id));
        }

        if !overrides.years.is_empty() {
            self.parameters.years = overrides.years.iter().copied().sorted().dedup().collect();
        }

        if let Some(senescence) = overrides.senescence {
            self.parameters.senescence = senescence;
        }

        self.validate()
    }

    /// Check that every run is valid and covered by the weather data
    pub fn validate(&self) -> Result<()> {
        for run in self.runs()? {
            run.config
                .validate()
                .with_context(|| format!("Invalid scenario {run}"))?;

            let harvest_date = run.config.harvest_date()?;
            self.weather
                .check_coverage(run.config.sowing_date, harvest_date)
                .with_context(|| {
                    format!(
                        "Weather data for scenario {run} must cover {} to {harvest_date}",
                        run.config.sowing_date
                    )
                })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, date, model};
    use crate::units::PlantDensity;
    use rstest::rstest;

    #[rstest]
    fn test_runs_single_season(model: Model) {
        let runs = model.runs().unwrap();
        assert_eq!(runs.len(), 1);

        let run = &runs[0];
        assert_eq!(run.scenario_id, ScenarioID::new("early"));
        assert_eq!(run.variety_id, VarietyID::new("Agria"));
        assert_eq!(run.config.sowing_date, date(2024, 4, 1));
        assert_eq!(run.config.emergence_offset, 0);
        assert_eq!(run.config.harvest, Harvest::DaysAfterSowing(120));
        assert_eq!(run.config.planting_density, PlantDensity(4.0));
        assert_eq!(run.config.crop, model.varieties["Agria"].parameters);
    }

    #[rstest]
    fn test_runs_scenario_overrides(mut model: Model) {
        let scenario = &mut model.scenarios[0];
        scenario.emergence_offset = Some(14);
        scenario.harvest = Some(Harvest::Date(date(2024, 8, 15)));

        let run = model.runs().unwrap().remove(0);
        assert_eq!(run.config.emergence_offset, 14);
        assert_eq!(run.config.harvest, Harvest::Date(date(2024, 8, 15)));
    }

    #[rstest]
    fn test_runs_multiple_years(mut model: Model) {
        model.parameters.years = vec![2022, 2023];

        let sowing_dates = model
            .runs()
            .unwrap()
            .into_iter()
            .map(|run| run.config.sowing_date)
            .collect_vec();
        assert_eq!(sowing_dates, [date(2022, 4, 1), date(2023, 4, 1)]);
    }

    #[rstest]
    fn test_validate(model: Model) {
        assert!(model.validate().is_ok());
    }

    #[rstest]
    fn test_validate_weather_too_short(mut model: Model) {
        model.scenarios[0].harvest = Some(Harvest::DaysAfterSowing(400));
        assert_error!(
            model.validate(),
            "Weather data for scenario early (variety Agria, sown 2024-04-01) must cover \
            2024-04-01 to 2025-05-06"
        );
    }

    #[rstest]
    fn test_validate_bad_config(mut model: Model) {
        model.scenarios[0].emergence_offset = Some(200);
        assert_error!(
            model.validate(),
            "Invalid scenario early (variety Agria, sown 2024-04-01)"
        );
    }

    #[rstest]
    fn test_apply_overrides_select_scenarios(mut model: Model) {
        let late = Scenario {
            id: "late".into(),
            sowing_date: date(2024, 4, 20),
            ..model.scenarios[0].clone()
        };
        model.scenarios.insert(late.id.clone(), late);
        assert_eq!(model.runs().unwrap().len(), 2);

        let overrides = ModelOverrides {
            scenarios: vec!["late".into()],
            ..Default::default()
        };
        model.apply_overrides(&overrides).unwrap();

        let runs = model.runs().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].scenario_id, ScenarioID::new("late"));
    }

    #[rstest]
    fn test_apply_overrides_unknown_scenario(mut model: Model) {
        let overrides = ModelOverrides {
            scenarios: vec!["midsummer".into()],
            ..Default::default()
        };
        assert_error!(
            model.apply_overrides(&overrides),
            "Cannot select scenario midsummer"
        );
        assert_eq!(model.scenarios.len(), 1);
    }

    #[rstest]
    fn test_apply_overrides_years_outside_weather(mut model: Model) {
        let overrides = ModelOverrides {
            years: vec![2023, 2022, 2023],
            ..Default::default()
        };
        assert_error!(
            model.apply_overrides(&overrides),
            "Weather data for scenario early (variety Agria, sown 2022-04-01) must cover \
            2022-04-01 to 2022-07-30"
        );
        assert_eq!(model.parameters.years, [2022, 2023]);
    }

    #[rstest]
    fn test_apply_overrides_senescence(mut model: Model) {
        let overrides = ModelOverrides {
            senescence: Some(SenescencePolicy::Decline),
            ..Default::default()
        };
        model.apply_overrides(&overrides).unwrap();
        assert_eq!(
            model.runs().unwrap()[0].config.senescence,
            SenescencePolicy::Decline
        );
    }
}
