//! Code for reading planting scenarios from a CSV file.
use super::{input_err_msg, read_csv};
use crate::crop::VarietyMap;
use crate::id::{IDMap, index_by_id};
use crate::scenario::{Scenario, ScenarioID};
use crate::simulation::Harvest;
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

const SCENARIOS_FILE_NAME: &str = "scenarios.csv";

/// A scenario record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct ScenarioRaw {
    id: String,
    variety_id: String,
    sowing_date: NaiveDate,
    emergence_offset: Option<u32>,
    harvest_date: Option<NaiveDate>,
    season_length: Option<u32>,
}

impl ScenarioRaw {
    fn into_scenario(self, varieties: &VarietyMap) -> Result<Scenario> {
        let (variety_id, _) = varieties.get_by_str(&self.variety_id)?;

        let harvest = match (self.harvest_date, self.season_length) {
            (Some(_), Some(_)) => {
                bail!(
                    "Scenario {}: only one of harvest_date and season_length may be given",
                    self.id
                )
            }
            (Some(date), None) => Some(Harvest::Date(date)),
            (None, Some(days)) => Some(Harvest::DaysAfterSowing(days)),
            (None, None) => None,
        };

        Ok(Scenario {
            id: self.id.into(),
            variety_id: variety_id.clone(),
            sowing_date: self.sowing_date,
            emergence_offset: self.emergence_offset,
            harvest,
        })
    }
}

/// Read scenarios from an iterator of raw records
fn read_scenarios_from_iter<I>(
    iter: I,
    varieties: &VarietyMap,
) -> Result<IndexMap<ScenarioID, Scenario>>
where
    I: Iterator<Item = ScenarioRaw>,
{
    let scenarios: Vec<_> = iter
        .map(|raw| raw.into_scenario(varieties))
        .collect::<Result<_>>()?;
    index_by_id(scenarios)
}

/// Read planting scenarios from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
/// * `varieties` - All known varieties
///
/// # Returns
///
/// A map of scenarios keyed by ID, in file order, or an error.
pub fn read_scenarios(
    model_dir: &Path,
    varieties: &VarietyMap,
) -> Result<IndexMap<ScenarioID, Scenario>> {
    let file_path = model_dir.join(SCENARIOS_FILE_NAME);
    let scenarios_csv = read_csv(&file_path)?;
    read_scenarios_from_iter(scenarios_csv.into_iter(), varieties)
        .with_context(|| input_err_msg(&file_path))
}
