//! Scenarios describe a variety planted on a given date.
use crate::crop::VarietyID;
use crate::id::{define_id_getter, define_id_type};
use crate::simulation::Harvest;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

define_id_type! {ScenarioID}

/// A planting scenario
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// A unique identifier for the scenario (e.g. "early_april")
    pub id: ScenarioID,
    /// The variety planted
    pub variety_id: VarietyID,
    /// The sowing date
    pub sowing_date: NaiveDate,
    /// Days from sowing to emergence. If `None`, the model default is used.
    pub emergence_offset: Option<u32>,
    /// When the crop is harvested. If `None`, the model's default season length is used.
    pub harvest: Option<Harvest>,
}
define_id_getter! {Scenario, ScenarioID}

impl Scenario {
    /// The same scenario moved into a different calendar year.
    ///
    /// The sowing date (and harvest date, if given as a date) keep their month and day; a
    /// harvest date in the following year stays in the following year.
    pub fn in_year(&self, year: i32) -> Result<Scenario> {
        let shift = year.checked_sub(self.sowing_date.year());
        let move_date = |date: NaiveDate| -> Result<NaiveDate> {
            let new_year = shift
                .and_then(|shift| date.year().checked_add(shift))
                .with_context(|| format!("{date} cannot be moved to year {year}"))?;
            date.with_year(new_year)
                .with_context(|| format!("{date} does not exist in year {new_year}"))
        };

        let sowing_date = move_date(self.sowing_date)?;
        let harvest = match self.harvest {
            Some(Harvest::Date(date)) => Some(Harvest::Date(move_date(date)?)),
            other => other,
        };

        Ok(Scenario {
            sowing_date,
            harvest,
            ..self.clone()
        })
    }
}
