//! Fixtures for tests
use crate::crop::{CropParameters, Variety, VarietyMap};
use crate::growth::SenescencePolicy;
use crate::model::Model;
use crate::scenario::Scenario;
use crate::simulation::{Harvest, SimulationConfig};
use crate::units::{
    Celsius, Dimensionless, PlantDensity, Radiation, RadiationUseEfficiency, ThermalTime,
};
use crate::weather::{WeatherRecord, WeatherSeries};
use chrono::NaiveDate;
use indexmap::indexmap;
use rstest::fixture;
use std::path::PathBuf;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Shorthand for creating a date in tests
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A weather series of `days` identical days starting on `start`
pub fn constant_weather(
    start: NaiveDate,
    days: usize,
    tmax: f64,
    tmin: f64,
    srad: f64,
) -> WeatherSeries {
    let records = start
        .iter_days()
        .take(days)
        .map(|date| WeatherRecord {
            date,
            tmax: Celsius(tmax),
            tmin: Celsius(tmin),
            srad: Radiation(srad),
        })
        .collect();

    WeatherSeries::new(records).unwrap()
}

#[fixture]
pub fn crop_parameters() -> CropParameters {
    CropParameters {
        wmax: Dimensionless(0.9),
        tm: ThermalTime(330.0),
        te: ThermalTime(870.0),
        a: Dimensionless(0.75),
        tu: ThermalTime(650.0),
        b: ThermalTime(190.0),
        rue: RadiationUseEfficiency(3.22),
        dmc: Dimensionless(0.2),
    }
}

#[fixture]
pub fn variety(crop_parameters: CropParameters) -> Variety {
    Variety {
        id: "Agria".into(),
        description: "A late maincrop variety".into(),
        parameters: crop_parameters,
    }
}

#[fixture]
pub fn varieties(variety: Variety) -> VarietyMap {
    indexmap! { variety.id.clone() => variety }
}

#[fixture]
pub fn scenario() -> Scenario {
    Scenario {
        id: "early".into(),
        variety_id: "Agria".into(),
        sowing_date: date(2024, 4, 1),
        emergence_offset: None,
        harvest: None,
    }
}

/// A model with one scenario and weather covering its default season
#[fixture]
pub fn model(varieties: VarietyMap, scenario: Scenario) -> Model {
    Model {
        model_dir: PathBuf::from("model"),
        parameters: toml::from_str("").unwrap(),
        varieties,
        scenarios: indexmap! { scenario.id.clone() => scenario },
        weather: constant_weather(date(2024, 4, 1), 121, 20.0, 10.0, 15.0),
    }
}

#[fixture]
pub fn simulation_config(crop_parameters: CropParameters) -> SimulationConfig {
    SimulationConfig {
        sowing_date: date(2024, 4, 1),
        emergence_offset: 0,
        harvest: Harvest::DaysAfterSowing(120),
        planting_density: PlantDensity(4.0),
        base_temperature: Celsius(5.0),
        senescence: SenescencePolicy::Plateau,
        crop: crop_parameters,
    }
}
