//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::growth::SenescencePolicy;
use crate::input::{input_err_msg, is_sorted_and_unique, read_toml};
use crate::units::{Celsius, PlantDensity};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_base_temperature, Celsius, 5.0);
define_unit_param_default!(default_planting_density, PlantDensity, 4.0);
define_param_default!(default_season_length, u32, 120);
define_param_default!(default_weather_file, PathBuf, PathBuf::from("weather.csv"));

/// Represents the contents of the entire model file.
///
/// Every value here is a model-wide default which individual scenarios may override where noted.
#[derive(Debug, Deserialize, PartialEq)]
pub struct ModelParameters {
    /// The base temperature below which no thermal time accumulates (°C)
    #[serde(default = "default_base_temperature")]
    pub base_temperature: Celsius,
    /// Canopy behaviour once maximum cover has been reached
    #[serde(default)]
    pub senescence: SenescencePolicy,
    /// Days from sowing to emergence, unless given for the scenario
    #[serde(default)]
    pub emergence_offset: u32,
    /// Days from sowing to harvest, unless the scenario gives a harvest date or season length
    #[serde(default = "default_season_length")]
    pub season_length: u32,
    /// Number of plants per m²
    #[serde(default = "default_planting_density")]
    pub planting_density: PlantDensity,
    /// Years in which to repeat every scenario.
    ///
    /// If empty, scenarios are only run for the dates given in the scenarios file.
    #[serde(default)]
    pub years: Vec<i32>,
    /// Path to the weather file, relative to the model directory
    #[serde(default = "default_weather_file")]
    pub weather_file: PathBuf,
}

/// Check that the `years` parameter is valid
fn check_years(years: &[i32]) -> Result<()> {
    ensure!(
        is_sorted_and_unique(years),
        "`years` must be composed of unique values in order"
    );

    Ok(())
}

/// Check that the `base_temperature` parameter is valid
fn check_base_temperature(value: Celsius) -> Result<()> {
    ensure!(value.is_finite(), "base_temperature must be a finite number");

    Ok(())
}

/// Check that the `planting_density` parameter is valid
fn check_planting_density(value: PlantDensity) -> Result<()> {
    ensure!(
        value.is_finite() && value > PlantDensity(0.0),
        "planting_density must be a finite number greater than zero"
    );

    Ok(())
}

/// Check that the `season_length` and `emergence_offset` parameters are consistent
fn check_season_length(season_length: u32, emergence_offset: u32) -> Result<()> {
    ensure!(season_length > 0, "season_length cannot be zero");
    ensure!(
        emergence_offset < season_length,
        "emergence_offset ({emergence_offset}) must be less than season_length ({season_length})"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        // years
        check_years(&self.years)?;

        // base_temperature
        check_base_temperature(self.base_temperature)?;

        // planting_density
        check_planting_density(self.planting_density)?;

        // season_length and emergence_offset
        check_season_length(self.season_length, self.emergence_offset)?;

        if self.senescence == SenescencePolicy::Decline {
            warn!(
                "The senescence policy is set to 'decline'. Results will no longer be a \
                potential yield."
            );
        }

        Ok(())
    }
}
