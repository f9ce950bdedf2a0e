//! The module responsible for writing output data to disk.
use crate::crop::VarietyID;
use crate::model::Run;
use crate::scenario::ScenarioID;
use crate::simulation::DailyResult;
use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;

/// The output file name for the daily crop trajectories
const DAILY_FILE_NAME: &str = "daily.csv";

/// The output file name for the per-run harvest summary
const HARVEST_FILE_NAME: &str = "harvest.csv";

/// The output file name for the daily increments
const DAILY_INCREMENTS_FILE_NAME: &str = "debug_daily_increments.csv";

/// Get the output folder for a model: a subfolder of `results_dir` named after the model
pub fn get_output_dir(results_dir: &Path, model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok(results_dir.join(model_name))
}

/// Create a new output directory for the model, optionally overwriting existing data
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// True if the output dir contained existing data that was deleted, false if not, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Identifies the run a row belongs to.
///
/// This is written along with the other row types in all output files.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct RunRow {
    scenario_id: ScenarioID,
    variety_id: VarietyID,
    sowing_date: NaiveDate,
}

impl RunRow {
    /// Create a new [`RunRow`]
    fn new(run: &Run) -> Self {
        Self {
            scenario_id: run.scenario_id.clone(),
            variety_id: run.variety_id.clone(),
            sowing_date: run.config.sowing_date,
        }
    }
}

/// Represents the crop state in a row of the daily CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DailyRow {
    date: NaiveDate,
    days_after_planting: u32,
    thermal_time: f64,
    canopy_cover: f64,
    total_dry_matter: f64,
    tuber_dry_matter: f64,
    fresh_yield: f64,
    harvest_index: f64,
    fresh_mass_per_plant: f64,
}

impl From<&DailyResult> for DailyRow {
    fn from(result: &DailyResult) -> Self {
        Self {
            date: result.date,
            days_after_planting: result.days_after_planting,
            thermal_time: result.thermal_time.value(),
            canopy_cover: result.canopy_cover.value(),
            total_dry_matter: result.total_dry_matter.value(),
            tuber_dry_matter: result.tuber_dry_matter.value(),
            fresh_yield: result.fresh_yield.value(),
            harvest_index: result.harvest_index.value(),
            fresh_mass_per_plant: result.fresh_mass_per_plant.value(),
        }
    }
}

/// Represents a row in the harvest summary CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct HarvestRow {
    harvest_date: NaiveDate,
    days_after_planting: u32,
    thermal_time: f64,
    total_dry_matter: f64,
    tuber_dry_matter: f64,
    fresh_yield: f64,
    harvest_index: f64,
    peak_canopy_cover: f64,
    fresh_mass_per_plant: f64,
}

impl HarvestRow {
    /// Summarise a run from its daily results
    fn new(results: &[DailyResult]) -> Result<Self> {
        let last = results.last().context("Run produced no results")?;
        let peak_canopy_cover = results
            .iter()
            .map(|result| result.canopy_cover.value())
            .fold(0.0, f64::max);

        Ok(Self {
            harvest_date: last.date,
            days_after_planting: last.days_after_planting,
            thermal_time: last.thermal_time.value(),
            total_dry_matter: last.total_dry_matter.value(),
            tuber_dry_matter: last.tuber_dry_matter.value(),
            fresh_yield: last.fresh_yield.value(),
            harvest_index: last.harvest_index.value(),
            peak_canopy_cover,
            fresh_mass_per_plant: last.fresh_mass_per_plant.value(),
        })
    }
}

/// Represents the daily increments in a row of the debug CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct DailyIncrementRow {
    date: NaiveDate,
    thermal_time_increment: f64,
    dry_matter_increment: f64,
}

/// For writing extra debug information about the model
struct DebugDataWriter {
    increments_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let file_path = output_path.join(DAILY_INCREMENTS_FILE_NAME);

        Ok(Self {
            increments_writer: csv::Writer::from_path(file_path)?,
        })
    }

    /// Write the daily thermal time and dry matter increments for a run
    fn write_increments(&mut self, run: &Run, results: &[DailyResult]) -> Result<()> {
        for result in results {
            let row = DailyIncrementRow {
                date: result.date,
                thermal_time_increment: result.thermal_time_increment.value(),
                dry_matter_increment: result.dry_matter_increment.value(),
            };
            self.increments_writer.serialize((RunRow::new(run), row))?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    fn flush(&mut self) -> Result<()> {
        self.increments_writer.flush()?;

        Ok(())
    }
}

/// An object for writing simulation results to file
pub struct DataWriter {
    daily_writer: csv::Writer<File>,
    harvest_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include extra CSV files for debugging model
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if save_debug_info {
            // Create debug CSV files
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            daily_writer: new_writer(DAILY_FILE_NAME)?,
            harvest_writer: new_writer(HARVEST_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write the daily trajectory and harvest summary of a run
    pub fn write_run(&mut self, run: &Run, results: &[DailyResult]) -> Result<()> {
        for result in results {
            self.daily_writer
                .serialize((RunRow::new(run), DailyRow::from(result)))?;
        }

        self.harvest_writer
            .serialize((RunRow::new(run), HarvestRow::new(results)?))?;

        if let Some(wtr) = &mut self.debug_writer {
            wtr.write_increments(run, results)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.daily_writer.flush()?;
        self.harvest_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, constant_weather, date, simulation_config};
    use crate::simulation::{SimulationConfig, simulate};
    use float_cmp::assert_approx_eq;
    use itertools::Itertools;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[fixture]
    fn run(simulation_config: SimulationConfig) -> Run {
        Run {
            scenario_id: "early".into(),
            variety_id: "Agria".into(),
            config: simulation_config,
        }
    }

    fn results(run: &Run) -> Vec<DailyResult> {
        let weather = constant_weather(date(2024, 4, 1), 121, 20.0, 10.0, 15.0);
        simulate(&run.config, &weather).unwrap()
    }

    fn read_rows<T: serde::de::DeserializeOwned>(file_path: PathBuf) -> Vec<T> {
        csv::Reader::from_path(file_path)
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap()
    }

    #[rstest]
    fn test_write_run(run: Run) {
        let results = results(&run);
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path(), false).unwrap();
            writer.write_run(&run, &results).unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let daily: Vec<DailyRow> = read_rows(dir.path().join(DAILY_FILE_NAME));
        assert_eq!(daily.len(), 121);
        assert_eq!(daily[0], DailyRow::from(&results[0]));
        assert_eq!(daily[120].days_after_planting, 120);

        let run_rows: Vec<RunRow> = read_rows(dir.path().join(HARVEST_FILE_NAME));
        assert_eq!(run_rows, [RunRow::new(&run)]);

        let harvest: Vec<HarvestRow> = read_rows(dir.path().join(HARVEST_FILE_NAME));
        assert_eq!(harvest.len(), 1);
        assert_eq!(harvest[0].harvest_date, date(2024, 7, 30));
        assert_approx_eq!(f64, harvest[0].peak_canopy_cover, 0.9, epsilon = 1e-9);
        assert_eq!(
            harvest[0].fresh_yield,
            results.last().unwrap().fresh_yield.value()
        );

        assert!(!dir.path().join(DAILY_INCREMENTS_FILE_NAME).exists());
    }

    #[rstest]
    fn test_write_run_debug(run: Run) {
        let results = results(&run);
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path(), true).unwrap();
            writer.write_run(&run, &results).unwrap();
            writer.flush().unwrap();
        }

        let increments: Vec<DailyIncrementRow> =
            read_rows(dir.path().join(DAILY_INCREMENTS_FILE_NAME));
        assert_eq!(increments.len(), results.len());
        assert_eq!(increments[0].thermal_time_increment, 10.0);
    }

    #[test]
    fn test_harvest_row_no_results() {
        assert_error!(HarvestRow::new(&[]), "Run produced no results");
    }

    #[test]
    fn test_create_output_directory_new_directory() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("results");

        // Create a new directory should succeed and return false (no overwrite)
        let result = create_output_directory(&output_dir, false).unwrap();
        assert!(!result);
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing_empty_directory() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("results");
        fs::create_dir(&output_dir).unwrap();

        // An empty folder is reused
        let result = create_output_directory(&output_dir, false).unwrap();
        assert!(!result);
        assert!(output_dir.is_dir());
    }

    #[test]
    fn test_create_output_directory_existing_with_files() {
        let temp_dir = tempdir().unwrap();
        let output_dir = temp_dir.path().join("results");
        fs::create_dir(&output_dir).unwrap();
        fs::write(output_dir.join(DAILY_FILE_NAME), "old").unwrap();

        // Without permission to overwrite, this is an error
        assert!(create_output_directory(&output_dir, false).is_err());
        assert!(output_dir.join(DAILY_FILE_NAME).exists());

        // With permission, the old contents are removed
        let result = create_output_directory(&output_dir, true).unwrap();
        assert!(result);
        assert!(output_dir.is_dir());
        assert!(!output_dir.join(DAILY_FILE_NAME).exists());
    }

    #[test]
    fn test_get_output_dir() {
        let temp_dir = tempdir().unwrap();
        let model_dir = temp_dir.path().join("my_model");
        fs::create_dir(&model_dir).unwrap();

        assert_eq!(
            get_output_dir(Path::new("potato_yp_results"), &model_dir).unwrap(),
            PathBuf::from("potato_yp_results").join("my_model")
        );
    }
}
