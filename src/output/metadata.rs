//! Writes `metadata.toml`, which records what was simulated and with which build of the program.
use crate::growth::SenescencePolicy;
use crate::model::{Model, Run};
use crate::scenario::ScenarioID;
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use itertools::Itertools;
use log::debug;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

mod built_info {
    // Generated by build.rs
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize)]
struct Metadata<'a> {
    /// When the results were written
    written: String,
    model: ModelMetadata<'a>,
    program: ProgramMetadata,
    platform: PlatformMetadata,
}

/// The model and the settings in effect for this set of runs
#[derive(Serialize)]
struct ModelMetadata<'a> {
    path: &'a Path,
    weather_file: &'a Path,
    base_temperature: f64,
    planting_density: f64,
    senescence: SenescencePolicy,
    /// Empty if scenarios were run on their own dates
    years: &'a [i32],
    scenarios: Vec<&'a ScenarioID>,
    num_runs: usize,
    /// First sowing date of any run
    first_sowing_date: Option<String>,
}

impl<'a> ModelMetadata<'a> {
    fn new(model: &'a Model, runs: &[Run]) -> Self {
        let parameters = &model.parameters;
        Self {
            path: &model.model_dir,
            weather_file: &parameters.weather_file,
            base_temperature: parameters.base_temperature.value(),
            planting_density: parameters.planting_density.value(),
            senescence: parameters.senescence,
            years: &parameters.years,
            scenarios: model.scenarios.keys().collect(),
            num_runs: runs.len(),
            first_sowing_date: runs
                .iter()
                .map(|run| run.config.sowing_date)
                .min()
                .map(|date| date.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ProgramMetadata {
    name: &'static str,
    version: &'static str,
    /// Short commit hash, with `-dirty` appended for uncommitted changes
    git_commit: String,
    target: &'static str,
    rustc_version: &'static str,
    built_utc: &'static str,
    debug_build: bool,
}

impl ProgramMetadata {
    fn current() -> Self {
        let git_commit = match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
            (Some(hash), Some(true)) => format!("{hash}-dirty"),
            (Some(hash), _) => hash.to_string(),
            (None, _) => "unknown".to_string(),
        };

        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            git_commit,
            target: built_info::TARGET,
            rustc_version: built_info::RUSTC_VERSION,
            built_utc: built_info::BUILT_TIME_UTC,
            debug_build: built_info::DEBUG,
        }
    }
}

/// The operating system and hardware the simulation ran on
#[derive(Serialize)]
struct PlatformMetadata {
    os: String,
    kernel: String,
    release: String,
    machine: String,
}

impl PlatformMetadata {
    fn current() -> Result<Self> {
        let info = PlatformInfo::new()
            .map_err(|err| anyhow!("Unable to determine platform info: {err}"))?;

        Ok(Self {
            os: info.osname().to_string_lossy().into(),
            kernel: info.sysname().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
        })
    }
}

/// Write metadata for a completed set of runs to `output_path`
pub fn write_metadata(output_path: &Path, model: &Model, runs: &[Run]) -> Result<()> {
    let metadata = Metadata {
        written: Local::now().to_rfc2822(),
        model: ModelMetadata::new(model, runs),
        program: ProgramMetadata::current(),
        platform: PlatformMetadata::current()?,
    };
    debug!(
        "Writing metadata for scenarios {}",
        metadata.model.scenarios.iter().join(", ")
    );

    let file_path = output_path.join(METADATA_FILE_NAME);
    fs::write(&file_path, toml::to_string(&metadata)?)
        .with_context(|| format!("Failed to write {}", file_path.display()))?;

    Ok(())
}
