//! Program settings shared by every command.
//!
//! Settings live in `settings.toml` in the user's config folder. The file is optional, as is
//! every field in it, and command-line options take precedence over it.
use crate::get_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Folder (relative to the working directory) under which model results are written
const DEFAULT_RESULTS_DIR: &str = "potato_yp_results";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    get_config_dir().join(SETTINGS_FILE_NAME)
}

/// Program settings from config file
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Log level, unless `POTATO_YP_LOG_LEVEL` is set
    pub log_level: String,
    /// Replace existing results without having to pass `--overwrite`
    pub overwrite: bool,
    /// Always write the daily thermal time and dry matter increments
    pub debug_model: bool,
    /// Each model's results go in a subfolder of this folder unless `--output-dir` is given
    pub results_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            debug_model: false,
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
        }
    }
}

impl Settings {
    /// Read the settings file from the user's config folder, if there is one
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if file_path.is_file() {
            read_toml(file_path)
        } else {
            Ok(Settings::default())
        }
    }

    /// The settings as they would appear in `settings.toml`
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
