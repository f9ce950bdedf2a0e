//! Potential yield simulation for potato crops.
//!
//! A crop is stepped one day at a time from sowing to harvest. Each day, thermal time drives
//! canopy development and tuber partitioning, and intercepted radiation is converted to dry
//! matter. Fresh tuber yield is derived from the tuber dry matter at the end of each day.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod cli;
pub mod crop;
pub mod error;
pub mod growth;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod simulation;
pub mod units;
pub mod weather;

#[cfg(test)]
mod fixture;

/// Get the path to the folder holding the program's configuration files
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("potato-yp");

    path
}
