//! Code for reading calibrated variety parameters from a CSV file.
use super::{input_err_msg, read_csv};
use crate::crop::{CropParameters, Variety, VarietyMap};
use crate::id::index_by_id;
use crate::units::{Dimensionless, RadiationUseEfficiency, ThermalTime};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const VARIETIES_FILE_NAME: &str = "varieties.csv";

/// A variety record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct VarietyRaw {
    id: String,
    #[serde(default)]
    description: String,
    wmax: f64,
    tm: f64,
    te: f64,
    #[serde(rename = "A")]
    a: f64,
    tu: f64,
    b: f64,
    #[serde(rename = "RUE")]
    rue: f64,
    #[serde(rename = "DMc")]
    dmc: f64,
}

impl VarietyRaw {
    fn into_variety(self) -> Result<Variety> {
        let parameters = CropParameters {
            wmax: Dimensionless(self.wmax),
            tm: ThermalTime(self.tm),
            te: ThermalTime(self.te),
            a: Dimensionless(self.a),
            tu: ThermalTime(self.tu),
            b: ThermalTime(self.b),
            rue: RadiationUseEfficiency(self.rue),
            dmc: Dimensionless(self.dmc),
        };
        parameters
            .validate()
            .with_context(|| format!("Invalid parameters for variety {}", self.id))?;

        Ok(Variety {
            id: self.id.into(),
            description: self.description,
            parameters,
        })
    }
}

/// Read varieties from an iterator of raw records
fn read_varieties_from_iter<I>(iter: I) -> Result<VarietyMap>
where
    I: Iterator<Item = VarietyRaw>,
{
    let varieties: Vec<_> = iter.map(VarietyRaw::into_variety).collect::<Result<_>>()?;
    index_by_id(varieties)
}

/// Read calibrated varieties from a CSV file.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// A map of varieties keyed by ID, in file order, or an error.
pub fn read_varieties(model_dir: &Path) -> Result<VarietyMap> {
    let file_path = model_dir.join(VARIETIES_FILE_NAME);
    let varieties_csv = read_csv(&file_path)?;
    read_varieties_from_iter(varieties_csv.into_iter()).with_context(|| input_err_msg(&file_path))
}
