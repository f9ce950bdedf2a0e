//! Crop varieties and their calibrated growth parameters.
use crate::error::{SimulationResult, ensure_config};
use crate::id::{define_id_getter, define_id_type};
use crate::units::{Dimensionless, RadiationUseEfficiency, ThermalTime};
use indexmap::IndexMap;

define_id_type! {VarietyID}

/// A map of [`Variety`]s, keyed by variety ID
pub type VarietyMap = IndexMap<VarietyID, Variety>;

/// The eight calibrated parameters describing the development of one potato variety.
///
/// Thermal times are measured from crop emergence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropParameters {
    /// Maximum canopy cover fraction
    pub wmax: Dimensionless,
    /// Thermal time at the maximum canopy growth rate
    pub tm: ThermalTime,
    /// Thermal time at which maximum canopy cover is reached
    pub te: ThermalTime,
    /// Maximum harvest index (fraction of biomass allocated to tubers)
    pub a: Dimensionless,
    /// Thermal time at the maximum tuber partitioning rate
    pub tu: ThermalTime,
    /// Thermal time at the onset of tuber initiation
    pub b: ThermalTime,
    /// Radiation-use efficiency
    pub rue: RadiationUseEfficiency,
    /// Tuber dry matter concentration
    pub dmc: Dimensionless,
}

impl CropParameters {
    /// Check that the parameters describe a physically meaningful crop
    pub fn validate(&self) -> SimulationResult<()> {
        let all_finite = [self.wmax, self.a, self.dmc]
            .iter()
            .all(|x| x.is_finite())
            && [self.tm, self.te, self.tu, self.b]
                .iter()
                .all(|x| x.is_finite())
            && self.rue.is_finite();
        ensure_config!(all_finite, "Crop parameters must be finite numbers");

        ensure_config!(
            self.wmax.is_proportion(),
            "wmax must be between 0 and 1 (got {})",
            self.wmax
        );
        ensure_config!(
            self.a.is_proportion(),
            "A must be between 0 and 1 (got {})",
            self.a
        );
        ensure_config!(
            self.dmc.is_proportion() && self.dmc > Dimensionless(0.0),
            "DMc must be greater than 0 and no more than 1 (got {})",
            self.dmc
        );
        ensure_config!(
            self.tm > ThermalTime(0.0),
            "tm must be greater than zero (got {})",
            self.tm
        );
        ensure_config!(
            self.te > self.tm,
            "te ({}) must be greater than tm ({})",
            self.te,
            self.tm
        );
        ensure_config!(
            self.b >= ThermalTime(0.0),
            "b cannot be negative (got {})",
            self.b
        );
        ensure_config!(
            self.tu > self.b,
            "tu ({}) must be greater than b ({})",
            self.tu,
            self.b
        );
        ensure_config!(
            self.rue > RadiationUseEfficiency(0.0),
            "RUE must be greater than zero (got {})",
            self.rue
        );

        Ok(())
    }
}

/// A potato variety together with its calibrated parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Variety {
    /// A unique identifier for the variety (e.g. "Agria")
    pub id: VarietyID,
    /// A text description of the variety
    pub description: String,
    /// Calibrated growth parameters
    pub parameters: CropParameters,
}
define_id_getter! {Variety, VarietyID}
