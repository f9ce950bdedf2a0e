//! Canopy cover as a function of thermal time since emergence.
use super::curve::LogisticRise;
use crate::crop::CropParameters;
use crate::units::{Dimensionless, ThermalTime};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// What happens to canopy cover once maximum cover has been reached
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    DeserializeLabeledStringEnum,
    SerializeLabeledStringEnum,
)]
pub enum SenescencePolicy {
    /// Hold the canopy at maximum cover until harvest (potential yield)
    #[default]
    #[string = "plateau"]
    Plateau,
    /// Let the canopy senesce after maximum cover
    #[string = "decline"]
    Decline,
}

/// Canopy growth from emergence to maximum cover.
///
/// Inflection at `tm`, reaching `wmax` exactly at `te`.
fn growth_curve(params: &CropParameters) -> LogisticRise {
    LogisticRise {
        onset: ThermalTime(0.0),
        inflection: params.tm,
        end: Some(params.te),
    }
}

/// Canopy senescence after maximum cover.
///
/// The fall mirrors the growth phase: it starts at `te` and is steepest `te - tm` later.
fn senescence_curve(params: &CropParameters) -> LogisticRise {
    LogisticRise {
        onset: params.te,
        inflection: params.te + (params.te - params.tm),
        end: None,
    }
}

/// The fraction of ground covered by the canopy.
///
/// # Arguments
///
/// * `thermal_time` - Cumulative thermal time since emergence
/// * `params` - Crop parameters
/// * `policy` - Canopy behaviour after `te`
///
/// # Returns
///
/// A fraction in [0, `wmax`]. It is non-decreasing up to `te`.
pub fn cover_fraction(
    thermal_time: ThermalTime,
    params: &CropParameters,
    policy: SenescencePolicy,
) -> Dimensionless {
    if thermal_time <= params.te {
        return params.wmax * growth_curve(params).fraction(thermal_time);
    }

    match policy {
        SenescencePolicy::Plateau => params.wmax,
        SenescencePolicy::Decline => {
            let senesced = senescence_curve(params).fraction(thermal_time);
            params.wmax * (Dimensionless(1.0) - senesced)
        }
    }
}
