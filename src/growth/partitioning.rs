//! Partitioning of dry matter to tubers.
use super::curve::LogisticRise;
use crate::crop::CropParameters;
use crate::units::{Dimensionless, ThermalTime};

/// The harvest index: the fraction of total dry matter allocated to tubers.
///
/// Zero until tuber initiation at `b`, then a logistic rise towards `A` which is steepest at
/// `tu`. The result is non-decreasing in thermal time and always lies in [0, `A`].
pub fn harvest_index(thermal_time: ThermalTime, params: &CropParameters) -> Dimensionless {
    let curve = LogisticRise {
        onset: params.b,
        inflection: params.tu,
        end: None,
    };

    params.a * curve.fraction(thermal_time)
}
