//! The logistic curve shared by the canopy cover and tuber partitioning models.
use crate::units::{Dimensionless, ThermalTime};

/// Distance from onset to inflection, in units of the logistic scale.
///
/// With this spread the unnormalised logistic is ~1% of its asymptote at onset.
const ONSET_SPREAD: f64 = 4.6;

/// A logistic rise in thermal time, normalised to run from 0 to 1.
///
/// The curve is 0 up to and including `onset`, has its steepest point at `inflection` and
/// either reaches exactly 1 at `end` or, if there is no end, approaches 1 asymptotically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticRise {
    /// Thermal time at which the curve starts rising
    pub onset: ThermalTime,
    /// Thermal time of the maximum rate of increase
    pub inflection: ThermalTime,
    /// Thermal time at which the curve reaches 1
    pub end: Option<ThermalTime>,
}

impl LogisticRise {
    /// The standard logistic, centred on the inflection point
    fn logistic(&self, t: ThermalTime) -> f64 {
        let scale = (self.inflection - self.onset).value() / ONSET_SPREAD;
        1.0 / (1.0 + (-(t - self.inflection).value() / scale).exp())
    }

    /// Evaluate the curve at thermal time `t`.
    ///
    /// Requires `onset < inflection` and, if present, `inflection < end`. The result is
    /// non-decreasing in `t` and always lies in [0, 1].
    pub fn fraction(&self, t: ThermalTime) -> Dimensionless {
        if t <= self.onset {
            return Dimensionless(0.0);
        }

        let top = match self.end {
            Some(end) if t >= end => return Dimensionless(1.0),
            Some(end) => self.logistic(end),
            None => 1.0,
        };
        let bottom = self.logistic(self.onset);

        Dimensionless(((self.logistic(t) - bottom) / (top - bottom)).clamp(0.0, 1.0))
    }
}
