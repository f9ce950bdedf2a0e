//! Daily thermal time from minimum and maximum air temperature.
use crate::error::{SimulationResult, ensure_data};
use crate::units::{Celsius, ThermalTime};

/// Thermal time gained on one day, using the simple averaging method.
///
/// The increment is the amount by which the mean of `tmax` and `tmin` exceeds
/// `base_temperature`, floored at zero. There is no upper temperature cutoff.
///
/// # Returns
///
/// The daily increment in °C·day, or a data error if `tmin` is greater than `tmax`.
pub fn daily_increment(
    tmax: Celsius,
    tmin: Celsius,
    base_temperature: Celsius,
) -> SimulationResult<ThermalTime> {
    ensure_data!(
        tmin <= tmax,
        "Tmin ({tmin}) is greater than Tmax ({tmax})"
    );

    let excess = tmax.mean(tmin) - base_temperature;
    Ok(ThermalTime(excess.value()).max(ThermalTime(0.0)))
}

/// Add a daily increment to the running total
pub fn accumulate(previous_total: ThermalTime, increment: ThermalTime) -> ThermalTime {
    previous_total + increment
}
