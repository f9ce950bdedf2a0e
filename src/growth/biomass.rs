//! Dry matter production from intercepted radiation.
use crate::units::{Biomass, Dimensionless, Radiation, RadiationUseEfficiency};

/// Dry matter produced on one day.
///
/// Intercepted radiation is approximated by canopy cover × incident radiation, with no separate
/// extinction coefficient, which is the assumption that calibrated RUE values are based on.
pub fn daily_dry_matter(
    cover_fraction: Dimensionless,
    srad: Radiation,
    rue: RadiationUseEfficiency,
) -> Biomass {
    cover_fraction * (srad * rue)
}

/// Add a day's dry matter to the running total
pub fn accumulate(previous_total: Biomass, increment: Biomass) -> Biomass {
    previous_total + increment
}
