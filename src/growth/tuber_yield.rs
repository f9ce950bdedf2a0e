//! Conversion of dry matter into tuber yield.
use crate::units::{Biomass, Dimensionless, GramsPerPlant, PlantDensity, TonnesPerHectare};

/// Dry matter allocated to tubers
pub fn tuber_dry_matter(total_dry_matter: Biomass, harvest_index: Dimensionless) -> Biomass {
    total_dry_matter * harvest_index
}

/// Fresh tuber yield, given the tubers' dry matter concentration
pub fn fresh_yield(tuber_dry_matter: Biomass, dmc: Dimensionless) -> TonnesPerHectare {
    (tuber_dry_matter / dmc).to_tonnes_per_hectare()
}

/// Fresh tuber mass per plant at the given planting density
pub fn fresh_mass_per_plant(
    tuber_dry_matter: Biomass,
    dmc: Dimensionless,
    density: PlantDensity,
) -> GramsPerPlant {
    (tuber_dry_matter / dmc) / density
}
