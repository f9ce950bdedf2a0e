//! Configuration for a single simulation run.
use crate::crop::CropParameters;
use crate::error::{SimulationError, SimulationResult, ensure_config};
use crate::growth::SenescencePolicy;
use crate::units::{Celsius, PlantDensity};
use chrono::{Days, NaiveDate};

/// When the crop is harvested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Harvest {
    /// On a calendar date
    Date(NaiveDate),
    /// A number of days after sowing
    DaysAfterSowing(u32),
}

/// Everything needed to simulate one crop from sowing to harvest
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// The sowing (planting) date
    pub sowing_date: NaiveDate,
    /// Days from sowing to emergence
    pub emergence_offset: u32,
    /// The harvest date or season length
    pub harvest: Harvest,
    /// Number of plants per m²
    pub planting_density: PlantDensity,
    /// The base temperature for thermal time
    pub base_temperature: Celsius,
    /// Canopy behaviour after maximum cover
    pub senescence: SenescencePolicy,
    /// Calibrated parameters for the variety grown
    pub crop: CropParameters,
}

impl AsRef<SimulationConfig> for SimulationConfig {
    fn as_ref(&self) -> &SimulationConfig {
        self
    }
}

impl SimulationConfig {
    /// The number of days from sowing to harvest
    pub fn season_length(&self) -> SimulationResult<u32> {
        match self.harvest {
            Harvest::DaysAfterSowing(days) => {
                ensure_config!(days > 0, "Season length must be at least one day");
                Ok(days)
            }
            Harvest::Date(date) => {
                ensure_config!(
                    date > self.sowing_date,
                    "Harvest date ({date}) must be after sowing date ({})",
                    self.sowing_date
                );
                u32::try_from((date - self.sowing_date).num_days())
                    .map_err(|_| SimulationError::Config("Season is too long".into()))
            }
        }
    }

    /// The harvest date
    pub fn harvest_date(&self) -> SimulationResult<NaiveDate> {
        match self.harvest {
            Harvest::Date(date) => Ok(date),
            Harvest::DaysAfterSowing(days) => self
                .sowing_date
                .checked_add_days(Days::new(days.into()))
                .ok_or_else(|| SimulationError::Config("Harvest date is out of range".into())),
        }
    }

    /// The date on which the crop emerges
    pub fn emergence_date(&self) -> SimulationResult<NaiveDate> {
        self.sowing_date
            .checked_add_days(Days::new(self.emergence_offset.into()))
            .ok_or_else(|| SimulationError::Config("Emergence date is out of range".into()))
    }

    /// Check that the configuration describes a runnable simulation
    pub fn validate(&self) -> SimulationResult<()> {
        self.crop.validate()?;

        let season_length = self.season_length()?;
        self.harvest_date()?;
        ensure_config!(
            self.emergence_offset < season_length,
            "Emergence offset ({} days) must be less than the season length ({season_length} \
            days)",
            self.emergence_offset
        );
        ensure_config!(
            self.planting_density.is_finite() && self.planting_density > PlantDensity(0.0),
            "Planting density must be a finite number greater than zero"
        );
        ensure_config!(
            self.base_temperature.is_finite(),
            "Base temperature must be a finite number"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{date, simulation_config};
    use rstest::rstest;

    #[rstest]
    fn test_validate_ok(simulation_config: SimulationConfig) {
        assert!(simulation_config.validate().is_ok());
    }

    #[rstest]
    fn test_season_length_from_date(mut simulation_config: SimulationConfig) {
        simulation_config.harvest = Harvest::Date(date(2024, 7, 30));
        assert_eq!(simulation_config.season_length(), Ok(120));
        assert_eq!(simulation_config.harvest_date(), Ok(date(2024, 7, 30)));
    }

    #[rstest]
    fn test_harvest_date_from_duration(mut simulation_config: SimulationConfig) {
        simulation_config.harvest = Harvest::DaysAfterSowing(120);
        assert_eq!(simulation_config.harvest_date(), Ok(date(2024, 7, 30)));
    }

    #[rstest]
    #[case::harvest_on_sowing_date(Harvest::Date(date(2024, 4, 1)))]
    #[case::harvest_before_sowing(Harvest::Date(date(2024, 3, 1)))]
    #[case::zero_length(Harvest::DaysAfterSowing(0))]
    fn test_validate_bad_harvest(
        mut simulation_config: SimulationConfig,
        #[case] harvest: Harvest,
    ) {
        simulation_config.harvest = harvest;
        assert!(simulation_config.validate().unwrap_err().is_config());
    }

    #[rstest]
    fn test_validate_emergence_equals_season_length(mut simulation_config: SimulationConfig) {
        simulation_config.harvest = Harvest::DaysAfterSowing(30);
        simulation_config.emergence_offset = 30;
        assert!(simulation_config.validate().unwrap_err().is_config());

        simulation_config.emergence_offset = 29;
        assert!(simulation_config.validate().is_ok());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-4.0)]
    #[case(f64::INFINITY)]
    fn test_validate_bad_density(mut simulation_config: SimulationConfig, #[case] density: f64) {
        simulation_config.planting_density = PlantDensity(density);
        assert!(simulation_config.validate().unwrap_err().is_config());
    }

    #[rstest]
    fn test_validate_bad_crop(mut simulation_config: SimulationConfig) {
        simulation_config.crop.te = simulation_config.crop.tm;
        assert!(simulation_config.validate().unwrap_err().is_config());
    }
}
