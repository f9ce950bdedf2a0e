//! This module defines the physical quantities used by the crop model and the conversions between
//! them.
//!
//! Each quantity is a thin wrapper around an `f64`. Only arithmetic which makes physical sense is
//! implemented, so that e.g. adding a radiation to a thermal time is a compile-time error.
use serde::{Deserialize, Serialize};

/// Conversion factor from g m⁻² to t ha⁻¹
const GRAMS_PER_M2_TO_TONNES_PER_HA: f64 = 0.01;

/// Represents a dimensionless quantity (e.g. a fraction).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    Default,
    Serialize,
    Deserialize,
    derive_more::Add,
    derive_more::Sub,
    derive_more::Display,
)]
pub struct Dimensionless(pub f64);

impl std::ops::Mul for Dimensionless {
    type Output = Dimensionless;

    fn mul(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 * rhs.0)
    }
}

impl std::ops::Div for Dimensionless {
    type Output = Dimensionless;

    fn div(self, rhs: Dimensionless) -> Self::Output {
        Dimensionless(self.0 / rhs.0)
    }
}

impl Dimensionless {
    /// Create a new dimensionless quantity
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// The underlying value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether the value is neither infinite nor NaN
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Whether the value lies in the closed interval [0, 1]
    pub fn is_proportion(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }
}

macro_rules! unit_struct {
    ($name:ident, $unit:literal) => {
        #[doc = concat!("A quantity measured in ", $unit, ".")]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            PartialOrd,
            Default,
            Serialize,
            Deserialize,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::Display,
        )]
        pub struct $name(pub f64);

        impl $name {
            /// Create a new instance from an `f64` value.
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// The value as an `f64`.
            pub fn value(self) -> f64 {
                self.0
            }

            /// Whether the value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// The larger of `self` and `other`
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl std::ops::Mul<Dimensionless> for $name {
            type Output = $name;
            fn mul(self, rhs: Dimensionless) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Mul<$name> for Dimensionless {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl std::ops::Div<Dimensionless> for $name {
            type Output = $name;
            fn div(self, rhs: Dimensionless) -> $name {
                $name(self.0 / rhs.0)
            }
        }

        impl std::ops::Div for $name {
            type Output = Dimensionless;
            fn div(self, rhs: $name) -> Dimensionless {
                Dimensionless(self.0 / rhs.0)
            }
        }
    };
}

macro_rules! impl_mul {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Mul<$Rhs> for $Lhs {
            type Output = $Out;
            fn mul(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 * rhs.0)
            }
        }
        impl std::ops::Mul<$Lhs> for $Rhs {
            type Output = $Out;
            fn mul(self, lhs: $Lhs) -> $Out {
                <$Out>::new(self.0 * lhs.0)
            }
        }
    };
}

macro_rules! impl_div {
    ($Lhs:ty, $Rhs:ty, $Out:ty) => {
        impl std::ops::Div<$Rhs> for $Lhs {
            type Output = $Out;
            fn div(self, rhs: $Rhs) -> $Out {
                <$Out>::new(self.0 / rhs.0)
            }
        }
    };
}

// Base quantities
unit_struct!(Celsius, "°C");
unit_struct!(ThermalTime, "°C·day");
unit_struct!(Radiation, "MJ m⁻²");
unit_struct!(Biomass, "g m⁻²");
unit_struct!(PlantDensity, "plants m⁻²");

// Derived quantities
unit_struct!(RadiationUseEfficiency, "g MJ⁻¹");
unit_struct!(TonnesPerHectare, "t ha⁻¹");
unit_struct!(GramsPerPlant, "g plant⁻¹");

// Multiplication rules
impl_mul!(Radiation, RadiationUseEfficiency, Biomass);

// Division rules
impl_div!(Biomass, PlantDensity, GramsPerPlant);

impl Celsius {
    /// The arithmetic mean of two temperatures
    pub fn mean(self, other: Celsius) -> Celsius {
        Celsius((self.0 + other.0) / 2.0)
    }
}

impl Biomass {
    /// Convert an areal mass in g m⁻² to t ha⁻¹
    pub fn to_tonnes_per_hectare(self) -> TonnesPerHectare {
        TonnesPerHectare(self.0 * GRAMS_PER_M2_TO_TONNES_PER_HA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_radiation_times_rue() {
        let dm = Radiation(18.0) * RadiationUseEfficiency(3.22);
        assert_approx_eq!(f64, dm.value(), 57.96, epsilon = 1e-9);

        // Commutative
        assert_eq!(RadiationUseEfficiency(3.22) * Radiation(18.0), dm);
    }

    #[test]
    fn test_biomass_to_tonnes_per_hectare() {
        // 1000 g m⁻² = 10 t ha⁻¹
        assert_approx_eq!(
            f64,
            Biomass(1000.0).to_tonnes_per_hectare().value(),
            10.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_biomass_per_plant() {
        assert_eq!(Biomass(200.0) / PlantDensity(4.0), GramsPerPlant(50.0));
    }

    #[test]
    fn test_ratio_is_dimensionless() {
        assert_eq!(ThermalTime(50.0) / ThermalTime(200.0), Dimensionless(0.25));
    }

    #[test]
    fn test_celsius_mean() {
        assert_eq!(Celsius(28.0).mean(Celsius(16.0)), Celsius(22.0));
    }

    #[test]
    fn test_add_assign() {
        let mut tt = ThermalTime(10.0);
        tt += ThermalTime(5.0);
        assert_eq!(tt, ThermalTime(15.0));
    }

    #[test]
    fn test_is_proportion() {
        assert!(Dimensionless(0.0).is_proportion());
        assert!(Dimensionless(1.0).is_proportion());
        assert!(!Dimensionless(1.01).is_proportion());
        assert!(!Dimensionless(-0.01).is_proportion());
        assert!(!Dimensionless(f64::NAN).is_proportion());
    }
}
