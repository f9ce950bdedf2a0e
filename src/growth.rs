//! The process models which make up one day of crop growth.
//!
//! Each model is a pure function of its inputs. They are evaluated in dependency order by
//! [`crate::simulation::GrowthSimulator`]: thermal time, then canopy cover and harvest index,
//! then biomass, then yield.
pub mod biomass;
pub mod canopy;
pub mod curve;
pub mod partitioning;
pub mod thermal_time;
pub mod tuber_yield;

pub use canopy::SenescencePolicy;
