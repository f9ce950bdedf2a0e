//! Errors raised by the crop growth engine.
use chrono::NaiveDate;
use thiserror::Error;

/// An error which aborts a simulation run.
///
/// Both kinds are deterministic given identical inputs, so there is no point in retrying a run
/// which has failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The simulation configuration or crop parameters are invalid
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// The weather input is malformed or incomplete
    #[error("Invalid weather data: {0}")]
    Data(String),
}

impl SimulationError {
    /// Whether this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Whether this is a data error
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// A data error for a date which has no weather record
    pub(crate) fn missing_date(date: NaiveDate) -> Self {
        Self::Data(format!("No weather record for {date}"))
    }
}

/// Shorthand for results of the growth engine
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Return early with a [`SimulationError::Config`] if the condition is false
macro_rules! ensure_config {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::SimulationError::Config(format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_config;

/// Return early with a [`SimulationError::Data`] if the condition is false
macro_rules! ensure_data {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::SimulationError::Data(format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_data;
