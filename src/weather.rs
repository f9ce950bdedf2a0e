//! Daily weather data which drives crop growth.
use crate::error::{SimulationError, SimulationResult, ensure_data};
use crate::units::{Celsius, Radiation};
use chrono::NaiveDate;

/// Weather for a single day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherRecord {
    /// The calendar date
    pub date: NaiveDate,
    /// Daily maximum air temperature
    pub tmax: Celsius,
    /// Daily minimum air temperature
    pub tmin: Celsius,
    /// Daily incident solar radiation
    pub srad: Radiation,
}

impl WeatherRecord {
    /// Check that the record's values are usable
    fn validate(&self) -> SimulationResult<()> {
        ensure_data!(
            self.tmax.is_finite() && self.tmin.is_finite() && self.srad.is_finite(),
            "{}: weather values must be finite numbers",
            self.date
        );
        ensure_data!(
            self.tmin <= self.tmax,
            "{}: Tmin ({}) is greater than Tmax ({})",
            self.date,
            self.tmin,
            self.tmax
        );
        ensure_data!(
            self.srad >= Radiation(0.0),
            "{}: SRAD cannot be negative (got {})",
            self.date,
            self.srad
        );

        Ok(())
    }
}

/// A read-only series of daily weather records, ordered by date with no duplicates.
///
/// The series may have gaps; a gap only becomes an error if a simulation needs a date which is
/// missing.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries(Vec<WeatherRecord>);

impl WeatherSeries {
    /// Create a new series, validating every record.
    pub fn new(records: Vec<WeatherRecord>) -> SimulationResult<Self> {
        ensure_data!(!records.is_empty(), "Weather series is empty");
        for record in &records {
            record.validate()?;
        }
        for pair in records.windows(2) {
            ensure_data!(
                pair[0].date < pair[1].date,
                "Weather records must be in date order with no duplicates ({} is followed by {})",
                pair[0].date,
                pair[1].date
            );
        }

        Ok(Self(records))
    }

    /// The first date in the series
    pub fn first_date(&self) -> NaiveDate {
        self.0[0].date
    }

    /// The last date in the series
    pub fn last_date(&self) -> NaiveDate {
        self.0[self.0.len() - 1].date
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series has no records (never true for a constructed series)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the records in date order
    pub fn iter(&self) -> impl Iterator<Item = &WeatherRecord> {
        self.0.iter()
    }

    /// Get the record for the given date, if there is one
    pub fn get(&self, date: NaiveDate) -> Option<&WeatherRecord> {
        self.0
            .binary_search_by_key(&date, |record| record.date)
            .ok()
            .map(|idx| &self.0[idx])
    }

    /// Get the record for the given date, or a data error if it is missing
    pub fn require(&self, date: NaiveDate) -> SimulationResult<&WeatherRecord> {
        self.get(date)
            .ok_or_else(|| SimulationError::missing_date(date))
    }

    /// Check that there is a record for every day in the window `[start, end]`
    pub fn check_coverage(&self, start: NaiveDate, end: NaiveDate) -> SimulationResult<()> {
        for date in start.iter_days().take_while(|date| *date <= end) {
            self.require(date)?;
        }

        Ok(())
    }
}
