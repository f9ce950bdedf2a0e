//! Code for reading daily weather from a CSV file.
use super::{input_err_msg, read_csv};
use crate::units::{Celsius, Radiation};
use crate::weather::{WeatherRecord, WeatherSeries};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// A weather record retrieved from a CSV file
#[derive(PartialEq, Debug, Deserialize)]
struct WeatherRaw {
    date: NaiveDate,
    tmax: f64,
    tmin: f64,
    srad: f64,
}

impl From<WeatherRaw> for WeatherRecord {
    fn from(raw: WeatherRaw) -> Self {
        WeatherRecord {
            date: raw.date,
            tmax: Celsius(raw.tmax),
            tmin: Celsius(raw.tmin),
            srad: Radiation(raw.srad),
        }
    }
}

/// Read a daily weather series from a CSV file.
///
/// The file must have the columns `date` (`YYYY-MM-DD`), `tmax`, `tmin` (°C) and `srad`
/// (MJ m⁻² day⁻¹), with one row per day in date order.
///
/// # Arguments
///
/// * `file_path` - Path to the weather file
pub fn read_weather(file_path: &Path) -> Result<WeatherSeries> {
    let records = read_csv::<WeatherRaw>(file_path)?
        .into_iter()
        .map(WeatherRecord::from)
        .collect();

    WeatherSeries::new(records).with_context(|| input_err_msg(file_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::date;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn create_weather_file(dir_path: &Path, contents: &str) -> PathBuf {
        let file_path = dir_path.join("weather.csv");
        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{contents}").unwrap();
        file_path
    }

    #[test]
    fn test_read_weather() {
        let dir = tempdir().unwrap();
        let file_path = create_weather_file(
            dir.path(),
            "date,tmax,tmin,srad
2024-04-01,18.5,6.2,14.1
2024-04-02,20.0,7.0,16.3",
        );

        let weather = read_weather(&file_path).unwrap();
        assert_eq!(weather.len(), 2);
        assert_eq!(
            weather.get(date(2024, 4, 2)),
            Some(&WeatherRecord {
                date: date(2024, 4, 2),
                tmax: Celsius(20.0),
                tmin: Celsius(7.0),
                srad: Radiation(16.3),
            })
        );
    }

    #[test]
    fn test_read_weather_tmin_above_tmax() {
        let dir = tempdir().unwrap();
        let file_path = create_weather_file(
            dir.path(),
            "date,tmax,tmin,srad
2024-04-01,5.0,6.2,14.1",
        );

        let err = read_weather(&file_path).unwrap_err();
        assert_eq!(err.to_string(), input_err_msg(&file_path));
        assert!(
            err.root_cause()
                .to_string()
                .contains("Tmin (6.2) is greater than Tmax (5)")
        );
    }

    #[test]
    fn test_read_weather_bad_date() {
        let dir = tempdir().unwrap();
        let file_path = create_weather_file(
            dir.path(),
            "date,tmax,tmin,srad
01/04/2024,18.5,6.2,14.1",
        );
        assert!(read_weather(&file_path).is_err());
    }
}
