use crate::models::WindBand;
use crate::utils::DateHour;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One hourly weather observation.
///
/// `windspeed` is in km/h as delivered; `windspeed_ms` and `wind_bin` are
/// filled in by the weather normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub datetime: NaiveDateTime,
    pub date_hour: DateHour,
    pub temp: Option<f64>,
    pub windspeed: Option<f64>,
    pub preciptype: Option<String>,
    pub windspeed_ms: Option<f64>,
    pub wind_bin: Option<WindBand>,
}

impl WeatherRecord {
    pub fn new(
        datetime: NaiveDateTime,
        temp: Option<f64>,
        windspeed: Option<f64>,
        preciptype: Option<String>,
    ) -> Self {
        Self {
            date_hour: DateHour::from_datetime(&datetime),
            datetime,
            temp,
            windspeed,
            preciptype,
            windspeed_ms: None,
            wind_bin: None,
        }
    }
}

/// Weather file contents plus what the loader had to repair.
#[derive(Debug, Clone, Default)]
pub struct WeatherTable {
    pub records: Vec<WeatherRecord>,
    /// Columns absent from the file that were synthesized from defaults.
    pub defaulted_columns: Vec<String>,
    /// Rows dropped because their datetime could not be parsed.
    pub dropped_rows: usize,
}

impl WeatherTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let min = self.records.iter().map(|r| r.datetime).min()?;
        let max = self.records.iter().map(|r| r.datetime).max()?;
        Some((min, max))
    }
}
