use crate::models::{TempBand, TimeFeatures, WindBand};
use crate::processors::temperature_binner::TemperatureBins;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the unified table: a trip joined with its hour's weather and
/// its start station's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub start_station_id: String,
    pub station_name: String,
    pub duration_minutes: Option<i64>,
    pub started_at: NaiveDateTime,
    pub time: TimeFeatures,

    /// Timestamp of the matched weather row; `None` when the hour had no weather.
    pub weather_datetime: Option<NaiveDateTime>,
    pub temp: Option<f64>,
    /// km/h
    pub windspeed: Option<f64>,
    pub preciptype: String,
    pub windspeed_ms: Option<f64>,
    pub wind_bin: Option<WindBand>,
    pub temp_bin: Option<TempBand>,
}

impl Observation {
    pub fn has_weather_match(&self) -> bool {
        self.weather_datetime.is_some()
    }
}

/// Weather join coverage: rows with a non-null windspeed straight after the join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub matched: usize,
    pub total: usize,
}

impl MatchStats {
    pub fn rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    pub fn percentage(&self) -> f64 {
        self.rate() * 100.0
    }
}

/// The fully joined, imputed and binned table every consumer reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedTable {
    pub observations: Vec<Observation>,
    pub temperature_bins: TemperatureBins,
    pub match_stats: MatchStats,
    pub unknown_station_rows: usize,
}

impl UnifiedTable {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_rate() {
        let stats = MatchStats {
            matched: 3,
            total: 4,
        };
        assert_eq!(stats.rate(), 0.75);
        assert_eq!(stats.percentage(), 75.0);
        assert_eq!(MatchStats::default().rate(), 0.0);
    }
}
