//! Daily per-station ride counts with lagged history, the training table
//! for ride-demand regression.

use crate::models::Observation;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationDayFeature {
    pub station_id: String,
    pub date: NaiveDate,
    pub ride_count: u64,
    pub avg_temp: Option<f64>,
    pub avg_windspeed: Option<f64>,
    pub is_weekend: bool,
    /// Ride count on the station's previous recorded day.
    pub lag_1_day: u64,
    /// Ride count seven recorded days earlier.
    pub lag_7_day: u64,
}

#[derive(Default)]
struct DayAccumulator {
    rides: u64,
    temp_sum: f64,
    temp_n: usize,
    wind_sum: f64,
    wind_n: usize,
}

impl DayAccumulator {
    fn add(&mut self, observation: &Observation) {
        self.rides += 1;
        if let Some(t) = observation.temp {
            self.temp_sum += t;
            self.temp_n += 1;
        }
        if let Some(w) = observation.windspeed {
            self.wind_sum += w;
            self.wind_n += 1;
        }
    }

    fn mean(sum: f64, n: usize) -> Option<f64> {
        (n > 0).then(|| sum / n as f64)
    }
}

/// Build the feature table, ordered by station then date. Days without a
/// full week of earlier history are dropped.
pub fn build_station_day_features(observations: &[Observation]) -> Vec<StationDayFeature> {
    let mut days: BTreeMap<(&str, NaiveDate), DayAccumulator> = BTreeMap::new();
    for observation in observations {
        days.entry((observation.start_station_id.as_str(), observation.time.date))
            .or_default()
            .add(observation);
    }
    let station_days = days.len();

    let mut features = Vec::new();
    let mut history: Vec<u64> = Vec::new();
    let mut current_station: Option<&str> = None;

    for ((station, date), day) in days {
        if current_station != Some(station) {
            current_station = Some(station);
            history.clear();
        }

        let lag = |n: usize| history.len().checked_sub(n).map(|idx| history[idx]);
        if let (Some(lag_1_day), Some(lag_7_day)) = (lag(1), lag(7)) {
            features.push(StationDayFeature {
                station_id: station.to_string(),
                date,
                ride_count: day.rides,
                avg_temp: DayAccumulator::mean(day.temp_sum, day.temp_n),
                avg_windspeed: DayAccumulator::mean(day.wind_sum, day.wind_n),
                is_weekend: matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
                lag_1_day,
                lag_7_day,
            });
        }
        history.push(day.rides);
    }

    info!(
        station_days,
        rows = features.len(),
        "Built station-day features"
    );
    features
}
