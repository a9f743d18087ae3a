use crate::error::{ProcessingError, Result};
use crate::models::{Observation, TempBand, UnifiedTable, WindBand};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationCount {
    pub station_id: String,
    pub station_name: String,
    pub trips: u64,
}

/// Trips per start station, ordered by station id then name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StationActivity {
    pub stations: Vec<StationCount>,
}

impl StationActivity {
    /// The `n` busiest stations, ties broken by station id.
    pub fn top(&self, n: usize) -> Vec<&StationCount> {
        let mut ranked: Vec<&StationCount> = self.stations.iter().collect();
        ranked.sort_by(|a, b| b.trips.cmp(&a.trips).then_with(|| a.station_id.cmp(&b.station_id)));
        ranked.truncate(n);
        ranked
    }

    pub fn total(&self) -> u64 {
        self.stations.iter().map(|s| s.trips).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TempImpact {
    pub band: TempBand,
    pub trips: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindImpact {
    pub band: WindBand,
    pub trips: u64,
    /// `None` for a band with no trips.
    pub mean_windspeed_ms: Option<f64>,
}

/// Every aggregate view of the unified table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisBundle {
    pub station_activity: StationActivity,
    /// Index is the hour of day.
    pub hourly_distribution: [u64; 24],
    pub weather_impact: BTreeMap<String, u64>,
    pub temp_impact: Vec<TempImpact>,
    pub wind_impact: Vec<WindImpact>,
    /// Index is the ISO weekday, Monday first.
    pub weekday_distribution: [u64; 7],
}

impl AnalysisBundle {
    pub fn total_trips(&self) -> u64 {
        self.hourly_distribution.iter().sum()
    }

    pub fn busiest_hour(&self) -> Option<usize> {
        self.hourly_distribution
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(&a.0)))
            .filter(|(_, count)| **count > 0)
            .map(|(hour, _)| hour)
    }
}

pub struct RideAnalyzer;

impl RideAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compute all views. Each view only reads the table, so they run on the
    /// rayon pool side by side.
    pub fn analyze(&self, table: &UnifiedTable) -> Result<AnalysisBundle> {
        if table.is_empty() {
            return Err(ProcessingError::MissingData(
                "unified table is empty, nothing to aggregate".to_string(),
            ));
        }
        let rows = table.observations.as_slice();
        let temp_labels = table.temperature_bins.labels.as_slice();

        let ((station_activity, hourly_distribution), (weather_impact, temp_impact)) = rayon::join(
            || rayon::join(|| station_activity(rows), || hourly_distribution(rows)),
            || rayon::join(|| weather_impact(rows), || temp_impact(rows, temp_labels)),
        );
        let (wind_impact, weekday_distribution) =
            rayon::join(|| wind_impact(rows), || weekday_distribution(rows));

        let bundle = AnalysisBundle {
            station_activity,
            hourly_distribution,
            weather_impact,
            temp_impact,
            wind_impact,
            weekday_distribution,
        };

        info!(
            trips = bundle.total_trips(),
            stations = bundle.station_activity.stations.len(),
            weather_types = bundle.weather_impact.len(),
            "Aggregation complete"
        );
        if let Some(hour) = bundle.busiest_hour() {
            debug!(hour, trips = bundle.hourly_distribution[hour], "Busiest hour");
        }

        Ok(bundle)
    }
}

impl Default for RideAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn station_activity(rows: &[Observation]) -> StationActivity {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for row in rows {
        *counts
            .entry((row.start_station_id.as_str(), row.station_name.as_str()))
            .or_default() += 1;
    }
    StationActivity {
        stations: counts
            .into_iter()
            .map(|((id, name), trips)| StationCount {
                station_id: id.to_string(),
                station_name: name.to_string(),
                trips,
            })
            .collect(),
    }
}

pub fn hourly_distribution(rows: &[Observation]) -> [u64; 24] {
    let mut hours = [0u64; 24];
    for row in rows {
        if let Some(slot) = hours.get_mut(row.time.hour as usize) {
            *slot += 1;
        }
    }
    hours
}

pub fn weather_impact(rows: &[Observation]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for row in rows {
        match counts.get_mut(row.preciptype.as_str()) {
            Some(count) => *count += 1,
            None => {
                counts.insert(row.preciptype.clone(), 1);
            }
        }
    }
    counts
}

/// Trips per fitted temperature label, in label order; unbinned rows are not counted.
pub fn temp_impact(rows: &[Observation], labels: &[TempBand]) -> Vec<TempImpact> {
    let mut counts: HashMap<TempBand, u64> = HashMap::new();
    for band in rows.iter().filter_map(|r| r.temp_bin) {
        *counts.entry(band).or_default() += 1;
    }
    labels
        .iter()
        .map(|&band| TempImpact {
            band,
            trips: counts.get(&band).copied().unwrap_or(0),
        })
        .collect()
}

pub fn wind_impact(rows: &[Observation]) -> Vec<WindImpact> {
    let mut sums: HashMap<WindBand, (u64, f64, usize)> = HashMap::new();
    for row in rows {
        let Some(band) = row.wind_bin else { continue };
        let entry = sums.entry(band).or_insert((0, 0.0, 0));
        entry.0 += 1;
        if let Some(ms) = row.windspeed_ms {
            entry.1 += ms;
            entry.2 += 1;
        }
    }
    WindBand::ALL
        .iter()
        .map(|&band| {
            let (trips, sum, n) = sums.get(&band).copied().unwrap_or((0, 0.0, 0));
            WindImpact {
                band,
                trips,
                mean_windspeed_ms: (n > 0).then(|| sum / n as f64),
            }
        })
        .collect()
}

pub fn weekday_distribution(rows: &[Observation]) -> [u64; 7] {
    let mut days = [0u64; 7];
    for row in rows {
        if let Some(slot) = days.get_mut(row.time.day_of_week as usize) {
            *slot += 1;
        }
    }
    days
}
