use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{
    MatchStats, Observation, StationTable, TripRecord, UnifiedTable, WeatherRecord, WeatherTable,
};
use crate::processors::imputation::{FallbackChain, FillReport};
use crate::processors::integrity_checker::ensure_postconditions;
use crate::processors::temperature_binner::{TemperatureBinner, TemperatureBins};
use crate::processors::weather_normalizer::WeatherNormalizer;
use crate::utils::DateHour;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Joins trips with hourly weather and station names, fills weather gaps and
/// derives the wind and temperature bands.
pub struct DataMerger {
    normalizer: WeatherNormalizer,
    binner: TemperatureBinner,
    windspeed_chain: FallbackChain,
    temp_chain: FallbackChain,
    default_preciptype: String,
    unknown_station: String,
}

impl DataMerger {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            normalizer: WeatherNormalizer::new(&config.wind),
            binner: TemperatureBinner::new(&config.temperature),
            windspeed_chain: config.imputation.windspeed_chain(),
            temp_chain: config.imputation.temp_chain(),
            default_preciptype: config.weather_defaults.preciptype.clone(),
            unknown_station: config.unknown_station.clone(),
        }
    }

    /// Build the unified table.
    ///
    /// Fails when the result would be empty or carry no temperature at all.
    pub fn merge(
        &self,
        trips: &[TripRecord],
        weather: &WeatherTable,
        stations: &StationTable,
    ) -> Result<UnifiedTable> {
        self.report_time_coverage(trips, weather);

        let (mut observations, match_stats) = self.join_weather(trips, weather);
        info!(
            matched = match_stats.matched,
            total = match_stats.total,
            "Weather match rate: {}/{} ({:.2}%)",
            match_stats.matched,
            match_stats.total,
            match_stats.percentage()
        );

        self.impute_weather(&mut observations);
        self.rebin_wind(&mut observations);

        ensure_postconditions(&observations)?;

        let temperature_bins = self.bin_temperatures(&mut observations)?;
        let unknown_station_rows = self.attach_station_names(&mut observations, stations);

        Ok(UnifiedTable {
            observations,
            temperature_bins,
            match_stats,
            unknown_station_rows,
        })
    }

    /// Left join on the hour key. The first weather row of a duplicated hour wins.
    ///
    /// Missing precipitation types are filled here; everything else is left
    /// as found for the imputation stage.
    pub fn join_weather(
        &self,
        trips: &[TripRecord],
        weather: &WeatherTable,
    ) -> (Vec<Observation>, MatchStats) {
        let mut by_hour: HashMap<&DateHour, &WeatherRecord> = HashMap::with_capacity(weather.len());
        let mut duplicates = 0usize;
        for record in &weather.records {
            match by_hour.entry(&record.date_hour) {
                Entry::Occupied(_) => duplicates += 1,
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }
        if duplicates > 0 {
            warn!(duplicates, "Weather data has repeated hours; keeping the first row of each");
        }

        let mut matched = 0usize;
        let mut precip_filled = 0usize;

        let observations: Vec<Observation> = trips
            .iter()
            .map(|trip| {
                let hour_weather = by_hour.get(&trip.time.date_hour).copied();
                let windspeed = hour_weather.and_then(|w| w.windspeed);
                if windspeed.is_some() {
                    matched += 1;
                }

                let preciptype = match hour_weather.and_then(|w| w.preciptype.clone()) {
                    Some(value) => value,
                    None => {
                        precip_filled += 1;
                        self.default_preciptype.clone()
                    }
                };

                Observation {
                    start_station_id: trip.start_station_id.clone(),
                    station_name: String::new(),
                    duration_minutes: trip.duration_minutes,
                    started_at: trip.started_at,
                    time: trip.time.clone(),
                    weather_datetime: hour_weather.map(|w| w.datetime),
                    temp: hour_weather.and_then(|w| w.temp),
                    windspeed,
                    preciptype,
                    windspeed_ms: hour_weather.and_then(|w| w.windspeed_ms),
                    wind_bin: hour_weather.and_then(|w| w.wind_bin),
                    temp_bin: None,
                }
            })
            .collect();

        if precip_filled > 0 {
            debug!(
                rows = precip_filled,
                value = %self.default_preciptype,
                "Filled missing precipitation type"
            );
        }

        let stats = MatchStats {
            matched,
            total: observations.len(),
        };
        (observations, stats)
    }

    fn report_time_coverage(&self, trips: &[TripRecord], weather: &WeatherTable) {
        let trip_range = trips
            .iter()
            .map(|t| t.started_at)
            .min()
            .zip(trips.iter().map(|t| t.started_at).max());

        let (Some((trip_min, trip_max)), Some((weather_min, weather_max))) =
            (trip_range, weather.time_range())
        else {
            return;
        };

        info!("Trip time range: {} to {}", trip_min, trip_max);
        info!("Weather time range: {} to {}", weather_min, weather_max);

        if trip_min < weather_min || trip_max > weather_max {
            warn!("Weather time range does not fully cover the trips; some hours will not match");
        }
    }

    /// Run the windspeed and temperature fallback chains.
    fn impute_weather(&self, observations: &mut [Observation]) {
        let mut windspeed: Vec<Option<f64>> = observations.iter().map(|o| o.windspeed).collect();
        let wind_report = self.windspeed_chain.fill(observations, &mut windspeed);
        log_fill("windspeed", &wind_report);

        let mut temp: Vec<Option<f64>> = observations.iter().map(|o| o.temp).collect();
        let temp_report = self.temp_chain.fill(observations, &mut temp);
        log_fill("temp", &temp_report);

        for ((observation, w), t) in observations.iter_mut().zip(windspeed).zip(temp) {
            observation.windspeed = w;
            observation.temp = t;
        }
    }

    /// Recompute m/s and the wind band from the imputed windspeed.
    fn rebin_wind(&self, observations: &mut [Observation]) {
        for observation in observations.iter_mut() {
            let (ms, band) = self.normalizer.wind_features(observation.windspeed);
            observation.windspeed_ms = ms;
            observation.wind_bin = band;
        }
    }

    /// Fit the temperature bins once over the whole table, then label every row.
    fn bin_temperatures(&self, observations: &mut [Observation]) -> Result<TemperatureBins> {
        let temps: Vec<Option<f64>> = observations.iter().map(|o| o.temp).collect();
        let bins = self.binner.fit(&temps)?;

        let mut unbinned = 0usize;
        for observation in observations.iter_mut() {
            observation.temp_bin = observation.temp.and_then(|t| bins.assign(t));
            if observation.temp.is_some() && observation.temp_bin.is_none() {
                unbinned += 1;
            }
        }
        if unbinned > 0 {
            warn!(rows = unbinned, "Temperatures outside the fitted bin edges were left unbinned");
        }

        Ok(bins)
    }

    /// Left join station names; returns the number of rows without a match.
    fn attach_station_names(&self, observations: &mut [Observation], stations: &StationTable) -> usize {
        let names = stations.name_lookup();
        let duplicates = stations.duplicate_ids();
        if duplicates > 0 {
            warn!(
                duplicates,
                "Station list repeats ids; keeping the first name of each"
            );
        }
        let mut unknown = 0usize;

        for observation in observations.iter_mut() {
            observation.station_name = match names.get(observation.start_station_id.as_str()) {
                Some(name) => (*name).to_string(),
                None => {
                    unknown += 1;
                    self.unknown_station.clone()
                }
            };
        }

        if unknown > 0 {
            warn!(
                rows = unknown,
                "Trips reference stations missing from the station list"
            );
        }
        unknown
    }
}

fn log_fill(column: &str, report: &FillReport) {
    if report.missing_before == 0 {
        return;
    }
    for (strategy, filled) in &report.filled_by_step {
        debug!(column, strategy = %strategy, filled, "Imputation step");
    }
    info!(
        column,
        missing = report.missing_before,
        filled = report.total_filled(),
        remaining = report.remaining,
        "Imputed missing weather values"
    );
}
