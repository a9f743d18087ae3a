use crate::config::{WeatherDefaults, WindConfig};
use crate::models::{WeatherRecord, WindBand};
use crate::utils::constants::{COL_PRECIPTYPE, COL_TEMP, COL_WINDSPEED};
use csv::StringRecord;
use tracing::warn;

/// Where a weather field comes from: a file column, or the default policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource<T> {
    Column(usize),
    Default(T),
}

impl<T: Clone> ColumnSource<T> {
    pub fn is_default(&self) -> bool {
        matches!(self, ColumnSource::Default(_))
    }
}

/// Declared weather schema resolved against a file header.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSchema {
    pub temp: ColumnSource<f64>,
    pub windspeed: ColumnSource<f64>,
    pub preciptype: ColumnSource<String>,
}

impl WeatherSchema {
    /// Match the optional weather columns by name, substituting the
    /// configured default for each one the file lacks.
    pub fn resolve(headers: &StringRecord, defaults: &WeatherDefaults) -> Self {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let temp = match position(COL_TEMP) {
            Some(idx) => ColumnSource::Column(idx),
            None => ColumnSource::Default(defaults.temp),
        };
        let windspeed = match position(COL_WINDSPEED) {
            Some(idx) => ColumnSource::Column(idx),
            None => ColumnSource::Default(defaults.windspeed),
        };
        let preciptype = match position(COL_PRECIPTYPE) {
            Some(idx) => ColumnSource::Column(idx),
            None => ColumnSource::Default(defaults.preciptype.clone()),
        };

        let schema = Self {
            temp,
            windspeed,
            preciptype,
        };

        for column in schema.defaulted_columns() {
            warn!(column, "Weather data is missing a column, using the default value");
        }

        schema
    }

    pub fn defaulted_columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::new();
        if self.temp.is_default() {
            columns.push(COL_TEMP);
        }
        if self.windspeed.is_default() {
            columns.push(COL_WINDSPEED);
        }
        if self.preciptype.is_default() {
            columns.push(COL_PRECIPTYPE);
        }
        columns
    }

    pub fn temp(&self, row: &StringRecord) -> Option<f64> {
        match &self.temp {
            ColumnSource::Column(idx) => row.get(*idx).and_then(coerce_numeric),
            ColumnSource::Default(value) => Some(*value),
        }
    }

    pub fn windspeed(&self, row: &StringRecord) -> Option<f64> {
        match &self.windspeed {
            ColumnSource::Column(idx) => row.get(*idx).and_then(coerce_numeric),
            ColumnSource::Default(value) => Some(*value),
        }
    }

    pub fn preciptype(&self, row: &StringRecord) -> Option<String> {
        match &self.preciptype {
            ColumnSource::Column(idx) => row
                .get(*idx)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            ColumnSource::Default(value) => Some(value.clone()),
        }
    }
}

/// Numeric coercion where anything unparsable becomes missing.
pub fn coerce_numeric(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Converts wind speed to m/s and assigns the wind band.
#[derive(Debug, Clone)]
pub struct WeatherNormalizer {
    unit_divisor: f64,
    lower_bounds: Vec<f64>,
}

impl WeatherNormalizer {
    pub fn new(config: &WindConfig) -> Self {
        Self {
            unit_divisor: config.unit_divisor,
            lower_bounds: config.band_lower_bounds.clone(),
        }
    }

    pub fn to_meters_per_second(&self, kmh: f64) -> f64 {
        kmh / self.unit_divisor
    }

    /// Band for a speed in m/s; each band includes its lower bound.
    pub fn classify(&self, ms: f64) -> Option<WindBand> {
        if ms.is_nan() {
            return None;
        }
        self.lower_bounds
            .iter()
            .zip(WindBand::ALL)
            .rev()
            .find(|(lower, _)| ms >= **lower)
            .map(|(_, band)| band)
    }

    /// Speed in m/s and band for an optional km/h reading.
    pub fn wind_features(&self, windspeed_kmh: Option<f64>) -> (Option<f64>, Option<WindBand>) {
        let ms = windspeed_kmh.map(|kmh| self.to_meters_per_second(kmh));
        (ms, ms.and_then(|v| self.classify(v)))
    }

    pub fn normalize(&self, records: &mut [WeatherRecord]) {
        for record in records.iter_mut() {
            let (ms, band) = self.wind_features(record.windspeed);
            record.windspeed_ms = ms;
            record.wind_bin = band;
        }
    }
}

impl Default for WeatherNormalizer {
    fn default() -> Self {
        Self::new(&WindConfig::default())
    }
}
