//! Run configuration.
//!
//! Values come from built-in defaults, then an optional configuration file,
//! then `BIKESHARE__`-prefixed environment variables (double underscore
//! separates nesting, e.g. `BIKESHARE__TEMPERATURE__BIN_WIDTH=4`). Command
//! line overrides are applied by the caller. The merged result is validated
//! once before any data is read.

use crate::error::{ProcessingError, Result};
use crate::models::{TempBand, WindBand};
use crate::processors::imputation::{FallbackChain, GroupBy};
use crate::utils::constants::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

const ENV_PREFIX: &str = "BIKESHARE";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    #[validate(nested)]
    pub input: InputConfig,

    #[validate(nested)]
    pub weather_defaults: WeatherDefaults,

    #[validate(length(min = 1))]
    pub unknown_station: String,

    #[validate(nested)]
    pub wind: WindConfig,

    #[validate(nested)]
    pub temperature: TemperatureConfig,

    #[validate(nested)]
    pub imputation: ImputationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InputConfig {
    pub trips_file: PathBuf,
    pub stations_file: PathBuf,
    pub weather_file: PathBuf,

    /// Encoding label understood by `encoding_rs` (e.g. `utf-8`, `gbk`).
    #[validate(length(min = 1))]
    pub encoding: String,

    pub use_mmap: bool,
}

/// Defaulting policy for weather columns absent from the input file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WeatherDefaults {
    pub temp: f64,

    #[validate(range(min = 0.0))]
    pub windspeed: f64,

    #[validate(length(min = 1))]
    pub preciptype: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WindConfig {
    /// Divisor turning the input unit (km/h) into m/s.
    #[validate(range(exclusive_min = 0.0))]
    pub unit_divisor: f64,

    /// Inclusive lower bound of each band, lowest first; the last band is open.
    #[validate(custom(function = "validate_wind_bounds"))]
    pub band_lower_bounds: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TemperatureConfig {
    #[validate(range(exclusive_min = 0.0))]
    pub min_span: f64,

    #[validate(range(exclusive_min = 0.0))]
    pub bin_width: f64,

    #[validate(range(min = 2))]
    pub min_edges: usize,

    #[validate(range(min = 0.0))]
    pub fallback_padding: f64,

    #[validate(range(min = 1, max = 5))]
    pub fallback_bins: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ImputationConfig {
    #[validate(length(min = 1))]
    pub windspeed: Vec<GroupBy>,

    #[validate(length(min = 1))]
    pub temp: Vec<GroupBy>,
}

fn validate_wind_bounds(bounds: &[f64]) -> std::result::Result<(), ValidationError> {
    if bounds.len() != WindBand::ALL.len() {
        return Err(ValidationError::new("wind_band_count"));
    }
    if bounds.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ValidationError::new("wind_bounds_not_increasing"));
    }
    Ok(())
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            weather_defaults: WeatherDefaults::default(),
            unknown_station: UNKNOWN_STATION.to_string(),
            wind: WindConfig::default(),
            temperature: TemperatureConfig::default(),
            imputation: ImputationConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            trips_file: PathBuf::from(DEFAULT_TRIPS_FILE),
            stations_file: PathBuf::from(DEFAULT_STATIONS_FILE),
            weather_file: PathBuf::from(DEFAULT_WEATHER_FILE),
            encoding: "utf-8".to_string(),
            use_mmap: false,
        }
    }
}

impl Default for WeatherDefaults {
    fn default() -> Self {
        Self {
            temp: DEFAULT_TEMP,
            windspeed: DEFAULT_WINDSPEED,
            preciptype: DEFAULT_PRECIPTYPE.to_string(),
        }
    }
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            unit_divisor: KMH_PER_MS,
            band_lower_bounds: WIND_BAND_LOWER_BOUNDS.to_vec(),
        }
    }
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            min_span: TEMP_MIN_SPAN,
            bin_width: TEMP_BIN_WIDTH,
            min_edges: TEMP_MIN_EDGES,
            fallback_padding: TEMP_FALLBACK_PADDING,
            fallback_bins: TEMP_FALLBACK_BINS,
        }
    }
}

impl Default for ImputationConfig {
    fn default() -> Self {
        Self {
            windspeed: vec![GroupBy::Station, GroupBy::HourPreciptype, GroupBy::Global],
            temp: vec![GroupBy::DateHour, GroupBy::Global],
        }
    }
}

impl ImputationConfig {
    pub fn windspeed_chain(&self) -> FallbackChain {
        FallbackChain::new(self.windspeed.clone())
    }

    pub fn temp_chain(&self) -> FallbackChain {
        FallbackChain::new(self.temp.clone())
    }
}

impl TemperatureConfig {
    /// Number of labels available for dynamic bins.
    pub fn label_count(&self) -> usize {
        TempBand::ALL.len()
    }
}

impl PipelineConfig {
    /// Load configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ProcessingError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: PipelineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_trips_file(mut self, path: PathBuf) -> Self {
        self.input.trips_file = path;
        self
    }

    pub fn with_stations_file(mut self, path: PathBuf) -> Self {
        self.input.stations_file = path;
        self
    }

    pub fn with_weather_file(mut self, path: PathBuf) -> Self {
        self.input.weather_file = path;
        self
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.input.encoding = encoding.to_string();
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.input.use_mmap = use_mmap;
        self
    }
}
