/// Default input file names
pub const DEFAULT_TRIPS_FILE: &str = "cleaned_daily_rent_data.csv";
pub const DEFAULT_STATIONS_FILE: &str = "cleaned_station_list.csv";
pub const DEFAULT_WEATHER_FILE: &str = "cleaned_weather.csv";

/// Trip file columns
pub const COL_DURATION: &str = "duration";
pub const COL_START_STATION_ID: &str = "start_station_id";
pub const COL_STARTED_AT: &str = "started_at";

/// Station file columns
pub const COL_STATION_ID: &str = "station_id";
pub const COL_ID: &str = "id";
pub const COL_STATION_NAME: &str = "station_name";

/// Weather file columns
pub const COL_DATETIME: &str = "datetime";
pub const COL_TEMP: &str = "temp";
pub const COL_WINDSPEED: &str = "windspeed";
pub const COL_PRECIPTYPE: &str = "preciptype";

/// Weather column defaults applied when a column is absent
pub const DEFAULT_TEMP: f64 = 25.0;
pub const DEFAULT_WINDSPEED: f64 = 5.0;
pub const DEFAULT_PRECIPTYPE: &str = "no precipitation";

/// Sentinel station name for trips without a station match
pub const UNKNOWN_STATION: &str = "unknown station";

/// Wind speed conversion and Beaufort-derived band lower bounds (m/s)
pub const KMH_PER_MS: f64 = 3.6;
pub const WIND_BAND_LOWER_BOUNDS: [f64; 5] = [0.0, 1.5, 3.3, 5.4, 7.9];

/// Dynamic temperature binning
pub const TEMP_MIN_SPAN: f64 = 15.0;
pub const TEMP_BIN_WIDTH: f64 = 5.0;
pub const TEMP_MIN_EDGES: usize = 5;
pub const TEMP_FALLBACK_PADDING: f64 = 5.0;
pub const TEMP_FALLBACK_BINS: usize = 5;

/// Join key format (hour bucket)
pub const DATE_HOUR_FORMAT: &str = "%Y-%m-%d %H";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BATCH_SIZE: usize = 8192;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Output artifact names
pub const OBSERVATIONS_FILE: &str = "observations.parquet";
pub const STATION_ACTIVITY_FILE: &str = "station_activity.csv";
pub const HOURLY_DISTRIBUTION_FILE: &str = "hourly_distribution.csv";
pub const WEATHER_IMPACT_FILE: &str = "weather_impact.csv";
pub const TEMP_IMPACT_FILE: &str = "temp_impact.csv";
pub const WIND_IMPACT_FILE: &str = "wind_impact.csv";
pub const WEEKDAY_DISTRIBUTION_FILE: &str = "weekday_distribution.csv";
pub const STATION_DAY_FEATURES_FILE: &str = "station_day_features.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
