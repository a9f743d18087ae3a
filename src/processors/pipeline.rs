use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{StationTable, UnifiedTable, WeatherTable};
use crate::processors::trip_cleaner::{clean_trips, CleaningStats};
use crate::processors::{DataMerger, IntegrityChecker, IntegrityReport, WeatherNormalizer};
use crate::readers::{SourceReader, StationReader, TripReader, WeatherReader};
use crate::utils::ProgressReporter;
use tracing::info;

/// Everything the load, clean and merge stages produce.
pub struct PipelineOutput {
    pub table: UnifiedTable,
    pub stations: StationTable,
    pub report: IntegrityReport,
    pub cleaning: CleaningStats,
    pub defaulted_weather_columns: Vec<String>,
}

/// Drives the preprocessing stages in order: read, clean, normalize, merge, check.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, progress: Option<&ProgressReporter>) -> Result<PipelineOutput> {
        let input = &self.config.input;
        let source = SourceReader::new(&input.encoding, input.use_mmap)?;

        if let Some(p) = progress {
            p.set_message("Reading input files...");
        }

        let trips = TripReader::new(source).read_trips(&input.trips_file)?;
        let stations = StationReader::new(source).read_stations(&input.stations_file)?;
        let weather = self.load_weather(source)?;

        if let Some(p) = progress {
            p.set_message("Cleaning trips...");
        }
        let (trips, cleaning) = clean_trips(trips)?;
        if trips.is_empty() {
            return Err(ProcessingError::Integrity(format!(
                "no usable trips in {}",
                input.trips_file.display()
            )));
        }

        if let Some(p) = progress {
            p.set_message("Merging trips with weather and stations...");
        }
        let table = DataMerger::new(&self.config).merge(&trips, &weather, &stations)?;

        if let Some(p) = progress {
            p.set_message("Checking data integrity...");
        }
        let report = IntegrityChecker::new().check_integrity(&table)?;

        info!(
            rows = table.len(),
            stations = stations.len(),
            "Preprocessing complete"
        );
        if let Some(p) = progress {
            p.finish_with_message("Preprocessing complete");
        }

        Ok(PipelineOutput {
            table,
            stations,
            report,
            cleaning,
            defaulted_weather_columns: weather.defaulted_columns,
        })
    }

    fn load_weather(&self, source: SourceReader) -> Result<WeatherTable> {
        let reader = WeatherReader::new(source, self.config.weather_defaults.clone());
        let mut weather = reader.read_weather(&self.config.input.weather_file)?;
        WeatherNormalizer::new(&self.config.wind).normalize(&mut weather.records);
        Ok(weather)
    }
}
