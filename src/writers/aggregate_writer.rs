use crate::analyzers::{AnalysisBundle, StationDayFeature};
use crate::error::Result;
use crate::models::MatchStats;
use crate::processors::{CleaningStats, IntegrityReport};
use crate::utils::constants::{
    HOURLY_DISTRIBUTION_FILE, STATION_ACTIVITY_FILE, STATION_DAY_FEATURES_FILE, SUMMARY_FILE,
    TEMP_IMPACT_FILE, WEATHER_IMPACT_FILE, WEEKDAY_DISTRIBUTION_FILE, WIND_IMPACT_FILE,
};
use chrono::{NaiveDateTime, Weekday};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Serialize)]
struct HourRow {
    hour: usize,
    trips: u64,
}

#[derive(Serialize)]
struct WeatherRow<'a> {
    preciptype: &'a str,
    trips: u64,
}

#[derive(Serialize)]
struct WeekdayRow {
    day_of_week: usize,
    day_name: String,
    trips: u64,
}

/// Numbers of one run, written as `summary.json`.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub generated_at: NaiveDateTime,
    pub total_records: usize,
    pub match_stats: MatchStats,
    pub match_rate_pct: f64,
    pub unknown_station_rows: usize,
    pub temperature_edges: &'a [f64],
    pub defaulted_weather_columns: &'a [String],
    pub cleaning: &'a CleaningStats,
    pub integrity: &'a IntegrityReport,
    pub station_day_rows: usize,
}

/// Writes the aggregate views and run summary into one output directory.
pub struct AggregateWriter {
    output_dir: PathBuf,
}

impl AggregateWriter {
    /// Creates the directory if it does not exist yet.
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// One CSV per view; returns the files written.
    pub fn write_bundle(&self, bundle: &AnalysisBundle) -> Result<Vec<PathBuf>> {
        let hours = bundle
            .hourly_distribution
            .iter()
            .enumerate()
            .map(|(hour, &trips)| HourRow { hour, trips });
        let weather = bundle
            .weather_impact
            .iter()
            .map(|(preciptype, &trips)| WeatherRow { preciptype, trips });
        let weekdays = bundle
            .weekday_distribution
            .iter()
            .enumerate()
            .map(|(day, &trips)| WeekdayRow {
                day_of_week: day,
                day_name: weekday_name(day),
                trips,
            });

        let written = vec![
            self.write_csv(STATION_ACTIVITY_FILE, &bundle.station_activity.stations)?,
            self.write_csv(HOURLY_DISTRIBUTION_FILE, hours)?,
            self.write_csv(WEATHER_IMPACT_FILE, weather)?,
            self.write_csv(TEMP_IMPACT_FILE, &bundle.temp_impact)?,
            self.write_csv(WIND_IMPACT_FILE, &bundle.wind_impact)?,
            self.write_csv(WEEKDAY_DISTRIBUTION_FILE, weekdays)?,
        ];

        info!(
            dir = %self.output_dir.display(),
            files = written.len(),
            "Wrote aggregate tables"
        );
        Ok(written)
    }

    pub fn write_station_days(&self, features: &[StationDayFeature]) -> Result<PathBuf> {
        self.write_csv(STATION_DAY_FEATURES_FILE, features)
    }

    pub fn write_summary(&self, summary: &RunSummary<'_>) -> Result<PathBuf> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(file, summary)?;
        debug!(path = %path.display(), "Wrote run summary");
        Ok(path)
    }

    fn write_csv<I>(&self, name: &str, rows: I) -> Result<PathBuf>
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        let path = self.output_dir.join(name);
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        debug!(path = %path.display(), "Wrote CSV");
        Ok(path)
    }
}

fn weekday_name(day: usize) -> String {
    u8::try_from(day)
        .ok()
        .and_then(|d| Weekday::try_from(d).ok())
        .map_or_else(|| day.to_string(), |d| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::ride_analyzer::test_support::{observation, table};
    use crate::analyzers::RideAnalyzer;
    use tempfile::TempDir;

    #[test]
    fn test_write_bundle_files() -> Result<()> {
        let dir = TempDir::new()?;
        let out = dir.path().join("nested").join("run");
        let writer = AggregateWriter::new(&out)?;

        let table = table(vec![
            observation("A", "2024-06-03 08:05:00", 5.0, 2.0),
            observation("B", "2024-06-04 09:05:00", 15.0, 9.0),
        ]);
        let bundle = RideAnalyzer::new().analyze(&table)?;
        let written = writer.write_bundle(&bundle)?;
        assert_eq!(written.len(), 6);
        assert!(written.iter().all(|p| p.exists()));

        let hourly = fs::read_to_string(out.join(HOURLY_DISTRIBUTION_FILE))?;
        let lines: Vec<&str> = hourly.lines().collect();
        assert_eq!(lines[0], "hour,trips");
        assert_eq!(lines.len(), 25);
        assert_eq!(lines[9], "8,1");

        let weekday = fs::read_to_string(out.join(WEEKDAY_DISTRIBUTION_FILE))?;
        assert!(weekday.lines().nth(1).unwrap().starts_with("0,Mon,1"));

        let stations = fs::read_to_string(out.join(STATION_ACTIVITY_FILE))?;
        assert!(stations.starts_with("station_id,station_name,trips"));
        Ok(())
    }

    #[test]
    fn test_empty_station_days_still_has_file() -> Result<()> {
        let dir = TempDir::new()?;
        let writer = AggregateWriter::new(dir.path())?;
        let path = writer.write_station_days(&[])?;
        assert!(path.exists());
        Ok(())
    }
}
