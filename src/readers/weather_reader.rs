use crate::config::WeatherDefaults;
use crate::error::Result;
use crate::models::{WeatherRecord, WeatherTable};
use crate::processors::weather_normalizer::WeatherSchema;
use crate::readers::source::SourceReader;
use crate::readers::trip_reader::required_column;
use crate::utils::constants::COL_DATETIME;
use crate::utils::parse_timestamp;
use std::path::Path;
use tracing::{info, warn};

pub struct WeatherReader {
    source: SourceReader,
    defaults: WeatherDefaults,
}

impl WeatherReader {
    pub fn new(source: SourceReader, defaults: WeatherDefaults) -> Self {
        Self { source, defaults }
    }

    /// Read hourly weather, defaulting absent columns and coercing numbers.
    ///
    /// Rows whose datetime cannot be parsed can never join and are dropped.
    pub fn read_weather(&self, path: &Path) -> Result<WeatherTable> {
        let text = self.source.read_to_string(path)?;
        let mut reader = self.source.csv_reader(&text);

        let headers = reader.headers()?.clone();
        let file = path.display().to_string();
        let datetime_idx = required_column(&headers, COL_DATETIME, &file)?;
        let schema = WeatherSchema::resolve(&headers, &self.defaults);

        let mut records = Vec::new();
        let mut dropped_rows = 0usize;
        for row in reader.records() {
            let row = row?;
            let Some(datetime) = row.get(datetime_idx).and_then(parse_timestamp) else {
                dropped_rows += 1;
                continue;
            };
            records.push(WeatherRecord::new(
                datetime,
                schema.temp(&row),
                schema.windspeed(&row),
                schema.preciptype(&row),
            ));
        }

        if dropped_rows > 0 {
            warn!(file = %file, rows = dropped_rows, "Dropped weather rows with unparsable datetime");
        }
        info!(file = %file, records = records.len(), "Loaded weather records");

        Ok(WeatherTable {
            records,
            defaulted_columns: schema
                .defaulted_columns()
                .into_iter()
                .map(str::to_string)
                .collect(),
            dropped_rows,
        })
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new(SourceReader::utf8(), WeatherDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_weather_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "name,datetime,temp,windspeed,preciptype")?;
        writeln!(file, "city,2024-06-01T08:00:00,21.5,14.4,rain")?;
        writeln!(file, "city,2024-06-01T09:00:00,n/a,,")?;
        writeln!(file, "city,not a time,20.0,10.0,")?;

        let table = WeatherReader::default().read_weather(file.path())?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped_rows, 1);
        assert!(table.defaulted_columns.is_empty());

        assert_eq!(table.records[0].date_hour.as_str(), "2024-06-01 08");
        assert_eq!(table.records[0].temp, Some(21.5));
        assert_eq!(table.records[0].windspeed, Some(14.4));
        assert_eq!(table.records[0].preciptype.as_deref(), Some("rain"));

        assert_eq!(table.records[1].temp, None);
        assert_eq!(table.records[1].windspeed, None);
        assert_eq!(table.records[1].preciptype, None);
        Ok(())
    }

    #[test]
    fn test_missing_columns_use_defaults() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "datetime,humidity")?;
        writeln!(file, "2024-06-01 08:00:00,80")?;

        let table = WeatherReader::default().read_weather(file.path())?;
        assert_eq!(table.defaulted_columns, vec!["temp", "windspeed", "preciptype"]);
        assert_eq!(table.records[0].temp, Some(25.0));
        assert_eq!(table.records[0].windspeed, Some(5.0));
        assert_eq!(table.records[0].preciptype.as_deref(), Some("no precipitation"));
        Ok(())
    }
}
