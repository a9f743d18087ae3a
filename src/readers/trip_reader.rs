use crate::error::{ProcessingError, Result};
use crate::models::station::normalize_station_id;
use crate::models::RawTrip;
use crate::readers::source::SourceReader;
use crate::utils::constants::{COL_DURATION, COL_STARTED_AT, COL_START_STATION_ID};
use crate::utils::parse_timestamp;
use csv::StringRecord;
use std::path::Path;
use tracing::info;

pub struct TripReader {
    source: SourceReader,
}

impl TripReader {
    pub fn new(source: SourceReader) -> Self {
        Self { source }
    }

    /// Read the trip log without repairing anything.
    pub fn read_trips(&self, path: &Path) -> Result<Vec<RawTrip>> {
        let text = self.source.read_to_string(path)?;
        let mut reader = self.source.csv_reader(&text);

        let headers = reader.headers()?.clone();
        let file = path.display().to_string();
        let duration_idx = required_column(&headers, COL_DURATION, &file)?;
        let station_idx = required_column(&headers, COL_START_STATION_ID, &file)?;
        let started_idx = required_column(&headers, COL_STARTED_AT, &file)?;

        let mut trips = Vec::new();
        for row in reader.records() {
            let row = row?;
            trips.push(RawTrip {
                duration: row
                    .get(duration_idx)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string),
                start_station_id: row.get(station_idx).and_then(normalize_station_id),
                started_at: row.get(started_idx).and_then(parse_timestamp),
            });
        }

        info!(file = %file, records = trips.len(), "Loaded trip records");
        Ok(trips)
    }
}

impl Default for TripReader {
    fn default() -> Self {
        Self::new(SourceReader::utf8())
    }
}

pub(crate) fn required_column(headers: &StringRecord, name: &str, file: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ProcessingError::MissingColumn {
            file: file.to_string(),
            column: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_trip_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "ride_id,duration,start_station_id,started_at")?;
        writeln!(file, "r1,0 days 00:12:30,101,2024-06-01 08:15:00")?;
        writeln!(file, "r2,,102.0,")?;
        writeln!(file, "r3,00:03:00,,2024-06-01 09:00:00")?;

        let trips = TripReader::default().read_trips(file.path())?;
        assert_eq!(trips.len(), 3);

        assert_eq!(trips[0].duration.as_deref(), Some("0 days 00:12:30"));
        assert_eq!(trips[0].start_station_id.as_deref(), Some("101"));
        assert!(trips[0].started_at.is_some());

        assert_eq!(trips[1].duration, None);
        assert_eq!(trips[1].start_station_id.as_deref(), Some("102"));
        assert_eq!(trips[1].started_at, None);

        assert_eq!(trips[2].start_station_id, None);
        Ok(())
    }

    #[test]
    fn test_missing_started_at_column() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "duration,start_station_id")?;
        writeln!(file, "00:10:00,1")?;

        let result = TripReader::default().read_trips(file.path());
        match result {
            Err(ProcessingError::MissingColumn { column, .. }) => assert_eq!(column, "started_at"),
            other => panic!("unexpected result: {:?}", other.map(|t| t.len())),
        }
        Ok(())
    }
}
