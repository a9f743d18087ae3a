use crate::error::{ProcessingError, Result};
use crate::models::station::normalize_station_id;
use crate::models::{StationRecord, StationTable};
use crate::readers::source::SourceReader;
use crate::readers::trip_reader::required_column;
use crate::utils::constants::{COL_ID, COL_STATION_ID, COL_STATION_NAME};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};
use validator::Validate;

pub struct StationReader {
    source: SourceReader,
}

impl StationReader {
    pub fn new(source: SourceReader) -> Self {
        Self { source }
    }

    /// Read the station registry.
    ///
    /// The id column is `station_id`, or `id` when that is all the file has;
    /// a file with neither is a configuration error.
    pub fn read_stations(&self, path: &Path) -> Result<StationTable> {
        let text = self.source.read_to_string(path)?;
        let mut reader = self.source.csv_reader(&text);

        let headers = reader.headers()?.clone();
        let file = path.display().to_string();

        let position = |name: &str| headers.iter().position(|h| h == name);
        let (id_idx, renamed_id_column) = match (position(COL_STATION_ID), position(COL_ID)) {
            (Some(idx), _) => (idx, false),
            (None, Some(idx)) => {
                info!(file = %file, "Renamed column 'id' to 'station_id'");
                (idx, true)
            }
            (None, None) => {
                return Err(ProcessingError::Config(format!(
                    "{} has neither a '{}' nor an '{}' column",
                    file, COL_STATION_ID, COL_ID
                )))
            }
        };
        let name_idx = required_column(&headers, COL_STATION_NAME, &file)?;

        let mut stations = Vec::new();
        let mut skipped = 0usize;
        for row in reader.records() {
            let row = row?;
            let Some(station_id) = row.get(id_idx).and_then(normalize_station_id) else {
                skipped += 1;
                continue;
            };

            let attributes: BTreeMap<String, String> = headers
                .iter()
                .zip(row.iter())
                .enumerate()
                .filter(|(idx, _)| *idx != id_idx && *idx != name_idx)
                .map(|(_, (key, value))| (key.to_string(), value.trim().to_string()))
                .collect();

            let station = StationRecord {
                station_id,
                station_name: row.get(name_idx).unwrap_or_default().trim().to_string(),
                attributes,
            };
            station.validate()?;
            stations.push(station);
        }

        if skipped > 0 {
            warn!(file = %file, rows = skipped, "Skipped stations without an id");
        }
        info!(file = %file, stations = stations.len(), "Loaded station list");

        Ok(StationTable {
            stations,
            renamed_id_column,
        })
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new(SourceReader::utf8())
    }
}
