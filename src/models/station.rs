use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationRecord {
    #[validate(length(min = 1))]
    pub station_id: String,

    pub station_name: String,

    /// Remaining columns of the station file, kept verbatim.
    pub attributes: BTreeMap<String, String>,
}

impl StationRecord {
    pub fn new(station_id: String, station_name: String) -> Self {
        Self {
            station_id,
            station_name,
            attributes: BTreeMap::new(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.station_name.trim().is_empty()
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }
}

/// Station registry as loaded, passed unmodified to downstream consumers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationTable {
    pub stations: Vec<StationRecord>,
    /// Set when the file carried `id` instead of `station_id`.
    pub renamed_id_column: bool,
}

impl StationTable {
    pub fn new(stations: Vec<StationRecord>) -> Self {
        Self {
            stations,
            renamed_id_column: false,
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station id to name; the first row wins for duplicated ids.
    ///
    /// Stations with a blank name are left out, so their trips resolve to
    /// the unknown-station sentinel like any other miss.
    pub fn name_lookup(&self) -> HashMap<&str, &str> {
        let mut lookup = HashMap::with_capacity(self.stations.len());
        for station in self.stations.iter().filter(|s| s.has_name()) {
            lookup
                .entry(station.station_id.as_str())
                .or_insert(station.station_name.as_str());
        }
        lookup
    }

    /// Rows whose id already appeared earlier in the table.
    pub fn duplicate_ids(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.stations.len());
        self.stations
            .iter()
            .filter(|s| !seen.insert(s.station_id.as_str()))
            .count()
    }
}

/// Canonical form of a station id cell.
///
/// Blank cells are missing. Integral ids that went through a float column
/// (`"123.0"`) are reduced to `"123"` so trip and station files join.
pub fn normalize_station_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return None;
    }

    if let Some(integral) = trimmed.strip_suffix(".0") {
        if !integral.is_empty() && integral.chars().all(|c| c.is_ascii_digit()) {
            return Some(integral.to_string());
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validation() {
        let station = StationRecord::new("HB101".to_string(), "Hoboken Terminal".to_string())
            .with_attribute("lat", "40.7359");
        assert!(station.validate().is_ok());
        assert_eq!(station.attributes["lat"], "40.7359");

        let station = StationRecord::new(String::new(), "Nowhere".to_string());
        assert!(station.validate().is_err());
    }

    #[test]
    fn test_name_lookup_keeps_first_duplicate() {
        let table = StationTable::new(vec![
            StationRecord::new("1".to_string(), "First".to_string()),
            StationRecord::new("2".to_string(), "Second".to_string()),
            StationRecord::new("1".to_string(), "Shadow".to_string()),
        ]);

        let lookup = table.name_lookup();
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup["1"], "First");
        assert_eq!(lookup["2"], "Second");
    }

    #[test]
    fn test_blank_names_are_not_looked_up() {
        let table = StationTable::new(vec![
            StationRecord::new("A".to_string(), String::new()),
            StationRecord::new("B".to_string(), "  ".to_string()),
            StationRecord::new("C".to_string(), "Cedar".to_string()),
        ]);

        let lookup = table.name_lookup();
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.get("A"), None);
        assert_eq!(lookup["C"], "Cedar");
        assert_eq!(table.duplicate_ids(), 0);
    }

    #[test]
    fn test_duplicate_ids_counted() {
        let table = StationTable::new(vec![
            StationRecord::new("1".to_string(), "First".to_string()),
            StationRecord::new("1".to_string(), "Shadow".to_string()),
            StationRecord::new("1".to_string(), String::new()),
        ]);
        assert_eq!(table.duplicate_ids(), 2);
    }

    #[test]
    fn test_normalize_station_id() {
        assert_eq!(normalize_station_id(" 123 "), Some("123".to_string()));
        assert_eq!(normalize_station_id("123.0"), Some("123".to_string()));
        assert_eq!(normalize_station_id("5329.03"), Some("5329.03".to_string()));
        assert_eq!(normalize_station_id("HB101"), Some("HB101".to_string()));
        assert_eq!(normalize_station_id(""), None);
        assert_eq!(normalize_station_id("NaN"), None);
    }
}
