use crate::utils::DateHour;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Calendar features derived from a trip start timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFeatures {
    pub hour: u32,
    /// ISO weekday, Monday = 0 .. Sunday = 6.
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub date: NaiveDate,
    pub date_hour: DateHour,
}

/// A cleaned trip: timestamp repaired, station id present, features derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    pub start_station_id: String,
    pub duration_minutes: Option<i64>,
    pub started_at: NaiveDateTime,
    pub time: TimeFeatures,
}

impl TripRecord {
    pub fn new(
        start_station_id: String,
        duration_minutes: Option<i64>,
        started_at: NaiveDateTime,
        time: TimeFeatures,
    ) -> Self {
        Self {
            start_station_id,
            duration_minutes,
            started_at,
            time,
        }
    }
}

/// Trip row as read from disk, before repair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrip {
    pub duration: Option<String>,
    pub start_station_id: Option<String>,
    pub started_at: Option<NaiveDateTime>,
}
