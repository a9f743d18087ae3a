use crate::error::{ProcessingError, Result};
use crate::models::{RawTrip, TripRecord};
use crate::processors::duration::parse_duration;
use crate::processors::time_features::{extract_time_features, fill_missing_timestamps};
use serde::Serialize;
use tracing::{info, warn};

/// Counts of what cleaning had to repair or discard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CleaningStats {
    pub input_rows: usize,
    pub filled_timestamps: usize,
    pub dropped_missing_station: usize,
    pub unparsable_durations: usize,
}

/// Repair timestamps, drop trips without a start station and derive the
/// duration and calendar features.
pub fn clean_trips(raw: Vec<RawTrip>) -> Result<(Vec<TripRecord>, CleaningStats)> {
    let mut stats = CleaningStats {
        input_rows: raw.len(),
        ..CleaningStats::default()
    };
    if raw.is_empty() {
        return Ok((Vec::new(), stats));
    }

    let column: Vec<_> = raw.iter().map(|t| t.started_at).collect();
    let filled = fill_missing_timestamps(&column);
    let timestamps = filled.values.ok_or_else(|| {
        ProcessingError::Integrity("trip file has no usable started_at value".to_string())
    })?;
    stats.filled_timestamps = filled.filled;
    if filled.filled > 0 {
        info!(rows = filled.filled, "Filled missing trip start times from neighbouring rows");
    }

    let kept: Vec<(RawTrip, _)> = raw
        .into_iter()
        .zip(timestamps)
        .filter(|(trip, _)| trip.start_station_id.is_some())
        .collect();
    stats.dropped_missing_station = stats.input_rows - kept.len();
    if stats.dropped_missing_station > 0 {
        warn!(
            rows = stats.dropped_missing_station,
            "Dropped trips without a start station"
        );
    }

    let trips: Vec<TripRecord> = kept
        .into_iter()
        .filter_map(|(trip, started_at)| {
            let station = trip.start_station_id?;
            Some(TripRecord::new(
                station,
                parse_duration(trip.duration.as_deref()),
                started_at,
                extract_time_features(&started_at),
            ))
        })
        .collect();

    stats.unparsable_durations = trips.iter().filter(|t| t.duration_minutes.is_none()).count();
    if stats.unparsable_durations > 0 {
        warn!(rows = stats.unparsable_durations, "Trip durations could not be parsed");
    }

    Ok((trips, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_timestamp;

    fn raw(duration: Option<&str>, station: Option<&str>, started_at: Option<&str>) -> RawTrip {
        RawTrip {
            duration: duration.map(str::to_string),
            start_station_id: station.map(str::to_string),
            started_at: started_at.and_then(parse_timestamp),
        }
    }

    #[test]
    fn test_clean_trips_repairs_and_drops() {
        let input = vec![
            raw(Some("00:10:00"), Some("A"), None),
            raw(Some("0 days 00:05:30"), Some("B"), Some("2024-06-03 07:20:00")),
            raw(Some("00:02:00"), None, Some("2024-06-03 07:40:00")),
            raw(Some("garbage"), Some("C"), None),
        ];

        let (trips, stats) = clean_trips(input).unwrap();

        assert_eq!(trips.len(), 3);
        assert_eq!(stats.filled_timestamps, 2);
        assert_eq!(stats.dropped_missing_station, 1);
        assert_eq!(stats.unparsable_durations, 1);

        // leading gap takes the next value, trailing gap the previous one
        assert_eq!(trips[0].started_at, parse_timestamp("2024-06-03 07:20:00").unwrap());
        assert_eq!(trips[2].started_at, parse_timestamp("2024-06-03 07:40:00").unwrap());
        assert_eq!(trips[0].duration_minutes, Some(10));
        assert_eq!(trips[1].duration_minutes, Some(5));
        assert_eq!(trips[2].duration_minutes, None);
        assert_eq!(trips[1].time.hour, 7);
        assert_eq!(trips[1].time.day_of_week, 0);
    }

    #[test]
    fn test_all_timestamps_missing_is_integrity_error() {
        let input = vec![raw(None, Some("A"), None), raw(None, Some("B"), None)];
        assert!(matches!(clean_trips(input), Err(ProcessingError::Integrity(_))));
    }

    #[test]
    fn test_clean_trips_preserves_input_order() {
        let input = vec![
            raw(Some("00:01:00"), Some("C"), Some("2024-06-03 09:00:00")),
            raw(Some("00:02:00"), None, Some("2024-06-03 07:00:00")),
            raw(Some("00:03:00"), Some("A"), Some("2024-06-03 08:00:00")),
            raw(Some("00:04:00"), Some("B"), Some("2024-06-03 06:00:00")),
        ];

        let (trips, _) = clean_trips(input).unwrap();
        let order: Vec<(&str, Option<i64>)> = trips
            .iter()
            .map(|t| (t.start_station_id.as_str(), t.duration_minutes))
            .collect();
        assert_eq!(order, vec![("C", Some(1)), ("A", Some(3)), ("B", Some(4))]);
    }

    #[test]
    fn test_empty_input() {
        let (trips, stats) = clean_trips(Vec::new()).unwrap();
        assert!(trips.is_empty());
        assert_eq!(stats.input_rows, 0);
    }
}
