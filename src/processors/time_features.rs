use crate::models::TimeFeatures;
use crate::utils::DateHour;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Derive hour, ISO weekday, weekend flag, date and the hour join key.
pub fn extract_time_features(started_at: &NaiveDateTime) -> TimeFeatures {
    let day_of_week = started_at.weekday().num_days_from_monday();
    TimeFeatures {
        hour: started_at.hour(),
        day_of_week,
        is_weekend: day_of_week >= 5,
        date: started_at.date(),
        date_hour: DateHour::from_datetime(started_at),
    }
}

/// Outcome of repairing a timestamp column.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledTimestamps {
    /// `None` only when the column had no value at all.
    pub values: Option<Vec<NaiveDateTime>>,
    pub filled: usize,
}

/// Fill gaps with the previous value, then leading gaps with the next value.
pub fn fill_missing_timestamps(column: &[Option<NaiveDateTime>]) -> FilledTimestamps {
    let missing = column.iter().filter(|v| v.is_none()).count();

    let mut forward: Vec<Option<NaiveDateTime>> = Vec::with_capacity(column.len());
    let mut last = None;
    for value in column {
        if value.is_some() {
            last = *value;
        }
        forward.push(last);
    }

    let mut next = None;
    for value in forward.iter_mut().rev() {
        if value.is_some() {
            next = *value;
        } else {
            *value = next;
        }
    }

    let values: Option<Vec<NaiveDateTime>> = forward.into_iter().collect();
    FilledTimestamps {
        values,
        filled: missing,
    }
}
