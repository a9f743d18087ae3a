//! Cascading mean imputation.
//!
//! A [`FallbackChain`] is an ordered list of grouping strategies. Each step
//! computes the mean of the currently known values per group and fills the
//! gaps whose group has at least one known value; later steps see the values
//! filled by earlier ones.

use crate::models::Observation;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Same start station across the whole table.
    Station,
    /// Same hour of day and precipitation type.
    HourPreciptype,
    /// Same calendar date and hour.
    DateHour,
    /// Every row.
    Global,
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupBy::Station => "station",
            GroupBy::HourPreciptype => "hour_preciptype",
            GroupBy::DateHour => "date_hour",
            GroupBy::Global => "global",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey<'a> {
    Station(&'a str),
    HourPreciptype(u32, &'a str),
    DateHour(NaiveDate, u32),
    Global,
}

/// Rows that can be partitioned by the imputation strategies.
pub trait Groupable {
    fn group_key(&self, by: GroupBy) -> GroupKey<'_>;
}

impl Groupable for Observation {
    fn group_key(&self, by: GroupBy) -> GroupKey<'_> {
        match by {
            GroupBy::Station => GroupKey::Station(&self.start_station_id),
            GroupBy::HourPreciptype => GroupKey::HourPreciptype(self.time.hour, &self.preciptype),
            GroupBy::DateHour => GroupKey::DateHour(self.time.date, self.time.hour),
            GroupBy::Global => GroupKey::Global,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub missing_before: usize,
    pub filled_by_step: Vec<(GroupBy, usize)>,
    pub remaining: usize,
}

impl FillReport {
    pub fn total_filled(&self) -> usize {
        self.filled_by_step.iter().map(|(_, n)| n).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackChain {
    strategies: Vec<GroupBy>,
}

impl FallbackChain {
    pub fn new(strategies: Vec<GroupBy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[GroupBy] {
        &self.strategies
    }

    /// Apply the strategies left to right until no gaps remain.
    ///
    /// `values[i]` belongs to `rows[i]`.
    pub fn fill<R: Groupable>(&self, rows: &[R], values: &mut [Option<f64>]) -> FillReport {
        debug_assert_eq!(rows.len(), values.len());

        let missing_before = count_missing(values);
        let mut report = FillReport {
            missing_before,
            filled_by_step: Vec::with_capacity(self.strategies.len()),
            remaining: missing_before,
        };

        for &strategy in &self.strategies {
            if report.remaining == 0 {
                break;
            }
            let filled = fill_group_means(strategy, rows, values);
            report.filled_by_step.push((strategy, filled));
            report.remaining -= filled;
        }

        report
    }
}

/// Fill gaps with the mean of their group; returns how many were filled.
pub fn fill_group_means<R: Groupable>(by: GroupBy, rows: &[R], values: &mut [Option<f64>]) -> usize {
    let mut sums: HashMap<GroupKey<'_>, (f64, usize)> = HashMap::new();
    for (row, value) in rows.iter().zip(values.iter()) {
        if let Some(v) = value {
            let entry = sums.entry(row.group_key(by)).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }

    let mut filled = 0;
    for (row, value) in rows.iter().zip(values.iter_mut()) {
        if value.is_none() {
            if let Some((sum, count)) = sums.get(&row.group_key(by)) {
                *value = Some(sum / *count as f64);
                filled += 1;
            }
        }
    }
    filled
}

fn count_missing(values: &[Option<f64>]) -> usize {
    values.iter().filter(|v| v.is_none()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        station: &'static str,
        hour: u32,
        precip: &'static str,
        date: NaiveDate,
    }

    impl Groupable for Row {
        fn group_key(&self, by: GroupBy) -> GroupKey<'_> {
            match by {
                GroupBy::Station => GroupKey::Station(self.station),
                GroupBy::HourPreciptype => GroupKey::HourPreciptype(self.hour, self.precip),
                GroupBy::DateHour => GroupKey::DateHour(self.date, self.hour),
                GroupBy::Global => GroupKey::Global,
            }
        }
    }

    fn row(station: &'static str, hour: u32, precip: &'static str) -> Row {
        Row {
            station,
            hour,
            precip,
            date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        }
    }

    #[test]
    fn test_station_mean_fills_first() {
        let rows = vec![row("A", 8, "rain"), row("A", 9, "rain"), row("B", 8, "rain")];
        let mut values = vec![Some(10.0), None, Some(30.0)];

        let filled = fill_group_means(GroupBy::Station, &rows, &mut values);
        assert_eq!(filled, 1);
        assert_eq!(values, vec![Some(10.0), Some(10.0), Some(30.0)]);
    }

    #[test]
    fn test_group_without_known_values_stays_missing() {
        let rows = vec![row("A", 8, "rain"), row("B", 8, "rain")];
        let mut values = vec![Some(10.0), None];

        assert_eq!(fill_group_means(GroupBy::Station, &rows, &mut values), 0);
        assert_eq!(values[1], None);
    }

    #[test]
    fn test_chain_falls_through_to_global() {
        let rows = vec![
            row("A", 8, "rain"),
            row("B", 8, "rain"),
            row("C", 17, "snow"),
            row("A", 9, "rain"),
        ];
        let mut values = vec![Some(12.0), None, None, Some(6.0)];

        let chain = FallbackChain::new(vec![GroupBy::Station, GroupBy::HourPreciptype, GroupBy::Global]);
        let report = chain.fill(&rows, &mut values);

        // B has no station peers, but shares (8, rain) with A's first row
        assert_eq!(values[1], Some(12.0));
        // C shares nothing; the global mean includes B's filled value
        assert_eq!(values[2], Some((12.0 + 12.0 + 6.0) / 3.0));
        assert_eq!(report.missing_before, 2);
        assert_eq!(
            report.filled_by_step,
            vec![
                (GroupBy::Station, 0),
                (GroupBy::HourPreciptype, 1),
                (GroupBy::Global, 1)
            ]
        );
        assert_eq!(report.remaining, 0);
        assert_eq!(report.total_filled(), 2);
    }

    #[test]
    fn test_chain_stops_once_complete() {
        let rows = vec![row("A", 8, "rain"), row("A", 9, "rain")];
        let mut values = vec![Some(4.0), None];

        let chain = FallbackChain::new(vec![GroupBy::Station, GroupBy::Global]);
        let report = chain.fill(&rows, &mut values);
        assert_eq!(report.filled_by_step, vec![(GroupBy::Station, 1)]);
        assert_eq!(values[1], Some(4.0));
    }

    #[test]
    fn test_all_missing_column_remains_missing() {
        let rows = vec![row("A", 8, "rain"), row("B", 9, "rain")];
        let mut values = vec![None, None];

        let report = FallbackChain::new(vec![GroupBy::Global]).fill(&rows, &mut values);
        assert_eq!(report.remaining, 2);
        assert_eq!(values, vec![None, None]);
    }

    #[test]
    fn test_group_by_deserializes_snake_case() {
        let parsed: Vec<GroupBy> =
            serde_json::from_str(r#"["station", "hour_preciptype", "date_hour", "global"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                GroupBy::Station,
                GroupBy::HourPreciptype,
                GroupBy::DateHour,
                GroupBy::Global
            ]
        );
    }
}
