use crate::error::{ProcessingError, Result};
use crate::models::{MatchStats, Observation, TempBand, UnifiedTable, WindBand};
use serde::Serialize;
use tracing::info;

/// Abort conditions of the merge: no rows, or no temperature anywhere.
pub fn ensure_postconditions(observations: &[Observation]) -> Result<()> {
    if observations.is_empty() {
        return Err(ProcessingError::Integrity(
            "preprocessed table is empty, nothing to analyse".to_string(),
        ));
    }
    if observations.iter().all(|o| o.temp.is_none()) {
        return Err(ProcessingError::Integrity(
            "temperature is missing for every row, nothing to analyse".to_string(),
        ));
    }
    Ok(())
}

/// count / mean / std / min / max of a numeric column, ignoring missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn describe(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        let mut present = Vec::new();
        let mut missing = 0usize;
        for value in values {
            match value {
                Some(v) => present.push(v),
                None => missing += 1,
            }
        }

        let count = present.len();
        if count == 0 {
            return Self {
                missing,
                ..Self::default()
            };
        }

        let mean = present.iter().sum::<f64>() / count as f64;
        // sample standard deviation, undefined for a single value
        let std = (count > 1).then(|| {
            let ss: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });

        Self {
            count,
            missing,
            mean: Some(mean),
            std,
            min: present.iter().copied().reduce(f64::min),
            max: present.iter().copied().reduce(f64::max),
        }
    }

    fn render(&self, name: &str) -> String {
        let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
        format!(
            "  {:<14} count={} missing={} mean={} std={} min={} max={}\n",
            name,
            self.count,
            self.missing,
            fmt(self.mean),
            fmt(self.std),
            fmt(self.min),
            fmt(self.max)
        )
    }
}

/// Diagnostics over the finished unified table.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub match_stats: MatchStats,
    pub unknown_station_rows: usize,
    pub missing_duration_rows: usize,
    pub windspeed: ColumnSummary,
    pub windspeed_ms: ColumnSummary,
    pub temp: ColumnSummary,
    pub wind_band_counts: Vec<(WindBand, usize)>,
    pub unbinned_wind_rows: usize,
    pub temp_band_counts: Vec<(TempBand, usize)>,
    pub unbinned_temp_rows: usize,
    pub temperature_edges: Vec<f64>,
}

impl IntegrityReport {
    pub fn is_fully_matched(&self) -> bool {
        self.match_stats.matched == self.total_records
    }
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Re-verify the post-conditions and collect distribution diagnostics.
    pub fn check_integrity(&self, table: &UnifiedTable) -> Result<IntegrityReport> {
        ensure_postconditions(&table.observations)?;

        let observations = &table.observations;

        let wind_band_counts: Vec<(WindBand, usize)> = WindBand::ALL
            .iter()
            .map(|band| {
                let n = observations.iter().filter(|o| o.wind_bin == Some(*band)).count();
                (*band, n)
            })
            .collect();

        let temp_band_counts: Vec<(TempBand, usize)> = table
            .temperature_bins
            .labels
            .iter()
            .map(|band| {
                let n = observations.iter().filter(|o| o.temp_bin == Some(*band)).count();
                (*band, n)
            })
            .collect();

        let report = IntegrityReport {
            total_records: observations.len(),
            match_stats: table.match_stats,
            unknown_station_rows: table.unknown_station_rows,
            missing_duration_rows: observations
                .iter()
                .filter(|o| o.duration_minutes.is_none())
                .count(),
            windspeed: ColumnSummary::describe(observations.iter().map(|o| o.windspeed)),
            windspeed_ms: ColumnSummary::describe(observations.iter().map(|o| o.windspeed_ms)),
            temp: ColumnSummary::describe(observations.iter().map(|o| o.temp)),
            unbinned_wind_rows: observations.iter().filter(|o| o.wind_bin.is_none()).count(),
            wind_band_counts,
            unbinned_temp_rows: observations.iter().filter(|o| o.temp_bin.is_none()).count(),
            temp_band_counts,
            temperature_edges: table.temperature_bins.edges.clone(),
        };

        info!(
            records = report.total_records,
            match_rate_pct = report.match_stats.percentage(),
            unknown_stations = report.unknown_station_rows,
            "Integrity check passed"
        );

        Ok(report)
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!(
            "Weather Matched: {}/{} ({:.2}%)\n",
            report.match_stats.matched,
            report.match_stats.total,
            report.match_stats.percentage()
        ));
        summary.push_str(&format!(
            "Unknown Station Records: {}\n",
            report.unknown_station_rows
        ));
        summary.push_str(&format!(
            "Unparsable Durations: {}\n",
            report.missing_duration_rows
        ));

        summary.push_str("\nColumn Statistics:\n");
        summary.push_str(&report.windspeed.render("windspeed"));
        summary.push_str(&report.windspeed_ms.render("windspeed_m/s"));
        summary.push_str(&report.temp.render("temp"));

        summary.push_str("\nWind Bands:\n");
        for (band, count) in &report.wind_band_counts {
            summary.push_str(&format!("  {:<14} {}\n", band.as_str(), count));
        }
        summary.push_str(&format!("  {:<14} {}\n", "(unbinned)", report.unbinned_wind_rows));

        let edges: Vec<String> = report
            .temperature_edges
            .iter()
            .map(|e| format!("{:.2}", e))
            .collect();
        summary.push_str(&format!("\nTemperature Bands (edges: {}):\n", edges.join(", ")));
        for (band, count) in &report.temp_band_counts {
            summary.push_str(&format!("  {:<14} {}\n", band.as_str(), count));
        }
        summary.push_str(&format!("  {:<14} {}\n", "(unbinned)", report.unbinned_temp_rows));

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_column() {
        let summary = ColumnSummary::describe(vec![Some(2.0), None, Some(4.0), Some(6.0)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.mean, Some(4.0));
        assert_eq!(summary.std, Some(2.0));
        assert_eq!(summary.min, Some(2.0));
        assert_eq!(summary.max, Some(6.0));
    }

    #[test]
    fn test_describe_single_and_empty() {
        let single = ColumnSummary::describe(vec![Some(3.0)]);
        assert_eq!(single.mean, Some(3.0));
        assert_eq!(single.std, None);

        let empty = ColumnSummary::describe(vec![None, None]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.missing, 2);
        assert_eq!(empty.mean, None);
    }

    #[test]
    fn test_empty_table_fails_postconditions() {
        let result = ensure_postconditions(&[]);
        assert!(matches!(result, Err(ProcessingError::Integrity(_))));
    }
}
