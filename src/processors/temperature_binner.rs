use crate::config::TemperatureConfig;
use crate::error::{ProcessingError, Result};
use crate::models::TempBand;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Fitted temperature bins: `edges.len() - 1` half-open intervals
/// `[edges[i], edges[i + 1])`, labelled in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBins {
    pub edges: Vec<f64>,
    pub labels: Vec<TempBand>,
}

impl TemperatureBins {
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Label for a temperature; `None` below the first edge, at or above the
    /// last edge, or when the interval has no label.
    pub fn assign(&self, temp: f64) -> Option<TempBand> {
        if temp.is_nan() {
            return None;
        }
        self.edges
            .windows(2)
            .position(|edge| edge[0] <= temp && temp < edge[1])
            .and_then(|idx| self.labels.get(idx).copied())
    }

    pub fn span(&self) -> Option<(f64, f64)> {
        Some((*self.edges.first()?, *self.edges.last()?))
    }
}

/// Computes dynamic temperature bin edges from the observed range.
pub struct TemperatureBinner {
    min_span: f64,
    bin_width: f64,
    min_edges: usize,
    fallback_padding: f64,
    fallback_bins: usize,
    max_bins: usize,
}

impl TemperatureBinner {
    pub fn new(config: &TemperatureConfig) -> Self {
        Self {
            min_span: config.min_span,
            bin_width: config.bin_width,
            min_edges: config.min_edges,
            fallback_padding: config.fallback_padding,
            fallback_bins: config.fallback_bins,
            max_bins: config.label_count(),
        }
    }

    /// Fit edges over every non-missing temperature of the table.
    pub fn fit(&self, temps: &[Option<f64>]) -> Result<TemperatureBins> {
        let mut observed = temps.iter().flatten().copied().filter(|t| t.is_finite());
        let first = observed.next().ok_or_else(|| {
            ProcessingError::Integrity("cannot bin temperatures: no values present".to_string())
        })?;
        let (mut min, mut max) = observed.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));

        let mut span = max - min;
        if span < self.min_span {
            let buffer = (self.min_span - span) / 2.0;
            min -= buffer;
            max += buffer;
            span = self.min_span;
            debug!(min, max, "Padded narrow temperature range");
        }

        // More intervals than labels cannot be labelled; cap at the label count.
        let bins = ((span / self.bin_width).floor() as usize + 1).min(self.max_bins);
        let mut edges = linspace(min, max, bins + 1);

        if edges.len() < self.min_edges {
            edges = linspace(
                min - self.fallback_padding,
                max + self.fallback_padding,
                self.fallback_bins + 1,
            );
        }

        let label_count = edges.len().saturating_sub(1).min(TempBand::ALL.len());
        let labels = TempBand::ALL[..label_count].to_vec();

        info!(
            edges = ?edges,
            bins = labels.len(),
            "Temperature bins fitted"
        );

        Ok(TemperatureBins { edges, labels })
    }
}

impl Default for TemperatureBinner {
    fn default() -> Self {
        Self::new(&TemperatureConfig::default())
    }
}

/// `count` evenly spaced points from `start` to `stop`, both included.
fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut points: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            points[count - 1] = stop;
            points
        }
    }
}
