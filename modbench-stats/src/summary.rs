//! Summary Statistics
//!
//! Reduces per-iteration durations (nanoseconds) to count, total, mean,
//! extremes, median and standard deviation. An empty input is a valid
//! summary whose location and spread statistics are undefined (`None`).

use crate::percentiles::compute_percentile;
use serde::{Deserialize, Serialize};

/// Aggregate over a sequence of iteration durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of iterations
    pub count: usize,
    /// Sum of all durations
    pub total_ns: f64,
    /// Arithmetic mean
    pub mean_ns: Option<f64>,
    /// Fastest iteration
    pub min_ns: Option<f64>,
    /// Slowest iteration
    pub max_ns: Option<f64>,
    /// Median iteration
    pub median_ns: Option<f64>,
    /// Sample standard deviation (needs at least two iterations)
    pub std_dev_ns: Option<f64>,
}

impl Summary {
    /// Summary of zero iterations
    pub fn empty() -> Self {
        Self {
            count: 0,
            total_ns: 0.0,
            mean_ns: None,
            min_ns: None,
            max_ns: None,
            median_ns: None,
            std_dev_ns: None,
        }
    }

    /// Whether the summary covers no iterations
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Coefficient of variation in percent
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        match (self.std_dev_ns, self.mean_ns) {
            (Some(sd), Some(mean)) if mean > 0.0 => Some(sd / mean * 100.0),
            _ => None,
        }
    }
}

/// Summarize iteration durations given in nanoseconds
pub fn summarize(samples: &[f64]) -> Summary {
    if samples.is_empty() {
        return Summary::empty();
    }

    let count = samples.len();
    let total_ns: f64 = samples.iter().sum();
    let mean = total_ns / count as f64;

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let std_dev = (count >= 2).then(|| {
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    });

    Summary {
        count,
        total_ns,
        mean_ns: Some(mean),
        min_ns: Some(min),
        max_ns: Some(max),
        median_ns: compute_percentile(samples, 50.0),
        std_dev_ns: std_dev,
    }
}

/// Cycle-counter statistics (computed alongside time stats)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CyclesSummary {
    /// Mean cycles per iteration
    pub mean_cycles: f64,
    /// Fewest cycles observed
    pub min_cycles: u64,
    /// Most cycles observed
    pub max_cycles: u64,
    /// Cycles per nanosecond (approximates CPU frequency in GHz)
    pub cycles_per_ns: f64,
}

/// Summarize cycle counts; `nanos` is the parallel array of durations.
///
/// Returns `None` when no iteration recorded any cycles.
pub fn summarize_cycles(cycles: &[u64], nanos: &[f64]) -> Option<CyclesSummary> {
    if cycles.iter().all(|&c| c == 0) {
        return None;
    }

    let total_cycles: f64 = cycles.iter().map(|&c| c as f64).sum();
    let total_nanos: f64 = nanos.iter().sum();

    Some(CyclesSummary {
        mean_cycles: total_cycles / cycles.len() as f64,
        min_cycles: cycles.iter().copied().min().unwrap_or(0),
        max_cycles: cycles.iter().copied().max().unwrap_or(0),
        cycles_per_ns: if total_nanos > 0.0 {
            total_cycles / total_nanos
        } else {
            0.0
        },
    })
}
