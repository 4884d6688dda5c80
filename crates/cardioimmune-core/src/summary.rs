//! Five-number summaries for box plots.

use serde::Serialize;
use statrs::statistics::{Data, OrderStatistics};

/// Box-plot statistics for one group of values.
///
/// Quartiles use the order-statistic estimator from `statrs`. Whiskers stop at
/// the most extreme observations still within 1.5 IQR of the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub n: usize,
    pub mean: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: usize,
}

impl BoxSummary {
    /// Summarize `values`. Returns `None` for an empty group or when any value
    /// is not finite.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut data = Data::new(values.to_vec());
        let q1 = data.lower_quartile();
        let median = data.quantile(0.5);
        let q3 = data.upper_quartile();

        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;
        let inside = values.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min).min(q1);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max).max(q3);
        let outliers = values
            .iter()
            .filter(|v| **v < lo_fence || **v > hi_fence)
            .count();

        Some(Self {
            n,
            mean,
            min,
            q1,
            median,
            q3,
            max,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
