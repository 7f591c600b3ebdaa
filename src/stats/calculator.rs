//! Statistics Calculator Module
//! Handles percentile, mean and box-plot summary computations.

use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Whisker reach, in multiples of the interquartile range.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Value bounds at a lower and an upper quantile of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantileBounds {
    pub lower: f64,
    pub upper: f64,
}

impl QuantileBounds {
    /// Inclusive on both ends.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Box-and-whisker summary for one group of values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// A labelled group of values, the input of a box plot category.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup {
    pub label: String,
    pub values: Vec<f64>,
}

impl ValueGroup {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Sort a copy of the values ascending, NaNs treated as equal.
    pub fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    ///
    /// `p` is in percent (0..=100) and `sorted_values` must be sorted ascending.
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        // exact when both neighbours are equal
        sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac
    }

    /// Same as [`percentile`](Self::percentile) with `q` as a fraction (0..=1).
    pub fn quantile(sorted_values: &[f64], q: f64) -> f64 {
        Self::percentile(sorted_values, q * 100.0)
    }

    /// Bounds at the `lower` and `upper` quantile fractions of unsorted values.
    /// Returns `None` for an empty input.
    pub fn quantile_bounds(values: &[f64], lower: f64, upper: f64) -> Option<QuantileBounds> {
        if values.is_empty() {
            return None;
        }
        let sorted = Self::sorted(values);
        Some(QuantileBounds {
            lower: Self::quantile(&sorted, lower),
            upper: Self::quantile(&sorted, upper),
        })
    }

    /// Arithmetic mean, `None` for an empty input.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().mean())
        }
    }

    /// Box-plot summary: quartiles by linear interpolation, whiskers at the
    /// most extreme points within 1.5×IQR of the box, the rest are outliers.
    pub fn compute_box_stats(values: &[f64]) -> Option<BoxStats> {
        let sorted: Vec<f64> = Self::sorted(values)
            .into_iter()
            .filter(|v| v.is_finite())
            .collect();
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR_FACTOR * iqr;
        let high_fence = q3 + WHISKER_IQR_FACTOR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(BoxStats {
            count: sorted.len(),
            min,
            q1,
            median,
            q3,
            max,
            mean: sorted.iter().mean(),
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Compute box statistics for every group in parallel, keeping group order.
    pub fn compute_group_box_stats_parallel(groups: &[ValueGroup]) -> Vec<Option<BoxStats>> {
        groups
            .par_iter()
            .map(|group| Self::compute_box_stats(&group.values))
            .collect()
    }
}
