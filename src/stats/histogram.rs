//! Equal-width 1D/2D histograms and nearest-neighbor interpolation.

use super::StatsError;
use crate::utils::{min_max, usize_to_f64};

/// Counts over `bins` equal-width bins; `edges` has `bins + 1` entries.
#[derive(Debug, Clone, Default)]
pub struct Histogram1d {
    pub counts: Vec<f64>,
    pub edges: Vec<f64>,
}

impl Histogram1d {
    /// Midpoint of each bin.
    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        self.edges
            .windows(2)
            .map(|pair| 0.5 * (pair[0] + pair[1]))
            .collect()
    }

    #[must_use]
    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }
}

/// 2D counts indexed as `counts[y_bin][x_bin]`.
#[derive(Debug, Clone, Default)]
pub struct Histogram2d {
    pub counts: Vec<Vec<f64>>,
    pub x_edges: Vec<f64>,
    pub y_edges: Vec<f64>,
}

impl Histogram2d {
    #[must_use]
    pub fn max_count(&self) -> f64 {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .fold(0.0, f64::max)
    }
}

/// Equal-width bin edges over the value range. A degenerate range widens to
/// `value ± 0.5` so constant samples still bin cleanly.
fn bin_edges(values: &[f64], bins: usize) -> Option<Vec<f64>> {
    let (mut lo, mut hi) = min_max(values)?;
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / usize_to_f64(bins);
    Some(
        (0..=bins)
            .map(|index| lo + width * usize_to_f64(index))
            .collect(),
    )
}

fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    let bins = edges.len() - 1;
    let lo = edges[0];
    let hi = edges[bins];
    if !value.is_finite() || value < lo || value > hi {
        return None;
    }
    let fraction = (value - lo) / (hi - lo);
    let index = (fraction * usize_to_f64(bins)).floor();
    // The right edge of the last bin is inclusive.
    Some(crate::utils::f64_to_usize(index).min(bins - 1))
}

/// Histogram `values` into `bins` equal-width bins spanning their range.
///
/// # Errors
///
/// Returns `StatsError` when `bins` is zero or `values` has no finite
/// entries.
pub fn histogram_1d(values: &[f64], bins: usize) -> Result<Histogram1d, StatsError> {
    if bins == 0 {
        return Err(StatsError::InvalidBinCount);
    }
    let edges = bin_edges(values, bins).ok_or(StatsError::EmptyInput)?;
    let mut counts = vec![0.0; bins];
    for &value in values {
        if let Some(index) = bin_index(value, &edges) {
            counts[index] += 1.0;
        }
    }
    Ok(Histogram1d { counts, edges })
}

/// Histogram paired samples into a `bins x bins` grid spanning both ranges.
///
/// # Errors
///
/// Returns `StatsError` when `bins` is zero, the arrays differ in length,
/// or either array has no finite entries.
pub fn histogram_2d(xs: &[f64], ys: &[f64], bins: usize) -> Result<Histogram2d, StatsError> {
    if bins == 0 {
        return Err(StatsError::InvalidBinCount);
    }
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    let x_edges = bin_edges(xs, bins).ok_or(StatsError::EmptyInput)?;
    let y_edges = bin_edges(ys, bins).ok_or(StatsError::EmptyInput)?;

    let mut counts = vec![vec![0.0; bins]; bins];
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        if let (Some(xi), Some(yi)) = (bin_index(x, &x_edges), bin_index(y, &y_edges)) {
            counts[yi][xi] += 1.0;
        }
    }
    Ok(Histogram2d {
        counts,
        x_edges,
        y_edges,
    })
}

/// Nearest-neighbor interpolation of `(xs, ys)` at `query`, clamping to the
/// first/last sample outside the range. `xs` must be ascending.
#[must_use]
pub fn nearest_interp(xs: &[f64], ys: &[f64], query: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.is_empty() {
        return f64::NAN;
    }
    match xs.partition_point(|x| *x < query) {
        0 => ys[0],
        split if split >= xs.len() => ys[xs.len() - 1],
        split => {
            let left_gap = query - xs[split - 1];
            let right_gap = xs[split] - query;
            if left_gap <= right_gap {
                ys[split - 1]
            } else {
                ys[split]
            }
        }
    }
}
