//! # Utilities
//!
//! Shared numeric helpers for thinning sample sequences and deriving
//! drawable axis ranges.

use num_traits::ToPrimitive;

/// Keep every `stride`-th value, starting from the first.
///
/// # Panics
///
/// Panics if `stride` is zero; callers validate strides before thinning.
#[must_use]
pub fn thin(values: &[f64], stride: usize) -> Vec<f64> {
    assert!(stride > 0, "thinning stride must be positive");
    values.iter().copied().step_by(stride).collect()
}

/// Length of a sequence after thinning by `stride`.
#[must_use]
pub const fn thinned_len(len: usize, stride: usize) -> usize {
    if stride == 0 {
        0
    } else {
        len.div_ceil(stride)
    }
}

/// Minimum and maximum of a slice, or `None` when it is empty or contains
/// only non-finite values.
#[must_use]
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut bounds: Option<(f64, f64)> = None;
    for &value in values {
        if !value.is_finite() {
            continue;
        }
        bounds = Some(match bounds {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }
    bounds
}

/// Expand `(lo, hi)` by 5% headroom on each side; a degenerate range widens
/// to `(value - 0.5, value + 0.5)`.
#[must_use]
pub fn pad_range(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        let pad = 0.05 * (hi - lo);
        (lo - pad, hi + pad)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Smallest strictly positive finite value, used to floor log-scaled axes.
#[must_use]
pub fn min_positive(values: &[f64]) -> Option<f64> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite() && *value > 0.0)
        .min_by(f64::total_cmp)
}

#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}

#[must_use]
pub fn f64_to_usize(value: f64) -> usize {
    value.to_usize().unwrap_or(0)
}
