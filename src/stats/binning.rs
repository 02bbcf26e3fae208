//! Fixed-size binning with inverse-variance uncertainty propagation.

use super::StatsError;
use crate::utils::usize_to_f64;

/// Binned data, propagated uncertainty, and binned independent variable.
#[derive(Debug, Clone, Default)]
pub struct BinnedSeries {
    pub data: Vec<f64>,
    pub uncertainty: Vec<f64>,
    pub independent: Vec<f64>,
}

impl BinnedSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Display bin size implied by a dataset length and a requested bin count.
///
/// Matches `(n - 1) / nbins + 1`, so `ceil(n / bin_size) <= nbins` always
/// holds.
#[must_use]
pub const fn bin_size_for(n: usize, nbins: usize) -> usize {
    if n == 0 || nbins == 0 {
        1
    } else {
        (n - 1) / nbins + 1
    }
}

/// Aggregate data, uncertainties, and the independent variable into bins of
/// `bin_size` consecutive points.
///
/// Each binned datum is the inverse-variance-weighted mean of its chunk,
/// its uncertainty is `sqrt(1 / sum(1/sigma^2))`, and the binned
/// independent variable is the plain chunk mean. The final bin may be
/// shorter when `bin_size` does not divide the length.
///
/// # Errors
///
/// Returns `StatsError` on empty input, mismatched lengths, a zero bin
/// size, or a non-positive/non-finite uncertainty.
pub fn bin_array(
    data: &[f64],
    uncertainty: &[f64],
    independent: &[f64],
    bin_size: usize,
) -> Result<BinnedSeries, StatsError> {
    if data.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if uncertainty.len() != data.len() {
        return Err(StatsError::LengthMismatch {
            left: data.len(),
            right: uncertainty.len(),
        });
    }
    if independent.len() != data.len() {
        return Err(StatsError::LengthMismatch {
            left: data.len(),
            right: independent.len(),
        });
    }
    if bin_size == 0 {
        return Err(StatsError::InvalidBinSize);
    }
    if let Some(index) = uncertainty
        .iter()
        .position(|sigma| !(sigma.is_finite() && *sigma > 0.0))
    {
        return Err(StatsError::InvalidUncertainty { index });
    }

    let nbins = data.len().div_ceil(bin_size);
    let mut binned = BinnedSeries {
        data: Vec::with_capacity(nbins),
        uncertainty: Vec::with_capacity(nbins),
        independent: Vec::with_capacity(nbins),
    };

    for chunk_start in (0..data.len()).step_by(bin_size) {
        let chunk_end = (chunk_start + bin_size).min(data.len());
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        let mut indep_sum = 0.0;
        for index in chunk_start..chunk_end {
            let weight = 1.0 / (uncertainty[index] * uncertainty[index]);
            weighted_sum += data[index] * weight;
            weight_sum += weight;
            indep_sum += independent[index];
        }
        binned.data.push(weighted_sum / weight_sum);
        binned.uncertainty.push((1.0 / weight_sum).sqrt());
        binned
            .independent
            .push(indep_sum / usize_to_f64(chunk_end - chunk_start));
    }

    Ok(binned)
}

/// Aggregate a model curve into bins of `bin_size` consecutive points by
/// plain averaging.
///
/// # Errors
///
/// Returns `StatsError` on empty input or a zero bin size.
pub fn weighted_bin(model: &[f64], bin_size: usize) -> Result<Vec<f64>, StatsError> {
    if model.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if bin_size == 0 {
        return Err(StatsError::InvalidBinSize);
    }

    let mut binned = Vec::with_capacity(model.len().div_ceil(bin_size));
    for chunk in model.chunks(bin_size) {
        let sum: f64 = chunk.iter().sum();
        binned.push(sum / usize_to_f64(chunk.len()));
    }
    Ok(binned)
}
