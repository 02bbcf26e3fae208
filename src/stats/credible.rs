//! Highest-posterior-density (credible) region location.
//!
//! Given one posterior parameter column and a target probability mass, find
//! the density threshold whose super-level set holds that mass. The density
//! curve is either supplied by the caller or estimated here with a Gaussian
//! kernel density estimate.

use statrs::distribution::{Continuous, Normal};

use super::StatsError;
use crate::utils::usize_to_f64;

/// Number of grid points used by the kernel density estimate.
const KDE_GRID_POINTS: usize = 100;

/// A posterior density curve and the threshold defining its
/// highest-density region.
#[derive(Debug, Clone)]
pub struct CredibleRegion {
    /// Density values on `grid`.
    pub pdf: Vec<f64>,
    /// Coordinates of the density values.
    pub grid: Vec<f64>,
    /// Densities at or above this value belong to the credible region.
    pub density_threshold: f64,
}

impl CredibleRegion {
    /// Grid-point membership of the highest-density region.
    #[must_use]
    pub fn mask(&self) -> Vec<bool> {
        highest_density_mask(&self.pdf, self.density_threshold)
    }
}

/// Locate the `percentile` highest-posterior-density region of a posterior
/// parameter column.
///
/// When `pdf`/`grid` are supplied they are used as-is (both or neither);
/// otherwise a Gaussian KDE of `samples` builds the density curve. The
/// returned threshold is the smallest density among the highest-density
/// grid points whose cumulative density first reaches `percentile` of the
/// total.
///
/// # Errors
///
/// Returns `StatsError` if `percentile` is outside `(0, 1)`, the inputs are
/// empty, or a supplied PDF and grid disagree in length.
pub fn credible_region(
    samples: &[f64],
    percentile: f64,
    pdf: Option<&[f64]>,
    grid: Option<&[f64]>,
) -> Result<CredibleRegion, StatsError> {
    if !(percentile > 0.0 && percentile < 1.0) {
        return Err(StatsError::InvalidPercentile { value: percentile });
    }

    let (pdf, grid) = match (pdf, grid) {
        (Some(pdf), Some(grid)) => {
            if pdf.len() != grid.len() {
                return Err(StatsError::PdfGridMismatch {
                    pdf_len: pdf.len(),
                    grid_len: grid.len(),
                });
            }
            if pdf.is_empty() {
                return Err(StatsError::EmptyInput);
            }
            (pdf.to_vec(), grid.to_vec())
        }
        _ => gaussian_kde(samples, KDE_GRID_POINTS)?,
    };

    let density_threshold = hpd_threshold(&pdf, percentile)?;
    Ok(CredibleRegion {
        pdf,
        grid,
        density_threshold,
    })
}

/// Grid points whose density is at or above `threshold`.
#[must_use]
pub fn highest_density_mask(pdf: &[f64], threshold: f64) -> Vec<bool> {
    pdf.iter().map(|density| *density >= threshold).collect()
}

/// Gaussian kernel density estimate on an evenly spaced grid spanning the
/// sample range, with Scott's bandwidth `sigma * n^(-1/5)`.
fn gaussian_kde(samples: &[f64], grid_points: usize) -> Result<(Vec<f64>, Vec<f64>), StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let n = usize_to_f64(samples.len());
    let mean = samples.iter().sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|value| {
            let centered = value - mean;
            centered * centered
        })
        .sum::<f64>()
        / n;
    let bandwidth = (variance.sqrt() * n.powf(-0.2)).max(f64::EPSILON);

    let lo = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (hi - lo).max(f64::EPSILON);

    let kernel = Normal::new(0.0, 1.0).map_err(|_| StatsError::KernelConstruction)?;
    let points = grid_points.max(2);
    let mut grid = Vec::with_capacity(points);
    let mut pdf = Vec::with_capacity(points);
    for index in 0..points {
        let x = lo + span * usize_to_f64(index) / usize_to_f64(points - 1);
        let density = samples
            .iter()
            .map(|sample| kernel.pdf((x - sample) / bandwidth))
            .sum::<f64>()
            / (n * bandwidth);
        grid.push(x);
        pdf.push(density);
    }

    Ok((pdf, grid))
}

/// Smallest density among the top-density points that first accumulate
/// `percentile` of the total density.
fn hpd_threshold(pdf: &[f64], percentile: f64) -> Result<f64, StatsError> {
    if pdf.is_empty() {
        return Err(StatsError::EmptyInput);
    }

    let mut order: Vec<usize> = (0..pdf.len()).collect();
    order.sort_by(|a, b| pdf[*b].total_cmp(&pdf[*a]));

    let total: f64 = pdf.iter().sum();
    let target = percentile * total;
    let mut accumulated = 0.0;
    let mut threshold = pdf[order[0]];
    for index in order {
        accumulated += pdf[index];
        threshold = pdf[index];
        if accumulated >= target {
            break;
        }
    }
    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn threshold_picks_minimal_top_density_set() {
        let pdf = [1.0, 2.0, 3.0, 4.0];
        let grid = [0.0, 1.0, 2.0, 3.0];
        let region = credible_region(&[], 0.4, Some(&pdf), Some(&grid))
            .expect("region should be located");
        // Total mass 10; the single highest point already holds 0.4.
        assert_relative_eq!(region.density_threshold, 4.0);
        assert_eq!(region.mask(), vec![false, false, false, true]);
    }

    #[test]
    fn threshold_grows_the_set_until_mass_is_reached() {
        let pdf = [1.0, 2.0, 3.0, 4.0];
        let grid = [0.0, 1.0, 2.0, 3.0];
        let region = credible_region(&[], 0.65, Some(&pdf), Some(&grid))
            .expect("region should be located");
        // 4 + 3 = 7 of 10 covers 0.65; threshold drops to 3.
        assert_relative_eq!(region.density_threshold, 3.0);
        assert_eq!(region.mask(), vec![false, false, true, true]);
    }

    #[test]
    fn mask_covers_exactly_the_super_level_set() {
        let pdf = [0.5, 2.0, 2.0, 0.5, 3.0];
        let mask = highest_density_mask(&pdf, 2.0);
        assert_eq!(mask, vec![false, true, true, false, true]);
    }

    #[test]
    fn kde_region_centers_on_the_sample_mode() {
        let mut samples = Vec::new();
        for i in 0..200 {
            // Symmetric, unimodal around zero.
            let offset = f64::from(i % 21) / 10.0 - 1.0;
            samples.push(offset);
        }
        let region =
            credible_region(&samples, 0.68, None, None).expect("region should be located");
        assert_eq!(region.pdf.len(), region.grid.len());
        assert_eq!(region.pdf.len(), 100);

        let mask = region.mask();
        assert!(mask.iter().any(|selected| *selected));
        // The densest grid point is always inside the region.
        let peak = region
            .pdf
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(index, _)| index)
            .unwrap();
        assert!(mask[peak]);
    }

    #[test]
    fn kde_density_integrates_to_roughly_one() {
        let samples: Vec<f64> = (0..500).map(|i| f64::from(i % 100) / 25.0).collect();
        let region =
            credible_region(&samples, 0.5, None, None).expect("region should be located");
        let dx = region.grid[1] - region.grid[0];
        let mass: f64 = region.pdf.iter().map(|density| density * dx).sum();
        assert!(mass > 0.8 && mass < 1.1, "integrated mass {mass}");
    }

    #[test]
    fn invalid_percentile_is_rejected() {
        let err = credible_region(&[1.0, 2.0], 1.5, None, None)
            .expect_err("percentile above one should fail");
        assert!(matches!(err, StatsError::InvalidPercentile { .. }));
    }

    #[test]
    fn mismatched_pdf_and_grid_are_rejected() {
        let err = credible_region(&[], 0.5, Some(&[1.0, 2.0]), Some(&[0.0]))
            .expect_err("length mismatch should fail");
        assert!(matches!(
            err,
            StatsError::PdfGridMismatch {
                pdf_len: 2,
                grid_len: 1
            }
        ));
    }
}
