//! # Statistics collaborators
//!
//! Numeric helpers the renderers delegate to: fixed-size binning with
//! uncertainty propagation, highest-posterior-density (credible) region
//! location, and histogram construction.

pub mod binning;
pub mod credible;
pub mod histogram;

use thiserror::Error;

/// Errors returned by the statistics collaborators.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum StatsError {
    #[error("input arrays must be non-empty")]
    EmptyInput,
    #[error("array lengths must match; found {left} and {right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("bin size must be positive")]
    InvalidBinSize,
    #[error("bin count must be positive")]
    InvalidBinCount,
    #[error("uncertainty at index {index} must be positive and finite")]
    InvalidUncertainty { index: usize },
    #[error("percentile must lie in (0, 1); found {value}")]
    InvalidPercentile { value: f64 },
    #[error("PDF length ({pdf_len}) must match grid length ({grid_len})")]
    PdfGridMismatch { pdf_len: usize, grid_len: usize },
    #[error("failed to construct Gaussian kernel")]
    KernelConstruction,
}

pub use binning::{bin_array, bin_size_for, weighted_bin, BinnedSeries};
pub use credible::{credible_region, highest_density_mask, CredibleRegion};
pub use histogram::{histogram_1d, histogram_2d, nearest_interp, Histogram1d, Histogram2d};
