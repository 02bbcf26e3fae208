//! # Diagnostic renderers
//!
//! Five independent, stateless figure renderers for MCMC posterior
//! results: parameter traces, pairwise density maps, marginal histograms,
//! RMS-versus-bin-size noise correlation, and data/model fit panels.
//!
//! Every renderer comes in two layers: `draw_*` renders into any
//! caller-supplied `plotters` drawing area, and `save_*` renders straight
//! to a file whose format follows the path extension. Both return a summary
//! of the produced layout (panel counts, ranges, separators) so callers can
//! inspect what was drawn without decoding pixels.

pub mod histogram;
pub mod layout;
pub mod modelfit;
pub mod pairwise;
pub mod rms;
pub mod style;
pub mod target;
pub mod trace;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

use crate::input::InputError;
use crate::stats::StatsError;

/// Errors returned by the figure renderers.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("thinning stride must be positive")]
    InvalidThinning,
    #[error("display bin step must be positive")]
    InvalidBinStep,
    #[error("histogram bin count must be positive")]
    InvalidBinCount,
    #[error("density level count must be at least 2")]
    InvalidLevelCount,
    #[error("burn-in removed every sample")]
    EmptySelection,
    #[error("unsupported image format for '{path}'; use .svg, .png, or .bmp")]
    UnsupportedFormat { path: String },
    #[error("drawing failed: {0}")]
    Draw(String),
}

/// Collapse a backend-specific drawing error into a `PlotError`, keeping
/// the backend's message.
pub(crate) fn draw_failure<E>(error: DrawingAreaErrorKind<E>) -> PlotError
where
    E: std::error::Error + Send + Sync,
{
    PlotError::Draw(error.to_string())
}

pub use histogram::{draw_histograms, save_histograms, HistogramOptions, HistogramSummary};
pub use modelfit::{draw_model_fit, save_model_fit, ModelFitOptions, ModelFitSummary};
pub use pairwise::{draw_pairwise, save_pairwise, PairwiseOptions, PairwiseSummary};
pub use rms::{draw_rms, save_rms, RmsOptions, RmsSummary};
pub use trace::{draw_trace, save_trace, TraceOptions, TraceSummary};
