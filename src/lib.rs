//! # posterior_plots
//!
//! Diagnostic figures for MCMC posterior samplings: parameter traces,
//! pairwise point-density maps, marginal histograms with credible-region
//! shading, time-averaging RMS curves, and data/model fit panels.
//!
//! The renderers are stateless functions over validated input structs.
//! Each comes as a `draw_*` variant targeting any `plotters` drawing area
//! and a `save_*` variant writing SVG or bitmap files, and each returns a
//! summary describing the layout it produced.
//!
//! ```no_run
//! use posterior_plots::{save_trace, PosteriorDraws, TraceOptions};
//!
//! # fn main() -> Result<(), posterior_plots::PlotError> {
//! let draws = PosteriorDraws::from_vector(&[0.3, 0.5, 0.4, 0.6, 0.5])
//!     .with_parameter_names(vec!["depth".to_string()]);
//! let summary = save_trace(&draws, &TraceOptions::default(), "trace.svg")?;
//! assert_eq!(summary.panels, 1);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod input;
pub mod plots;
pub mod stats;
pub mod utils;

pub use input::{FitData, InputError, PosteriorDraws, RmsSeries};
pub use plots::{
    draw_histograms, draw_model_fit, draw_pairwise, draw_rms, draw_trace, save_histograms,
    save_model_fit, save_pairwise, save_rms, save_trace, HistogramOptions, HistogramSummary,
    ModelFitOptions, ModelFitSummary, PairwiseOptions, PairwiseSummary, PlotError, RmsOptions,
    RmsSummary, TraceOptions, TraceSummary,
};
pub use stats::StatsError;
