//! Parameter trace figure: one panel per parameter, thinned samples in row
//! order grouped by chain, with vertical separators at chain boundaries.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::layout::TRACE_FIGURE_SIZE;
use super::style::{AXIS_SIZE, FONT, MUTED_GREY, SAMPLE_COLOR, TICK_SIZE};
use super::target::{image_format, ImageFormat};
use super::{draw_failure, PlotError};
use crate::input::PosteriorDraws;
use crate::utils::{min_max, pad_range, thinned_len, usize_to_f64};

/// Options for the trace figure.
#[derive(Debug, Clone)]
pub struct TraceOptions {
    /// Keep every `thinning`-th retained sample. Must be positive.
    pub thinning: usize,
    /// Samples to drop from the start of each chain.
    pub burn_in: usize,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            thinning: 1,
            burn_in: 0,
        }
    }
}

/// Layout of a rendered trace figure.
#[derive(Debug, Clone)]
pub struct TraceSummary {
    /// One panel per parameter.
    pub panels: usize,
    /// Samples drawn in each panel after burn-in removal and thinning.
    pub thinned_samples: usize,
    /// Thinned x positions where a vertical chain separator was drawn.
    pub chain_separators: Vec<usize>,
    /// Panel labels, top to bottom.
    pub parameter_names: Vec<String>,
}

struct TracePlan {
    series: Vec<Vec<f64>>,
    separators: Vec<usize>,
    names: Vec<String>,
    x_max: usize,
}

/// Sample rows grouped by ascending chain index, row order preserved within
/// each chain, with the first `burn_in` rows of every chain dropped.
fn retained_rows(chain_ids: &[usize], burn_in: usize) -> Vec<usize> {
    let n_chains = chain_ids.iter().copied().max().map_or(0, |max| max + 1);
    let mut rows = Vec::with_capacity(chain_ids.len());
    for chain in 0..n_chains {
        rows.extend(
            chain_ids
                .iter()
                .enumerate()
                .filter(|(_, id)| **id == chain)
                .map(|(row, _)| row)
                .skip(burn_in),
        );
    }
    rows
}

fn plan_trace(posterior: &PosteriorDraws, options: &TraceOptions) -> Result<TracePlan, PlotError> {
    posterior.validate()?;
    if options.thinning == 0 {
        return Err(PlotError::InvalidThinning);
    }

    let samples = posterior.samples();
    let rows = match posterior.chain_ids() {
        Some(chain_ids) => retained_rows(chain_ids, options.burn_in),
        None => (0..samples.nrows()).skip(options.burn_in).collect(),
    };
    if rows.is_empty() {
        return Err(PlotError::EmptySelection);
    }

    // Separators sit at the last thinned index of each chain but the final
    // one, so each chain's samples stay left of its separator.
    let separators = match posterior.chain_ids() {
        Some(chain_ids) => {
            let thinned_chains: Vec<usize> = rows
                .iter()
                .step_by(options.thinning)
                .map(|row| chain_ids[*row])
                .collect();
            thinned_chains
                .windows(2)
                .enumerate()
                .filter(|(_, pair)| pair[0] != pair[1])
                .map(|(index, _)| index)
                .collect()
        }
        None => Vec::new(),
    };

    let series = (0..posterior.n_parameters())
        .map(|parameter| {
            rows.iter()
                .step_by(options.thinning)
                .map(|row| samples[(*row, parameter)])
                .collect()
        })
        .collect();

    Ok(TracePlan {
        series,
        separators,
        names: posterior.resolved_names(),
        x_max: thinned_len(rows.len(), options.thinning),
    })
}

/// Render the trace figure into `root`: stacked panels, one per parameter,
/// sharing the thinned-sample x axis. Only the bottom panel carries x tick
/// labels.
///
/// # Errors
///
/// Returns `PlotError` on invalid input, a zero thinning stride, a burn-in
/// that removes every sample, or a backend failure.
pub fn draw_trace<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    posterior: &PosteriorDraws,
    options: &TraceOptions,
) -> Result<TraceSummary, PlotError> {
    let plan = plan_trace(posterior, options)?;
    root.fill(&WHITE).map_err(draw_failure)?;

    let panels = root.split_evenly((plan.series.len(), 1));
    for (index, (panel, values)) in panels.iter().zip(plan.series.iter()).enumerate() {
        let bottom = index + 1 == plan.series.len();
        let (lo, hi) = min_max(values).unwrap_or((0.0, 1.0));
        let (y_lo, y_hi) = pad_range(lo, hi);

        let mut chart = ChartBuilder::on(panel)
            .margin(5)
            .y_label_area_size(70)
            .x_label_area_size(if bottom { 45 } else { 10 })
            .build_cartesian_2d(0.0..usize_to_f64(plan.x_max), y_lo..y_hi)
            .map_err(draw_failure)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .y_desc(plan.names[index].as_str())
            .y_labels(4)
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, AXIS_SIZE));
        if bottom {
            mesh.x_desc("MCMC sample");
        } else {
            mesh.x_labels(0);
        }
        mesh.draw().map_err(draw_failure)?;

        chart
            .draw_series(values.iter().enumerate().map(|(sample, value)| {
                Circle::new((usize_to_f64(sample), *value), 1, SAMPLE_COLOR.filled())
            }))
            .map_err(draw_failure)?;

        for separator in &plan.separators {
            let x = usize_to_f64(*separator);
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x, y_lo), (x, y_hi)],
                    MUTED_GREY.stroke_width(1),
                )))
                .map_err(draw_failure)?;
        }
    }

    Ok(TraceSummary {
        panels: plan.series.len(),
        thinned_samples: plan.x_max,
        chain_separators: plan.separators,
        parameter_names: plan.names,
    })
}

/// Render the trace figure to `path` (format from the extension).
///
/// # Errors
///
/// Returns `PlotError` on invalid input, an unsupported extension, or a
/// backend failure.
pub fn save_trace<P: AsRef<Path>>(
    posterior: &PosteriorDraws,
    options: &TraceOptions,
    path: P,
) -> Result<TraceSummary, PlotError> {
    let path = path.as_ref();
    match image_format(path)? {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, TRACE_FIGURE_SIZE).into_drawing_area();
            let summary = draw_trace(&root, posterior, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(path, TRACE_FIGURE_SIZE).into_drawing_area();
            let summary = draw_trace(&root, posterior, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
    }
}
