//! Marginal-histogram figure: a grid of per-parameter histograms with
//! optional highest-posterior-density shading and a shared y scale.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::layout::{histogram_figure_size, histogram_grid, GridLayout};
use super::style::{AXIS_SIZE, BAR_COLOR, FONT, SHADE_COLOR, TICK_SIZE};
use super::target::{image_format, ImageFormat};
use super::{draw_failure, PlotError};
use crate::input::PosteriorDraws;
use crate::stats::{credible_region, histogram_1d, nearest_interp, Histogram1d};
use crate::utils::thin;

/// Options for the marginal-histogram figure.
#[derive(Debug, Clone)]
pub struct HistogramOptions {
    /// Keep every `thinning`-th sample. Must be positive.
    pub thinning: usize,
    /// Bins per histogram. Must be positive.
    pub bins: usize,
    /// When set, shade each parameter's highest-posterior-density region
    /// holding this probability mass.
    pub percentile: Option<f64>,
    /// Precomputed per-parameter density curves for the shading, paired
    /// with `grid`. Estimated from the samples when absent.
    pub pdf: Option<Vec<Vec<f64>>>,
    /// Coordinates of the `pdf` curves.
    pub grid: Option<Vec<Vec<f64>>>,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        Self {
            thinning: 1,
            bins: 25,
            percentile: None,
            pdf: None,
            grid: None,
        }
    }
}

/// Layout of a rendered marginal-histogram figure.
#[derive(Debug, Clone)]
pub struct HistogramSummary {
    /// One panel per parameter.
    pub panels: usize,
    pub rows: usize,
    pub columns: usize,
    /// Shared y-axis upper limit across all panels.
    pub y_max: f64,
    /// Shaded density-curve points per panel; all zero without a
    /// percentile.
    pub shaded_points: Vec<usize>,
}

struct HistogramPanel {
    histogram: Histogram1d,
    /// Runs of consecutive shaded points on the density grid, mapped onto
    /// the histogram's count scale.
    shade_runs: Vec<Vec<(f64, f64)>>,
    shaded_points: usize,
}

struct HistogramPlan {
    panels: Vec<HistogramPanel>,
    names: Vec<String>,
    grid: GridLayout,
    y_max: f64,
}

/// Histogram counts resampled as a step-interpolation source: bin centers
/// extended by one zero-count point on each side.
fn interpolation_curve(histogram: &Histogram1d) -> (Vec<f64>, Vec<f64>) {
    let centers = histogram.centers();
    let width = histogram.edges[1] - histogram.edges[0];
    let mut xs = Vec::with_capacity(centers.len() + 2);
    let mut ys = Vec::with_capacity(centers.len() + 2);
    xs.push(centers[0] - width);
    ys.push(0.0);
    xs.extend_from_slice(&centers);
    ys.extend_from_slice(&histogram.counts);
    xs.push(centers[centers.len() - 1] + width);
    ys.push(0.0);
    (xs, ys)
}

fn shade_runs(
    histogram: &Histogram1d,
    grid: &[f64],
    mask: &[bool],
) -> (Vec<Vec<(f64, f64)>>, usize) {
    let (xs, ys) = interpolation_curve(histogram);
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut shaded = 0;
    for (index, selected) in mask.iter().enumerate() {
        if *selected {
            shaded += 1;
            current.push((grid[index], nearest_interp(&xs, &ys, grid[index])));
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    (runs, shaded)
}

fn plan_histograms(
    posterior: &PosteriorDraws,
    options: &HistogramOptions,
) -> Result<HistogramPlan, PlotError> {
    posterior.validate()?;
    if options.thinning == 0 {
        return Err(PlotError::InvalidThinning);
    }
    if options.bins == 0 {
        return Err(PlotError::InvalidBinCount);
    }

    let n_parameters = posterior.n_parameters();
    let mut panels = Vec::with_capacity(n_parameters);
    for parameter in 0..n_parameters {
        let column = posterior.column(parameter);
        let histogram = histogram_1d(&thin(&column, options.thinning), options.bins)?;

        let (shade_runs, shaded_points) = match options.percentile {
            Some(percentile) => {
                let pdf = options
                    .pdf
                    .as_ref()
                    .and_then(|curves| curves.get(parameter))
                    .map(Vec::as_slice);
                let grid = options
                    .grid
                    .as_ref()
                    .and_then(|curves| curves.get(parameter))
                    .map(Vec::as_slice);
                let region = credible_region(&column, percentile, pdf, grid)?;
                shade_runs(&histogram, &region.grid, &region.mask())
            }
            None => (Vec::new(), 0),
        };

        panels.push(HistogramPanel {
            histogram,
            shade_runs,
            shaded_points,
        });
    }

    let y_max = panels
        .iter()
        .map(|panel| panel.histogram.max_count())
        .fold(1.0, f64::max)
        * 1.05;

    Ok(HistogramPlan {
        panels,
        names: posterior.resolved_names(),
        grid: histogram_grid(n_parameters),
        y_max,
    })
}

/// Step-outline polyline tracing the top of every bin.
fn step_outline(histogram: &Histogram1d) -> Vec<(f64, f64)> {
    let edges = &histogram.edges;
    let mut points = Vec::with_capacity(2 * histogram.counts.len() + 2);
    points.push((edges[0], 0.0));
    for (bin, count) in histogram.counts.iter().enumerate() {
        points.push((edges[bin], *count));
        points.push((edges[bin + 1], *count));
    }
    points.push((edges[edges.len() - 1], 0.0));
    points
}

/// Render the marginal-histogram figure into `root`: one panel per
/// parameter on a row-major grid, all panels sharing the y scale. With a
/// percentile the bars become a step outline over a shaded credible
/// region; without one they are filled.
///
/// # Errors
///
/// Returns `PlotError` on invalid input, an invalid percentile or supplied
/// density curve, or a backend failure.
pub fn draw_histograms<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    posterior: &PosteriorDraws,
    options: &HistogramOptions,
) -> Result<HistogramSummary, PlotError> {
    let plan = plan_histograms(posterior, options)?;
    root.fill(&WHITE).map_err(draw_failure)?;

    let cells = root.split_evenly((plan.grid.rows, plan.grid.columns));
    for (index, panel) in plan.panels.iter().enumerate() {
        let cell = &cells[index];
        let left_column = index % plan.grid.columns == 0;
        let edges = &panel.histogram.edges;

        let mut chart = ChartBuilder::on(cell)
            .margin(4)
            .y_label_area_size(if left_column { 50 } else { 12 })
            .x_label_area_size(40)
            .build_cartesian_2d(edges[0]..edges[edges.len() - 1], 0.0..plan.y_max)
            .map_err(draw_failure)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .x_desc(plan.names[index].as_str())
            .x_labels(4)
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, AXIS_SIZE));
        if left_column {
            mesh.y_labels(4);
        } else {
            mesh.y_labels(0);
        }
        mesh.draw().map_err(draw_failure)?;

        if options.percentile.is_some() {
            for run in &panel.shade_runs {
                chart
                    .draw_series(AreaSeries::new(
                        run.iter().copied(),
                        0.0,
                        SHADE_COLOR.filled(),
                    ))
                    .map_err(draw_failure)?;
            }
            chart
                .draw_series(LineSeries::new(
                    step_outline(&panel.histogram),
                    BAR_COLOR.stroke_width(1),
                ))
                .map_err(draw_failure)?;
        } else {
            let bars = panel.histogram.counts.iter().enumerate().map(|(bin, count)| {
                Rectangle::new(
                    [(edges[bin], 0.0), (edges[bin + 1], *count)],
                    BAR_COLOR.filled(),
                )
            });
            chart.draw_series(bars).map_err(draw_failure)?;
        }
    }

    Ok(HistogramSummary {
        panels: plan.panels.len(),
        rows: plan.grid.rows,
        columns: plan.grid.columns,
        y_max: plan.y_max,
        shaded_points: plan
            .panels
            .iter()
            .map(|panel| panel.shaded_points)
            .collect(),
    })
}

/// Render the marginal-histogram figure to `path` (format from the
/// extension). The figure height scales with the grid's row count.
///
/// # Errors
///
/// Returns `PlotError` on invalid input, an unsupported extension, or a
/// backend failure.
pub fn save_histograms<P: AsRef<Path>>(
    posterior: &PosteriorDraws,
    options: &HistogramOptions,
    path: P,
) -> Result<HistogramSummary, PlotError> {
    posterior.validate()?;
    let size = histogram_figure_size(histogram_grid(posterior.n_parameters()).rows);
    let path = path.as_ref();
    match image_format(path)? {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            let summary = draw_histograms(&root, posterior, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            let summary = draw_histograms(&root, posterior, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
    }
}
