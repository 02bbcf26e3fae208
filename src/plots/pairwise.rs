//! Pairwise posterior figure: a lower-triangular grid of 2D histogram
//! density maps with a shared normalized-density colorbar.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::layout::PAIRWISE_FIGURE_SIZE;
use super::style::{density_color, AXIS_SIZE, FONT, TICK_SIZE};
use super::target::{image_format, ImageFormat};
use super::{draw_failure, PlotError};
use crate::input::PosteriorDraws;
use crate::stats::{histogram_2d, Histogram2d};
use crate::utils::{thin, usize_to_f64};

/// Width in pixels reserved for the colorbar on the figure's right edge.
const COLORBAR_WIDTH: i32 = 120;

/// Options for the pairwise figure.
#[derive(Debug, Clone)]
pub struct PairwiseOptions {
    /// Keep every `thinning`-th sample. Must be positive.
    pub thinning: usize,
    /// Histogram bins per axis of each panel.
    pub bins: usize,
    /// Discrete density levels shared by the panels and the colorbar.
    pub levels: usize,
    /// Normalize all panels by the global maximum count instead of each
    /// panel's own.
    pub absolute_density: bool,
}

impl Default for PairwiseOptions {
    fn default() -> Self {
        Self {
            thinning: 1,
            bins: 35,
            levels: 20,
            absolute_density: false,
        }
    }
}

/// Layout of a rendered pairwise figure.
#[derive(Debug, Clone)]
pub struct PairwiseSummary {
    /// Populated lower-triangular panels, `n (n - 1) / 2`.
    pub panels: usize,
    /// Rows (and columns) of the panel grid, `n - 1`.
    pub grid_side: usize,
    /// Parameter labels in column order.
    pub parameter_names: Vec<String>,
}

struct PairPanel {
    /// Grid column, the x parameter index.
    column: usize,
    /// Grid row, the y parameter index minus one.
    row: usize,
    histogram: Histogram2d,
    /// Count mapped to the top density level, `max + 1`.
    level_max: f64,
}

struct PairwisePlan {
    panels: Vec<PairPanel>,
    names: Vec<String>,
    grid_side: usize,
}

fn plan_pairwise(
    posterior: &PosteriorDraws,
    options: &PairwiseOptions,
) -> Result<Option<PairwisePlan>, PlotError> {
    posterior.validate()?;
    if options.thinning == 0 {
        return Err(PlotError::InvalidThinning);
    }
    if options.bins == 0 {
        return Err(PlotError::InvalidBinCount);
    }
    if options.levels < 2 {
        return Err(PlotError::InvalidLevelCount);
    }

    let n_parameters = posterior.n_parameters();
    if n_parameters < 2 {
        return Ok(None);
    }

    let columns: Vec<Vec<f64>> = (0..n_parameters)
        .map(|parameter| thin(&posterior.column(parameter), options.thinning))
        .collect();

    let mut panels = Vec::new();
    for y_parameter in 1..n_parameters {
        for x_parameter in 0..y_parameter {
            let histogram = histogram_2d(&columns[x_parameter], &columns[y_parameter], options.bins)?;
            let level_max = histogram.max_count() + 1.0;
            panels.push(PairPanel {
                column: x_parameter,
                row: y_parameter - 1,
                histogram,
                level_max,
            });
        }
    }

    if options.absolute_density {
        let global = panels
            .iter()
            .map(|panel| panel.level_max)
            .fold(f64::NEG_INFINITY, f64::max);
        for panel in &mut panels {
            panel.level_max = global;
        }
    }

    Ok(Some(PairwisePlan {
        panels,
        names: posterior.resolved_names(),
        grid_side: n_parameters - 1,
    }))
}

/// Quantize a cell count onto the shared density levels and return its
/// normalized position in `[0, 1]`.
fn level_fraction(count: f64, level_max: f64, levels: usize) -> f64 {
    let fraction = if level_max > 1.0 {
        ((count - 1.0) / (level_max - 1.0)).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let steps = usize_to_f64(levels - 1);
    (fraction * steps).floor() / steps
}

/// Render the pairwise figure into `root`. Panels tile the lower triangle
/// (parameter `i` on x against parameter `j > i` on y); empty cells stay
/// white. Returns `Ok(None)` without drawing when there is a single
/// parameter.
///
/// # Errors
///
/// Returns `PlotError` on invalid input or options, or a backend failure.
pub fn draw_pairwise<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    posterior: &PosteriorDraws,
    options: &PairwiseOptions,
) -> Result<Option<PairwiseSummary>, PlotError> {
    let Some(plan) = plan_pairwise(posterior, options)? else {
        return Ok(None);
    };
    root.fill(&WHITE).map_err(draw_failure)?;

    let (width, _) = root.dim_in_pixel();
    let split = i32::try_from(width).unwrap_or(i32::MAX) - COLORBAR_WIDTH;
    let (grid_area, bar_area) = root.split_horizontally(split);
    let cells = grid_area.split_evenly((plan.grid_side, plan.grid_side));

    for panel in &plan.panels {
        let cell = &cells[panel.row * plan.grid_side + panel.column];
        let left_column = panel.column == 0;
        let bottom_row = panel.row + 1 == plan.grid_side;
        let edges_x = &panel.histogram.x_edges;
        let edges_y = &panel.histogram.y_edges;

        let mut chart = ChartBuilder::on(cell)
            .margin(2)
            .y_label_area_size(if left_column { 55 } else { 8 })
            .x_label_area_size(if bottom_row { 40 } else { 8 })
            .build_cartesian_2d(
                edges_x[0]..edges_x[edges_x.len() - 1],
                edges_y[0]..edges_y[edges_y.len() - 1],
            )
            .map_err(draw_failure)?;

        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, AXIS_SIZE))
            .x_labels(4)
            .y_labels(4);
        if left_column {
            mesh.y_desc(plan.names[panel.row + 1].as_str());
        } else {
            mesh.y_labels(0);
        }
        if bottom_row {
            mesh.x_desc(plan.names[panel.column].as_str());
        } else {
            mesh.x_labels(0);
        }
        mesh.draw().map_err(draw_failure)?;

        let mut rectangles = Vec::new();
        for (y_bin, row_counts) in panel.histogram.counts.iter().enumerate() {
            for (x_bin, count) in row_counts.iter().enumerate() {
                // Empty cells keep the white background.
                if *count < 1.0 {
                    continue;
                }
                let fraction = level_fraction(*count, panel.level_max, options.levels);
                rectangles.push(Rectangle::new(
                    [
                        (edges_x[x_bin], edges_y[y_bin]),
                        (edges_x[x_bin + 1], edges_y[y_bin + 1]),
                    ],
                    density_color(fraction).filled(),
                ));
            }
        }
        chart.draw_series(rectangles).map_err(draw_failure)?;
    }

    draw_colorbar(&bar_area, options.levels)?;

    Ok(Some(PairwiseSummary {
        panels: plan.panels.len(),
        grid_side: plan.grid_side,
        parameter_names: plan.names,
    }))
}

/// Normalized point-density colorbar on the figure's right edge.
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    levels: usize,
) -> Result<(), PlotError> {
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(draw_failure)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(5)
        .y_label_formatter(&|value| format!("{value:.1}"))
        .y_desc("Normalized point density")
        .label_style((FONT, TICK_SIZE))
        .axis_desc_style((FONT, AXIS_SIZE))
        .draw()
        .map_err(draw_failure)?;

    let steps = usize_to_f64(levels);
    let bands = (0..levels).map(|level| {
        let t_lo = usize_to_f64(level) / steps;
        let t_hi = usize_to_f64(level + 1) / steps;
        let fraction = usize_to_f64(level) / usize_to_f64(levels - 1);
        Rectangle::new([(0.0, t_lo), (1.0, t_hi)], density_color(fraction).filled())
    });
    chart.draw_series(bands).map_err(draw_failure)?;
    Ok(())
}

/// Render the pairwise figure to `path` (format from the extension).
/// Returns `Ok(None)` without creating a file for a single-parameter
/// posterior.
///
/// # Errors
///
/// Returns `PlotError` on invalid input, an unsupported extension, or a
/// backend failure.
pub fn save_pairwise<P: AsRef<Path>>(
    posterior: &PosteriorDraws,
    options: &PairwiseOptions,
    path: P,
) -> Result<Option<PairwiseSummary>, PlotError> {
    if plan_pairwise(posterior, options)?.is_none() {
        return Ok(None);
    }
    let path = path.as_ref();
    match image_format(path)? {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, PAIRWISE_FIGURE_SIZE).into_drawing_area();
            let summary = draw_pairwise(&root, posterior, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(path, PAIRWISE_FIGURE_SIZE).into_drawing_area();
            let summary = draw_pairwise(&root, posterior, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use faer::Mat;

    fn posterior(parameters: usize, rows: usize) -> PosteriorDraws {
        PosteriorDraws::new(Mat::from_fn(rows, parameters, |row, col| {
            f64::from(u32::try_from((row * 13 + col * 7) % 50).unwrap_or(0)) / 10.0
        }))
    }

    #[test]
    fn panel_count_is_the_lower_triangle() {
        let plan = plan_pairwise(&posterior(4, 100), &PairwiseOptions::default())
            .expect("plan should build")
            .expect("multi-parameter plan should exist");
        assert_eq!(plan.panels.len(), 6);
        assert_eq!(plan.grid_side, 3);
    }

    #[test]
    fn single_parameter_produces_no_figure() {
        let plan = plan_pairwise(&posterior(1, 50), &PairwiseOptions::default())
            .expect("plan should build");
        assert!(plan.is_none());

        let mut buffer = String::new();
        let root = SVGBackend::with_string(&mut buffer, PAIRWISE_FIGURE_SIZE).into_drawing_area();
        let summary = draw_pairwise(&root, &posterior(1, 50), &PairwiseOptions::default())
            .expect("drawing should succeed");
        assert!(summary.is_none());
    }

    #[test]
    fn absolute_density_shares_one_scale() {
        let options = PairwiseOptions {
            absolute_density: true,
            ..PairwiseOptions::default()
        };
        let plan = plan_pairwise(&posterior(3, 200), &options)
            .expect("plan should build")
            .expect("multi-parameter plan should exist");
        let first = plan.panels[0].level_max;
        assert!(plan
            .panels
            .iter()
            .all(|panel| (panel.level_max - first).abs() < f64::EPSILON));
    }

    #[test]
    fn level_fraction_quantizes_onto_the_level_grid() {
        // A count equal to the level maximum maps to the top level.
        assert_relative_eq!(level_fraction(11.0, 11.0, 20), 1.0);
        // The lowest populated count maps to the bottom level.
        assert_relative_eq!(level_fraction(1.0, 11.0, 20), 0.0);
        // Intermediate counts land exactly on a level step.
        let fraction = level_fraction(6.0, 11.0, 20);
        let steps = fraction * 19.0;
        assert_relative_eq!(steps, steps.round(), epsilon = 1e-9);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let draws = posterior(3, 50);
        let bad_levels = PairwiseOptions {
            levels: 1,
            ..PairwiseOptions::default()
        };
        assert!(matches!(
            plan_pairwise(&draws, &bad_levels),
            Err(PlotError::InvalidLevelCount)
        ));
        let bad_bins = PairwiseOptions {
            bins: 0,
            ..PairwiseOptions::default()
        };
        assert!(matches!(
            plan_pairwise(&draws, &bad_bins),
            Err(PlotError::InvalidBinCount)
        ));
    }

    #[test]
    fn draw_reports_panels_and_labels() {
        let mut buffer = String::new();
        {
            let root =
                SVGBackend::with_string(&mut buffer, PAIRWISE_FIGURE_SIZE).into_drawing_area();
            let summary = draw_pairwise(&root, &posterior(3, 150), &PairwiseOptions::default())
                .expect("drawing should succeed")
                .expect("multi-parameter figure should exist");
            assert_eq!(summary.panels, 3);
            assert_eq!(summary.grid_side, 2);
            assert_eq!(summary.parameter_names.len(), 3);
            root.present().expect("present should succeed");
        }
        assert!(buffer.contains("<svg"));
    }
}
