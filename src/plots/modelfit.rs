//! Model-fit figure: binned data with error bars under the best-fit model
//! curve, with a residual panel below sharing the x axis.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::layout::MODELFIT_FIGURE_SIZE;
use super::style::{AXIS_SIZE, FONT, TICK_SIZE};
use super::target::{image_format, ImageFormat};
use super::{draw_failure, PlotError};
use crate::input::FitData;
use crate::stats::{bin_array, bin_size_for, weighted_bin, BinnedSeries};
use crate::utils::{min_max, pad_range};

/// Fraction of the figure height given to the data/model panel; the rest
/// holds the residuals.
const DATA_PANEL_FRACTION: u32 = 70;

/// Options for the model-fit figure.
#[derive(Debug, Clone)]
pub struct ModelFitOptions {
    /// Requested number of display bins. Must be positive.
    pub bins: usize,
}

impl Default for ModelFitOptions {
    fn default() -> Self {
        Self { bins: 75 }
    }
}

/// Layout of a rendered model-fit figure.
#[derive(Debug, Clone)]
pub struct ModelFitSummary {
    /// Consecutive data points aggregated per display bin.
    pub bin_size: usize,
    /// Binned points drawn, `ceil(n / bin_size)`.
    pub binned_points: usize,
}

struct ModelFitPlan {
    binned: BinnedSeries,
    binned_model: Vec<f64>,
    residuals: Vec<f64>,
    bin_size: usize,
}

fn plan_model_fit(fit: &FitData, options: &ModelFitOptions) -> Result<ModelFitPlan, PlotError> {
    fit.validate()?;
    if options.bins == 0 {
        return Err(PlotError::InvalidBinCount);
    }

    let bin_size = bin_size_for(fit.len(), options.bins);
    let binned = bin_array(&fit.data, &fit.uncertainty, &fit.independent, bin_size)?;
    let binned_model = weighted_bin(&fit.model, bin_size)?;
    let residuals = binned
        .data
        .iter()
        .zip(&binned_model)
        .map(|(data, model)| data - model)
        .collect();

    Ok(ModelFitPlan {
        binned,
        binned_model,
        residuals,
        bin_size,
    })
}

/// Render the model-fit figure into `root`: the binned data and model in
/// the upper panel, binned residuals below on the same x axis.
///
/// # Errors
///
/// Returns `PlotError` on invalid input (empty arrays, mismatched lengths,
/// non-positive uncertainties), a zero bin count, or a backend failure.
pub fn draw_model_fit<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    fit: &FitData,
    options: &ModelFitOptions,
) -> Result<ModelFitSummary, PlotError> {
    let plan = plan_model_fit(fit, options)?;
    root.fill(&WHITE).map_err(draw_failure)?;

    let (_, height) = root.dim_in_pixel();
    let split = i32::try_from(height * DATA_PANEL_FRACTION / 100).unwrap_or(420);
    let (data_panel, residual_panel) = root.split_vertically(split);

    let (x_lo, x_hi) = min_max(&fit.independent)
        .map(|(lo, hi)| pad_range(lo, hi))
        .unwrap_or((0.0, 1.0));

    // Data/model panel.
    {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for ((data, uncertainty), model) in plan
            .binned
            .data
            .iter()
            .zip(&plan.binned.uncertainty)
            .zip(&plan.binned_model)
        {
            lo = lo.min(data - uncertainty).min(*model);
            hi = hi.max(data + uncertainty).max(*model);
        }
        let (y_lo, y_hi) = pad_range(lo, hi);

        let mut chart = ChartBuilder::on(&data_panel)
            .margin(10)
            .x_label_area_size(10)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_failure)?;
        let mut mesh = chart.configure_mesh();
        mesh.disable_x_mesh()
            .disable_y_mesh()
            .x_labels(0)
            .y_desc("y")
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, AXIS_SIZE));
        mesh.draw().map_err(draw_failure)?;

        chart
            .draw_series(LineSeries::new(
                fit.independent
                    .iter()
                    .zip(&fit.model)
                    .map(|(x, model)| (*x, *model)),
                BLUE.stroke_width(2),
            ))
            .map_err(draw_failure)?
            .label("Best Fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLUE.stroke_width(2)));

        chart
            .draw_series(plan.binned.independent.iter().enumerate().map(|(k, x)| {
                ErrorBar::new_vertical(
                    *x,
                    plan.binned.data[k] - plan.binned.uncertainty[k],
                    plan.binned.data[k],
                    plan.binned.data[k] + plan.binned.uncertainty[k],
                    BLACK.stroke_width(1),
                    3,
                )
            }))
            .map_err(draw_failure)?;
        chart
            .draw_series(
                plan.binned
                    .independent
                    .iter()
                    .zip(&plan.binned.data)
                    .map(|(x, data)| Circle::new((*x, *data), 3, BLACK.filled())),
            )
            .map_err(draw_failure)?
            .label("Binned Data")
            .legend(|(x, y)| Circle::new((x + 8, y), 3, BLACK.filled()));

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE)
            .label_font((FONT, TICK_SIZE))
            .draw()
            .map_err(draw_failure)?;
    }

    // Residual panel.
    {
        let envelope = plan
            .residuals
            .iter()
            .zip(&plan.binned.uncertainty)
            .map(|(residual, uncertainty)| residual.abs() + uncertainty)
            .fold(0.0, f64::max);
        let (y_lo, y_hi) = pad_range(-envelope, envelope);

        let mut chart = ChartBuilder::on(&residual_panel)
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_failure)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc("x")
            .y_desc("Residuals")
            .y_labels(3)
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, AXIS_SIZE))
            .draw()
            .map_err(draw_failure)?;

        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x_lo, 0.0), (x_hi, 0.0)],
                BLACK.stroke_width(1),
            )))
            .map_err(draw_failure)?;
        chart
            .draw_series(plan.binned.independent.iter().enumerate().map(|(k, x)| {
                ErrorBar::new_vertical(
                    *x,
                    plan.residuals[k] - plan.binned.uncertainty[k],
                    plan.residuals[k],
                    plan.residuals[k] + plan.binned.uncertainty[k],
                    BLACK.stroke_width(1),
                    3,
                )
            }))
            .map_err(draw_failure)?;
        chart
            .draw_series(
                plan.binned
                    .independent
                    .iter()
                    .zip(&plan.residuals)
                    .map(|(x, residual)| Circle::new((*x, *residual), 3, BLACK.filled())),
            )
            .map_err(draw_failure)?;
    }

    Ok(ModelFitSummary {
        bin_size: plan.bin_size,
        binned_points: plan.binned.len(),
    })
}

/// Render the model-fit figure to `path` (format from the extension).
///
/// # Errors
///
/// Returns `PlotError` on invalid input, an unsupported extension, or a
/// backend failure.
pub fn save_model_fit<P: AsRef<Path>>(
    fit: &FitData,
    options: &ModelFitOptions,
    path: P,
) -> Result<ModelFitSummary, PlotError> {
    let path = path.as_ref();
    match image_format(path)? {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, MODELFIT_FIGURE_SIZE).into_drawing_area();
            let summary = draw_model_fit(&root, fit, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(path, MODELFIT_FIGURE_SIZE).into_drawing_area();
            let summary = draw_model_fit(&root, fit, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
    }
}
