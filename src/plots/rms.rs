//! RMS-versus-bin-size figure for time-correlated noise diagnosis: binned
//! residual RMS with asymmetric uncertainties against the white-noise
//! (Gaussian) extrapolation, either as absolute curves on log-log axes or
//! as their ratio on semi-log axes.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::layout::RMS_FIGURE_SIZE;
use super::style::{AXIS_SIZE, FONT, MUTED_GREY, TICK_SIZE};
use super::target::{image_format, ImageFormat};
use super::{draw_failure, PlotError};
use crate::input::RmsSeries;
use crate::utils::min_positive;

/// Floor for log-scaled axis bounds when no positive data value exists.
const LOG_FLOOR: f64 = 1e-10;

/// Options for the RMS figure.
#[derive(Debug, Clone)]
pub struct RmsOptions {
    /// Seconds per data point. Scales the x axis and switches its label
    /// to seconds.
    pub cadence: Option<f64>,
    /// Draw every `bin_step`-th error bar. Must be positive.
    pub bin_step: usize,
    /// Time scales of interest, marked with vertical dashed lines.
    pub time_points: Vec<f64>,
    /// Plot `rms / stderr` on a linear y axis instead of the absolute
    /// curves on a log y axis.
    pub ratio: bool,
    /// Override the y-axis range.
    pub y_range: Option<(f64, f64)>,
    /// Override the x-axis range.
    pub x_range: Option<(f64, f64)>,
}

impl Default for RmsOptions {
    fn default() -> Self {
        Self {
            cadence: None,
            bin_step: 1,
            time_points: Vec::new(),
            ratio: false,
            y_range: None,
            x_range: None,
        }
    }
}

/// Ranges and mode of a rendered RMS figure.
#[derive(Debug, Clone)]
pub struct RmsSummary {
    /// Bin sizes drawn with error bars, after the display stride.
    pub points: usize,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub ratio: bool,
}

/// Default y range: `[0, max(rms / stderr) + 1]` in ratio mode, otherwise
/// the envelope of the RMS error bars extended down to the final
/// white-noise value.
fn default_y_range(series: &RmsSeries, ratio: bool) -> (f64, f64) {
    if ratio {
        let max_ratio = series
            .rms
            .iter()
            .zip(&series.stderr)
            .map(|(rms, stderr)| rms / stderr)
            .fold(f64::NEG_INFINITY, f64::max);
        (0.0, max_ratio + 1.0)
    } else {
        let mut lo = series
            .rms
            .iter()
            .zip(&series.rms_lo)
            .map(|(rms, err)| rms - err)
            .fold(f64::INFINITY, f64::min);
        let hi = series
            .rms
            .iter()
            .zip(&series.rms_hi)
            .map(|(rms, err)| rms + err)
            .fold(f64::NEG_INFINITY, f64::max);
        if let Some(last_stderr) = series.stderr.last() {
            lo = lo.min(*last_stderr);
        }
        (lo, hi)
    }
}

/// Default x range: one cadence up to the largest tested bin size.
fn default_x_range(series: &RmsSeries, cadence: f64) -> (f64, f64) {
    let max_bin = series
        .bin_size
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    (cadence, max_bin * cadence)
}

/// Clamp a range's lower bound to a positive value for a log axis.
fn log_safe(range: (f64, f64), values: &[f64]) -> (f64, f64) {
    if range.0 > 0.0 {
        range
    } else {
        let floor = min_positive(values).map_or(LOG_FLOOR, |value| value * 0.5);
        (floor, range.1.max(floor * 10.0))
    }
}

/// Render the RMS figure into `root`. Returns `Ok(None)` without drawing
/// when the series has fewer than two bin sizes.
///
/// # Errors
///
/// Returns `PlotError` on mismatched input arrays, a zero display stride,
/// or a backend failure.
pub fn draw_rms<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &RmsSeries,
    options: &RmsOptions,
) -> Result<Option<RmsSummary>, PlotError> {
    series.validate()?;
    if options.bin_step == 0 {
        return Err(PlotError::InvalidBinStep);
    }
    if series.len() < 2 {
        return Ok(None);
    }

    let cadence = options.cadence.unwrap_or(1.0);
    let x_label = if options.cadence.is_some() {
        "Bin size  (sec)"
    } else {
        "Bin size"
    };
    let x_range = options
        .x_range
        .unwrap_or_else(|| default_x_range(series, cadence));
    let y_range = options
        .y_range
        .unwrap_or_else(|| default_y_range(series, options.ratio));

    let xs: Vec<f64> = series.bin_size.iter().map(|bin| bin * cadence).collect();
    let strided: Vec<usize> = (0..series.len()).step_by(options.bin_step).collect();

    root.fill(&WHITE).map_err(draw_failure)?;
    let x_draw = log_safe(x_range, &xs);

    if options.ratio {
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d((x_draw.0..x_draw.1).log_scale(), y_range.0..y_range.1)
            .map_err(draw_failure)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .y_desc("RMS / std. error")
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, AXIS_SIZE))
            .draw()
            .map_err(draw_failure)?;

        chart
            .draw_series(LineSeries::new(
                strided
                    .iter()
                    .map(|&k| (xs[k], series.rms[k] / series.stderr[k])),
                BLACK.stroke_width(1),
            ))
            .map_err(draw_failure)?;
        chart
            .draw_series(strided.iter().map(|&k| {
                let stderr = series.stderr[k];
                ErrorBar::new_vertical(
                    xs[k],
                    (series.rms[k] - series.rms_lo[k]) / stderr,
                    series.rms[k] / stderr,
                    (series.rms[k] + series.rms_hi[k]) / stderr,
                    MUTED_GREY.stroke_width(1),
                    4,
                )
            }))
            .map_err(draw_failure)?;
        // White-noise reference at a ratio of one.
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(x_draw.0, 1.0), (x_draw.1, 1.0)],
                RED.stroke_width(2),
            )))
            .map_err(draw_failure)?;

        draw_time_points(&mut chart, options, x_draw, y_range)?;
    } else {
        let y_draw = log_safe(y_range, &series.rms);
        let mut chart = ChartBuilder::on(root)
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(
                (x_draw.0..x_draw.1).log_scale(),
                (y_draw.0..y_draw.1).log_scale(),
            )
            .map_err(draw_failure)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .y_desc("RMS")
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, AXIS_SIZE))
            .draw()
            .map_err(draw_failure)?;

        chart
            .draw_series(LineSeries::new(
                strided.iter().map(|&k| (xs[k], series.rms[k])),
                BLACK.stroke_width(1),
            ))
            .map_err(draw_failure)?
            .label("RMS")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], BLACK.stroke_width(1)));
        chart
            .draw_series(strided.iter().map(|&k| {
                ErrorBar::new_vertical(
                    xs[k],
                    (series.rms[k] - series.rms_lo[k]).max(y_draw.0),
                    series.rms[k],
                    series.rms[k] + series.rms_hi[k],
                    MUTED_GREY.stroke_width(1),
                    4,
                )
            }))
            .map_err(draw_failure)?;
        chart
            .draw_series(LineSeries::new(
                xs.iter()
                    .zip(&series.stderr)
                    .filter(|(_, stderr)| **stderr > 0.0)
                    .map(|(x, stderr)| (*x, *stderr)),
                RED.stroke_width(2),
            ))
            .map_err(draw_failure)?
            .label("Gaussian std.")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], RED.stroke_width(2)));

        draw_time_points(&mut chart, options, x_draw, y_draw)?;

        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE)
            .label_font((FONT, TICK_SIZE))
            .draw()
            .map_err(draw_failure)?;
    }

    Ok(Some(RmsSummary {
        points: strided.len(),
        x_range,
        y_range,
        ratio: options.ratio,
    }))
}

/// Vertical dashed markers at each requested time scale, clipped to the
/// x range.
fn draw_time_points<DB, X, Y>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<X, Y>>,
    options: &RmsOptions,
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<(), PlotError>
where
    DB: DrawingBackend,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    for time in &options.time_points {
        if *time <= x_range.0 || *time >= x_range.1 {
            continue;
        }
        chart
            .draw_series(DashedLineSeries::new(
                [(*time, y_range.0), (*time, y_range.1)],
                6,
                4,
                BLUE.stroke_width(2).into(),
            ))
            .map_err(draw_failure)?;
    }
    Ok(())
}

/// Render the RMS figure to `path` (format from the extension). Returns
/// `Ok(None)` without creating a file when the series has fewer than two
/// bin sizes.
///
/// # Errors
///
/// Returns `PlotError` on mismatched input arrays, an unsupported
/// extension, or a backend failure.
pub fn save_rms<P: AsRef<Path>>(
    series: &RmsSeries,
    options: &RmsOptions,
    path: P,
) -> Result<Option<RmsSummary>, PlotError> {
    series.validate()?;
    if options.bin_step == 0 {
        return Err(PlotError::InvalidBinStep);
    }
    if series.len() < 2 {
        return Ok(None);
    }
    let path = path.as_ref();
    match image_format(path)? {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, RMS_FIGURE_SIZE).into_drawing_area();
            let summary = draw_rms(&root, series, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
        ImageFormat::Bitmap => {
            let root = BitMapBackend::new(path, RMS_FIGURE_SIZE).into_drawing_area();
            let summary = draw_rms(&root, series, options)?;
            root.present().map_err(draw_failure)?;
            Ok(summary)
        }
    }
}
