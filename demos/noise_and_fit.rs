//! Render the time-averaging RMS curve and the binned model-fit figure
//! for a synthetic transit-like dataset.
//!
//! Run with: `cargo run --example noise_and_fit`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use posterior_plots::{
    save_model_fit, save_rms, FitData, ModelFitOptions, RmsOptions, RmsSeries,
};

/// Residual RMS at each bin size, plus the white-noise extrapolation from
/// the unbinned scatter.
fn rms_curve(residuals: &[f64]) -> RmsSeries {
    let n = residuals.len();
    let base_rms = rms(residuals);
    let mut series = RmsSeries::default();
    let mut bin = 1;
    while n / bin >= 2 {
        let binned: Vec<f64> = residuals
            .chunks(bin)
            .map(|chunk| chunk.iter().sum::<f64>() / chunk_len(chunk))
            .collect();
        let value = rms(&binned);
        let m = chunk_len(&binned);
        series.bin_size.push(bin_f64(bin));
        series.rms.push(value);
        series
            .stderr
            .push(base_rms / bin_f64(bin).sqrt() * (m / (m - 1.0)).sqrt());
        series.rms_lo.push(value / (2.0 * m).sqrt());
        series.rms_hi.push(value / (2.0 * m).sqrt());
        bin *= 2;
    }
    series
}

fn rms(values: &[f64]) -> f64 {
    (values.iter().map(|value| value * value).sum::<f64>() / chunk_len(values)).sqrt()
}

fn chunk_len(values: &[f64]) -> f64 {
    bin_f64(values.len())
}

fn bin_f64(value: usize) -> f64 {
    f64::from(u32::try_from(value).unwrap_or(u32::MAX))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 3000;

    let independent: Vec<f64> = (0..n).map(|k| bin_f64(k) * 0.02).collect();
    let model: Vec<f64> = independent
        .iter()
        .map(|x| {
            // A flat baseline with a shallow dip in the middle.
            let center = (x - 30.0) / 6.0;
            1.0 - 0.01 * (-center * center).exp()
        })
        .collect();

    // White noise plus a slow sinusoidal drift for time correlation.
    let data: Vec<f64> = model
        .iter()
        .zip(&independent)
        .map(|(value, x)| value + rng.gen_range(-0.004..0.004) + 0.001 * (x * 0.5).sin())
        .collect();
    let residuals: Vec<f64> = data.iter().zip(&model).map(|(d, m)| d - m).collect();

    let series = rms_curve(&residuals);
    let rms_summary = save_rms(
        &series,
        &RmsOptions {
            cadence: Some(60.0),
            time_points: vec![1800.0],
            ..RmsOptions::default()
        },
        "rms.svg",
    )?;
    if let Some(summary) = rms_summary {
        println!(
            "rms.svg: {} bin sizes, x range {:?}, y range {:?}",
            summary.points, summary.x_range, summary.y_range
        );
    }

    let fit = FitData {
        data,
        uncertainty: vec![0.004; n],
        independent,
        model,
    };
    let fit_summary = save_model_fit(&fit, &ModelFitOptions::default(), "modelfit.svg")?;
    println!(
        "modelfit.svg: bin size {}, {} binned points",
        fit_summary.bin_size, fit_summary.binned_points
    );

    Ok(())
}
