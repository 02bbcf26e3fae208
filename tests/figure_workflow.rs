//! End-to-end figure generation over a synthetic posterior sampling.

use std::fs;
use std::path::PathBuf;

use faer::Mat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use posterior_plots::{
    save_histograms, save_model_fit, save_pairwise, save_rms, save_trace, FitData,
    HistogramOptions, ModelFitOptions, PairwiseOptions, PosteriorDraws, RmsOptions, RmsSeries,
    TraceOptions,
};

fn output_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("posterior_plots_{}_{name}", std::process::id()));
    path
}

/// Two chains, three correlated parameters, mildly offset chain means.
fn synthetic_posterior(rows_per_chain: usize) -> PosteriorDraws {
    let mut rng = StdRng::seed_from_u64(7);
    let rows = 2 * rows_per_chain;
    let mut values = vec![[0.0; 3]; rows];
    for (row, value) in values.iter_mut().enumerate() {
        let chain_offset = if row < rows_per_chain { 0.0 } else { 0.05 };
        let shared: f64 = rng.gen_range(-1.0..1.0);
        value[0] = 1.0 + chain_offset + shared + rng.gen_range(-0.3..0.3);
        value[1] = -2.0 + 0.8 * shared + rng.gen_range(-0.3..0.3);
        value[2] = 0.5 * shared * shared + rng.gen_range(-0.1..0.1);
    }
    let samples = Mat::from_fn(rows, 3, |row, col| values[row][col]);
    let mut chain_ids = vec![0; rows_per_chain];
    chain_ids.extend(vec![1; rows_per_chain]);
    PosteriorDraws::new(samples)
        .with_chain_ids(chain_ids)
        .with_parameter_names(vec![
            "depth".to_string(),
            "slope".to_string(),
            "curvature".to_string(),
        ])
}

fn assert_written_and_remove(path: &PathBuf) {
    let metadata = fs::metadata(path).expect("figure file should exist");
    assert!(metadata.len() > 0, "figure file should be non-empty");
    fs::remove_file(path).expect("figure file should be removable");
}

#[test]
fn trace_figure_covers_every_parameter() {
    let draws = synthetic_posterior(200);
    let path = output_path("trace.svg");
    let options = TraceOptions {
        thinning: 2,
        burn_in: 20,
    };
    let summary = save_trace(&draws, &options, &path).expect("trace figure should render");

    assert_eq!(summary.panels, 3);
    assert_eq!(summary.thinned_samples, 180);
    assert_eq!(summary.chain_separators, vec![89]);
    assert_eq!(summary.parameter_names[0], "depth");
    assert_written_and_remove(&path);
}

#[test]
fn pairwise_figure_fills_the_lower_triangle() {
    let draws = synthetic_posterior(300);
    let path = output_path("pairwise.svg");
    let summary = save_pairwise(&draws, &PairwiseOptions::default(), &path)
        .expect("pairwise figure should render")
        .expect("three parameters should produce a figure");

    assert_eq!(summary.panels, 3);
    assert_eq!(summary.grid_side, 2);
    assert_written_and_remove(&path);
}

#[test]
fn histogram_figure_shades_credible_regions() {
    let draws = synthetic_posterior(300);
    let path = output_path("histograms.svg");
    let options = HistogramOptions {
        percentile: Some(0.683),
        ..HistogramOptions::default()
    };
    let summary =
        save_histograms(&draws, &options, &path).expect("histogram figure should render");

    assert_eq!(summary.panels, 3);
    assert_eq!(summary.columns, 3);
    assert_eq!(summary.rows, 1);
    assert!(summary.y_max > 0.0);
    assert!(summary.shaded_points.iter().all(|count| *count > 0));
    assert_written_and_remove(&path);
}

#[test]
fn rms_figure_renders_both_modes() {
    let bin_size: Vec<f64> = (1..=64).map(f64::from).collect();
    let rms: Vec<f64> = bin_size.iter().map(|bin| 3.0 / bin.sqrt() + 0.05).collect();
    let stderr: Vec<f64> = bin_size.iter().map(|bin| 3.0 / bin.sqrt()).collect();
    let rms_lo: Vec<f64> = rms.iter().map(|value| 0.05 * value).collect();
    let series = RmsSeries {
        bin_size,
        rms: rms.clone(),
        stderr,
        rms_lo: rms_lo.clone(),
        rms_hi: rms_lo,
    };

    let absolute_path = output_path("rms.svg");
    let options = RmsOptions {
        cadence: Some(60.0),
        time_points: vec![600.0],
        ..RmsOptions::default()
    };
    let summary = save_rms(&series, &options, &absolute_path)
        .expect("rms figure should render")
        .expect("multi-point series should produce a figure");
    assert_eq!(summary.points, 64);
    assert!(!summary.ratio);
    assert!((summary.x_range.0 - 60.0).abs() < 1e-12);
    assert_written_and_remove(&absolute_path);

    let ratio_path = output_path("rms_ratio.png");
    let ratio_options = RmsOptions {
        ratio: true,
        ..RmsOptions::default()
    };
    let summary = save_rms(&series, &ratio_options, &ratio_path)
        .expect("rms ratio figure should render")
        .expect("multi-point series should produce a figure");
    assert!(summary.ratio);
    assert!((summary.y_range.0).abs() < 1e-12);
    assert_written_and_remove(&ratio_path);
}

#[test]
fn model_fit_figure_bins_to_the_requested_resolution() {
    let mut rng = StdRng::seed_from_u64(11);
    let n = 600;
    let independent: Vec<f64> = (0..n).map(|k| f64::from(k) * 0.01).collect();
    let model: Vec<f64> = independent
        .iter()
        .map(|x| 1.0 - 0.01 * (x - 3.0) * (x - 3.0))
        .collect();
    let data: Vec<f64> = model
        .iter()
        .map(|value| value + rng.gen_range(-0.02..0.02))
        .collect();
    let fit = FitData {
        data,
        uncertainty: vec![0.02; n as usize],
        independent,
        model,
    };

    let path = output_path("modelfit.svg");
    let summary = save_model_fit(&fit, &ModelFitOptions::default(), &path)
        .expect("model fit figure should render");
    assert_eq!(summary.bin_size, 8);
    assert_eq!(summary.binned_points, 75);
    assert_written_and_remove(&path);
}
