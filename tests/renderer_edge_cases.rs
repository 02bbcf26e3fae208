//! Degenerate inputs: no-figure cases, validation failures, and format
//! dispatch errors surfaced through the public API.

use faer::Mat;

use posterior_plots::{
    save_pairwise, save_rms, save_trace, HistogramOptions, InputError, PairwiseOptions, PlotError,
    PosteriorDraws, RmsOptions, RmsSeries, TraceOptions,
};

fn missing_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("posterior_plots_absent_{}_{name}", std::process::id()));
    path
}

#[test]
fn single_parameter_pairwise_writes_no_file() {
    let draws = PosteriorDraws::from_vector(&[0.1, 0.2, 0.3, 0.2, 0.1]);
    let path = missing_path("pairwise.svg");
    let summary = save_pairwise(&draws, &PairwiseOptions::default(), &path)
        .expect("no-op render should succeed");
    assert!(summary.is_none());
    assert!(!path.exists());
}

#[test]
fn single_point_rms_writes_no_file() {
    let series = RmsSeries {
        bin_size: vec![1.0],
        rms: vec![0.5],
        stderr: vec![0.5],
        rms_lo: vec![0.05],
        rms_hi: vec![0.05],
    };
    let path = missing_path("rms.svg");
    let summary =
        save_rms(&series, &RmsOptions::default(), &path).expect("no-op render should succeed");
    assert!(summary.is_none());
    assert!(!path.exists());
}

#[test]
fn unsupported_extension_is_reported_before_rendering() {
    let draws = PosteriorDraws::from_vector(&[0.1, 0.2, 0.3]);
    let err = save_trace(&draws, &TraceOptions::default(), missing_path("trace.pdf"))
        .expect_err("pdf output should be rejected");
    assert!(matches!(err, PlotError::UnsupportedFormat { .. }));
}

#[test]
fn empty_posterior_is_rejected_by_every_entry_point() {
    let draws = PosteriorDraws::new(Mat::zeros(0, 0));
    let err = save_trace(&draws, &TraceOptions::default(), missing_path("trace.svg"))
        .expect_err("empty posterior should be rejected");
    assert!(matches!(
        err,
        PlotError::InvalidInput(InputError::EmptyPosterior)
    ));
}

#[test]
fn mismatched_chain_annotation_is_rejected() {
    let draws = PosteriorDraws::from_vector(&[0.1, 0.2, 0.3]).with_chain_ids(vec![0, 1]);
    let err = save_trace(&draws, &TraceOptions::default(), missing_path("trace.svg"))
        .expect_err("bad chain annotation should be rejected");
    assert!(matches!(
        err,
        PlotError::InvalidInput(InputError::ChainLengthMismatch {
            rows: 3,
            chain_len: 2
        })
    ));
}

#[test]
fn out_of_range_percentile_propagates_as_a_stats_error() {
    use plotters::prelude::*;
    use posterior_plots::draw_histograms;

    let draws = PosteriorDraws::from_vector(&[0.1, 0.2, 0.3, 0.4]);
    let options = HistogramOptions {
        percentile: Some(1.2),
        ..HistogramOptions::default()
    };
    let mut buffer = String::new();
    let root = SVGBackend::with_string(&mut buffer, (400, 300)).into_drawing_area();
    let err = draw_histograms(&root, &draws, &options)
        .expect_err("percentile above one should be rejected");
    assert!(matches!(err, PlotError::Stats(_)));
}
