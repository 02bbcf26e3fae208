//! Render the posterior diagnostic suite (trace, pairwise, histograms)
//! for a synthetic three-parameter sampling.
//!
//! Run with: `cargo run --example posterior_suite`

use faer::Mat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use posterior_plots::{
    save_histograms, save_pairwise, save_trace, HistogramOptions, PairwiseOptions, PosteriorDraws,
    TraceOptions,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(42);
    let rows_per_chain = 2000;
    let n_chains = 4;
    let rows = rows_per_chain * n_chains;

    // Correlated Gaussian draws with per-chain mean offsets, standing in
    // for a converged sampler.
    let mut chain_ids = Vec::with_capacity(rows);
    let mut values = Vec::with_capacity(rows);
    for chain in 0..n_chains {
        let offset = 0.02 * f64::from(u32::try_from(chain).unwrap_or(0));
        for _ in 0..rows_per_chain {
            let shared: f64 = rng.gen_range(-1.0..1.0);
            values.push([
                1.5 + offset + shared + rng.gen_range(-0.4..0.4),
                -0.7 + 0.6 * shared + rng.gen_range(-0.2..0.2),
                0.3 * shared * shared + rng.gen_range(-0.05..0.05),
            ]);
            chain_ids.push(chain);
        }
    }
    let samples = Mat::from_fn(rows, 3, |row, col| values[row][col]);
    let draws = PosteriorDraws::new(samples)
        .with_chain_ids(chain_ids)
        .with_parameter_names(vec![
            "offset".to_string(),
            "slope".to_string(),
            "quad".to_string(),
        ]);

    let trace = save_trace(
        &draws,
        &TraceOptions {
            thinning: 10,
            burn_in: 200,
        },
        "trace.svg",
    )?;
    println!(
        "trace.svg: {} panels, {} thinned samples, separators at {:?}",
        trace.panels, trace.thinned_samples, trace.chain_separators
    );

    let pairwise = save_pairwise(&draws, &PairwiseOptions::default(), "pairwise.svg")?;
    if let Some(summary) = pairwise {
        println!(
            "pairwise.svg: {} panels on a {}x{} grid",
            summary.panels, summary.grid_side, summary.grid_side
        );
    }

    let histograms = save_histograms(
        &draws,
        &HistogramOptions {
            percentile: Some(0.683),
            ..HistogramOptions::default()
        },
        "histograms.svg",
    )?;
    println!(
        "histograms.svg: {} panels ({} x {}), shaded points per panel {:?}",
        histograms.panels, histograms.rows, histograms.columns, histograms.shaded_points
    );

    Ok(())
}
