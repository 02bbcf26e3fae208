//! # Input types
//!
//! Validated, immutable inputs for the diagnostic renderers: a posterior
//! sample matrix with optional chain indices and parameter names, binned
//! RMS statistics, and a data/model fit dataset.

use faer::Mat;
use thiserror::Error;

/// Errors raised while validating renderer inputs.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("posterior sample matrix must be non-empty")]
    EmptyPosterior,
    #[error("chain index length ({chain_len}) must match sample rows ({rows})")]
    ChainLengthMismatch { rows: usize, chain_len: usize },
    #[error("parameter name count ({names}) must match parameter count ({parameters})")]
    ParameterNameMismatch { names: usize, parameters: usize },
    #[error("RMS statistic arrays must share one length; found {left} and {right}")]
    RmsLengthMismatch { left: usize, right: usize },
    #[error("fit dataset arrays must share one length; found {left} and {right}")]
    FitLengthMismatch { left: usize, right: usize },
    #[error("fit dataset must be non-empty")]
    EmptyFitData,
}

/// An MCMC posterior sampling with dimension `[n_samples, n_parameters]`,
/// optionally annotated with per-row chain indices and parameter names.
#[derive(Debug, Clone)]
pub struct PosteriorDraws {
    samples: Mat<f64>,
    chain_ids: Option<Vec<usize>>,
    parameter_names: Option<Vec<String>>,
}

impl PosteriorDraws {
    /// Wrap a sample matrix (rows = samples, columns = parameters).
    #[must_use]
    pub const fn new(samples: Mat<f64>) -> Self {
        Self {
            samples,
            chain_ids: None,
            parameter_names: None,
        }
    }

    /// Treat a single sample vector as a one-parameter posterior.
    #[must_use]
    pub fn from_vector(samples: &[f64]) -> Self {
        Self::new(Mat::from_fn(samples.len(), 1, |row, _| samples[row]))
    }

    /// Attach the chain index of each sample row.
    #[must_use]
    pub fn with_chain_ids(mut self, chain_ids: Vec<usize>) -> Self {
        self.chain_ids = Some(chain_ids);
        self
    }

    /// Attach one label per parameter column.
    #[must_use]
    pub fn with_parameter_names(mut self, names: Vec<String>) -> Self {
        self.parameter_names = Some(names);
        self
    }

    /// # Errors
    ///
    /// Returns `InputError` if the matrix is empty or annotation lengths
    /// disagree with the matrix shape.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.samples.nrows() == 0 || self.samples.ncols() == 0 {
            return Err(InputError::EmptyPosterior);
        }
        if let Some(chain_ids) = &self.chain_ids {
            if chain_ids.len() != self.samples.nrows() {
                return Err(InputError::ChainLengthMismatch {
                    rows: self.samples.nrows(),
                    chain_len: chain_ids.len(),
                });
            }
        }
        if let Some(names) = &self.parameter_names {
            if names.len() != self.samples.ncols() {
                return Err(InputError::ParameterNameMismatch {
                    names: names.len(),
                    parameters: self.samples.ncols(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.samples.nrows()
    }

    #[must_use]
    pub fn n_parameters(&self) -> usize {
        self.samples.ncols()
    }

    #[must_use]
    pub const fn samples(&self) -> &Mat<f64> {
        &self.samples
    }

    #[must_use]
    pub fn chain_ids(&self) -> Option<&[usize]> {
        self.chain_ids.as_deref()
    }

    /// All retained values of parameter column `index`, in row order.
    #[must_use]
    pub fn column(&self, index: usize) -> Vec<f64> {
        (0..self.samples.nrows())
            .map(|row| self.samples[(row, index)])
            .collect()
    }

    /// Supplied labels, or synthesized `P0, P1, …` names.
    #[must_use]
    pub fn resolved_names(&self) -> Vec<String> {
        self.parameter_names
            .clone()
            .unwrap_or_else(|| default_parameter_names(self.n_parameters()))
    }
}

/// Synthesize `P0, P1, …` labels, zero-padded to the decimal width of the
/// largest index.
#[must_use]
pub fn default_parameter_names(n_parameters: usize) -> Vec<String> {
    let width = decimal_width(n_parameters.saturating_sub(1).max(1));
    (0..n_parameters)
        .map(|index| format!("P{index:0width$}"))
        .collect()
}

fn decimal_width(value: usize) -> usize {
    let mut width = 1;
    let mut remaining = value / 10;
    while remaining > 0 {
        width += 1;
        remaining /= 10;
    }
    width
}

/// Residual RMS versus bin size, with the white-noise extrapolation and
/// asymmetric RMS uncertainties. All arrays are parallel, one row per
/// tested bin size.
#[derive(Debug, Clone, Default)]
pub struct RmsSeries {
    pub bin_size: Vec<f64>,
    pub rms: Vec<f64>,
    pub stderr: Vec<f64>,
    pub rms_lo: Vec<f64>,
    pub rms_hi: Vec<f64>,
}

impl RmsSeries {
    /// # Errors
    ///
    /// Returns `InputError::RmsLengthMismatch` if the parallel arrays do not
    /// share one length.
    pub fn validate(&self) -> Result<(), InputError> {
        let expected = self.bin_size.len();
        for len in [
            self.rms.len(),
            self.stderr.len(),
            self.rms_lo.len(),
            self.rms_hi.len(),
        ] {
            if len != expected {
                return Err(InputError::RmsLengthMismatch {
                    left: expected,
                    right: len,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bin_size.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bin_size.is_empty()
    }
}

/// A dataset, its one-sigma uncertainties, the independent variable, and
/// the model evaluated at each independent-variable point.
#[derive(Debug, Clone, Default)]
pub struct FitData {
    pub data: Vec<f64>,
    pub uncertainty: Vec<f64>,
    pub independent: Vec<f64>,
    pub model: Vec<f64>,
}

impl FitData {
    /// # Errors
    ///
    /// Returns `InputError` if the arrays are empty or do not share one
    /// length.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.data.is_empty() {
            return Err(InputError::EmptyFitData);
        }
        let expected = self.data.len();
        for len in [
            self.uncertainty.len(),
            self.independent.len(),
            self.model.len(),
        ] {
            if len != expected {
                return Err(InputError::FitLengthMismatch {
                    left: expected,
                    right: len,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_are_zero_padded() {
        assert_eq!(default_parameter_names(1), vec!["P0"]);
        assert_eq!(
            default_parameter_names(3),
            vec!["P0".to_string(), "P1".to_string(), "P2".to_string()]
        );
        let many = default_parameter_names(11);
        assert_eq!(many[0], "P00");
        assert_eq!(many[10], "P10");
    }

    #[test]
    fn posterior_validation_rejects_bad_chain_length() {
        let draws = PosteriorDraws::new(Mat::from_fn(4, 2, |row, col| {
            f64::from(u8::try_from(row + col).unwrap_or(u8::MAX))
        }))
        .with_chain_ids(vec![0, 0, 1]);
        assert!(matches!(
            draws.validate(),
            Err(InputError::ChainLengthMismatch {
                rows: 4,
                chain_len: 3
            })
        ));
    }

    #[test]
    fn posterior_validation_rejects_bad_name_count() {
        let draws = PosteriorDraws::new(Mat::from_fn(4, 2, |_, _| 0.0))
            .with_parameter_names(vec!["a".to_string()]);
        assert!(matches!(
            draws.validate(),
            Err(InputError::ParameterNameMismatch {
                names: 1,
                parameters: 2
            })
        ));
    }

    #[test]
    fn vector_constructor_yields_one_column() {
        let draws = PosteriorDraws::from_vector(&[1.0, 2.0, 3.0]);
        assert!(draws.validate().is_ok());
        assert_eq!(draws.n_parameters(), 1);
        assert_eq!(draws.n_samples(), 3);
        assert_eq!(draws.column(0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_posterior_is_rejected() {
        let draws = PosteriorDraws::new(Mat::zeros(0, 0));
        assert!(matches!(draws.validate(), Err(InputError::EmptyPosterior)));
    }

    #[test]
    fn rms_series_validation_checks_lengths() {
        let series = RmsSeries {
            bin_size: vec![1.0, 2.0],
            rms: vec![5.0, 4.0],
            stderr: vec![5.0, 3.5],
            rms_lo: vec![0.1, 0.1],
            rms_hi: vec![0.1],
        };
        assert!(matches!(
            series.validate(),
            Err(InputError::RmsLengthMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn fit_data_validation_checks_lengths_and_emptiness() {
        assert!(matches!(
            FitData::default().validate(),
            Err(InputError::EmptyFitData)
        ));
        let fit = FitData {
            data: vec![1.0, 2.0],
            uncertainty: vec![0.1, 0.1],
            independent: vec![0.0, 1.0],
            model: vec![1.0],
        };
        assert!(matches!(
            fit.validate(),
            Err(InputError::FitLengthMismatch { left: 2, right: 1 })
        ));
    }
}
