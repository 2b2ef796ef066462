//! Gaussian naive Bayes.
//!
//! Each feature is modelled as an independent normal distribution per class.
//! The joint log-likelihood of a sample `x` for class `c` is
//!
//! ```text
//! log P(c) - 0.5 * sum_j log(2 * pi * var[c, j]) - 0.5 * sum_j (x_j - mean[c, j])^2 / var[c, j]
//! ```
//!
//! To keep variances away from zero, `var_smoothing` times the largest
//! per-feature variance of the whole training set is added to every class
//! variance.

use crate::dataset::unique_sorted;
use crate::error::{Error, Result};
use crate::model::{
    argmax, validate_fit_input, validate_predict_input, Classifier, FittedClassifier,
    ProbabilisticClassifier,
};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Hyperparameters of [`GaussianNB`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaussianNBConfig {
    /// Portion of the largest feature variance added to all variances.
    pub var_smoothing: f64,
    /// Fixed class priors in ascending class order; `None` uses training frequencies.
    pub priors: Option<Vec<f64>>,
}

impl Default for GaussianNBConfig {
    fn default() -> Self {
        Self {
            var_smoothing: 1e-9,
            priors: None,
        }
    }
}

impl GaussianNBConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.var_smoothing >= 0.0 && self.var_smoothing.is_finite()) {
            return Err(Error::InvalidParameter(format!(
                "var_smoothing must be a finite non-negative number, got {}",
                self.var_smoothing
            )));
        }
        if let Some(priors) = &self.priors {
            if priors.iter().any(|p| !(*p >= 0.0)) {
                return Err(Error::InvalidParameter(
                    "priors must be non-negative".to_string(),
                ));
            }
            let total: f64 = priors.iter().sum();
            if (total - 1.0).abs() > 1e-8 {
                return Err(Error::InvalidParameter(format!(
                    "priors must sum to 1, got {}",
                    total
                )));
            }
        }
        Ok(())
    }
}

/// Gaussian naive Bayes classifier (unfitted).
#[derive(Clone, Debug, Default)]
pub struct GaussianNB {
    config: GaussianNBConfig,
}

impl GaussianNB {
    /// Create a classifier with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier from a configuration.
    pub fn from_config(config: GaussianNBConfig) -> Self {
        Self { config }
    }

    /// Set the variance smoothing fraction.
    pub fn with_var_smoothing(mut self, var_smoothing: f64) -> Self {
        self.config.var_smoothing = var_smoothing;
        self
    }

    /// Use fixed class priors instead of training frequencies.
    pub fn with_priors(mut self, priors: Vec<f64>) -> Self {
        self.config.priors = Some(priors);
        self
    }

    pub fn config(&self) -> &GaussianNBConfig {
        &self.config
    }
}

impl Classifier for GaussianNB {
    type Fitted = FittedGaussianNB;

    fn fit(&self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<Self::Fitted> {
        self.config.validate()?;
        validate_fit_input(records, targets)?;

        let classes = unique_sorted(targets.iter().copied());
        let n_classes = classes.len();
        let n_features = records.ncols();
        if n_classes == 1 {
            warn!("GaussianNB fitted on a single class ({})", classes[0]);
        }

        let mut theta = Array2::<f64>::zeros((n_classes, n_features));
        let mut var = Array2::<f64>::zeros((n_classes, n_features));
        let mut class_count = Array1::<f64>::zeros(n_classes);

        for (ci, &class) in classes.iter().enumerate() {
            let rows: Vec<usize> = targets
                .iter()
                .enumerate()
                .filter(|(_, &t)| t == class)
                .map(|(i, _)| i)
                .collect();
            let subset = records.select(Axis(0), &rows);
            class_count[ci] = rows.len() as f64;
            // population variance (ddof = 0)
            theta.row_mut(ci).assign(&subset.mean_axis(Axis(0)).unwrap_or_default());
            var.row_mut(ci).assign(&subset.var_axis(Axis(0), 0.0));
        }

        let max_var = records
            .var_axis(Axis(0), 0.0)
            .iter()
            .copied()
            .fold(0.0_f64, f64::max);
        let epsilon = if max_var > 0.0 {
            self.config.var_smoothing * max_var
        } else {
            self.config.var_smoothing.max(f64::MIN_POSITIVE)
        };
        var.mapv_inplace(|v| v + epsilon);

        let class_prior = match &self.config.priors {
            Some(priors) => {
                if priors.len() != n_classes {
                    return Err(Error::InvalidParameter(format!(
                        "{} priors given for {} classes",
                        priors.len(),
                        n_classes
                    )));
                }
                Array1::from(priors.clone())
            }
            None => &class_count / records.nrows() as f64,
        };

        debug!(
            "GaussianNB fitted: {} classes, {} features, epsilon={:e}, counts={:?}",
            n_classes,
            n_features,
            epsilon,
            class_count.to_vec()
        );

        Ok(FittedGaussianNB {
            params: GaussianNBParams {
                classes,
                class_count,
                class_prior,
                theta,
                var,
                epsilon,
            },
        })
    }
}

/// Serializable parameters for a fitted GaussianNB.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GaussianNBParams {
    /// Distinct training labels, ascending.
    pub classes: Vec<f64>,
    /// Training samples per class.
    pub class_count: Array1<f64>,
    /// Prior probability of each class.
    pub class_prior: Array1<f64>,
    /// Per-class feature means, `n_classes x n_features`.
    pub theta: Array2<f64>,
    /// Per-class feature variances (smoothing included), `n_classes x n_features`.
    pub var: Array2<f64>,
    /// Absolute amount added to the variances.
    pub epsilon: f64,
}

/// Fitted GaussianNB ready for inference.
#[derive(Clone, Debug)]
pub struct FittedGaussianNB {
    params: GaussianNBParams,
}

impl FittedGaussianNB {
    /// Per-class feature means.
    pub fn theta(&self) -> &Array2<f64> {
        &self.params.theta
    }

    /// Per-class feature variances.
    pub fn var(&self) -> &Array2<f64> {
        &self.params.var
    }

    /// Prior probability of each class.
    pub fn class_prior(&self) -> &Array1<f64> {
        &self.params.class_prior
    }

    /// Unnormalized log posterior, `n_samples x n_classes`.
    pub fn joint_log_likelihood(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        validate_predict_input(records, self.n_features_in())?;
        let p = &self.params;
        let n_classes = p.classes.len();

        // constant part per class: log prior - 0.5 * sum log(2 pi var)
        let offsets: Vec<f64> = (0..n_classes)
            .map(|c| {
                p.class_prior[c].ln()
                    - 0.5 * p.var.row(c).iter().map(|v| (2.0 * PI * v).ln()).sum::<f64>()
            })
            .collect();

        let mut jll = Array2::<f64>::zeros((records.nrows(), n_classes));
        for (i, row) in records.rows().into_iter().enumerate() {
            for c in 0..n_classes {
                jll[[i, c]] = offsets[c] - 0.5 * mahalanobis(row, p.theta.row(c), p.var.row(c));
            }
        }
        Ok(jll)
    }
}

fn mahalanobis(x: ArrayView1<f64>, mean: ArrayView1<f64>, var: ArrayView1<f64>) -> f64 {
    x.iter()
        .zip(mean.iter())
        .zip(var.iter())
        .map(|((x, m), v)| (x - m).powi(2) / v)
        .sum()
}

impl FittedClassifier for FittedGaussianNB {
    type Params = GaussianNBParams;

    fn predict(&self, records: &Array2<f64>) -> Result<Array1<f64>> {
        let jll = self.joint_log_likelihood(records)?;
        Ok(jll
            .rows()
            .into_iter()
            .map(|row| self.params.classes[argmax(row.iter().copied())])
            .collect())
    }

    fn classes(&self) -> &[f64] {
        &self.params.classes
    }

    fn n_features_in(&self) -> usize {
        self.params.theta.ncols()
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        let n_classes = params.classes.len();
        if params.theta.dim() != params.var.dim()
            || params.theta.nrows() != n_classes
            || params.class_prior.len() != n_classes
        {
            return Err(Error::InvalidShape {
                expected: format!("{} classes in every parameter", n_classes),
                got: format!(
                    "theta {:?}, var {:?}, priors {}",
                    params.theta.dim(),
                    params.var.dim(),
                    params.class_prior.len()
                ),
            });
        }
        Ok(Self { params })
    }
}

impl ProbabilisticClassifier for FittedGaussianNB {
    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        let mut jll = self.joint_log_likelihood(records)?;
        for mut row in jll.rows_mut() {
            // log-sum-exp normalization
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let log_norm = max + row.iter().map(|v| (v - max).exp()).sum::<f64>().ln();
            row.mapv_inplace(|v| (v - log_norm).exp());
        }
        Ok(jll)
    }
}
