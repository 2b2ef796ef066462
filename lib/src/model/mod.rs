//! Classifiers with a strict split between configuration and fitted state.
//!
//! An unfitted estimator ([`Classifier`]) holds only hyperparameters. Calling
//! `fit` consumes training data and returns a separate fitted type
//! ([`FittedClassifier`]) that holds only what inference needs. There is no
//! way to call `predict` on an estimator that has not been fitted.
//!
//! Labels are `f64` values as read from the input table. Internally every
//! fitted classifier keeps its distinct training labels in ascending order
//! (`classes()`); probability columns follow that order.

use crate::error::{Error, Result};
use crate::serialization::{load_params, save_params};
use ndarray::{Array1, Array2};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

pub mod forest;
pub mod naive_bayes;
pub mod tree;

pub use forest::{FittedRandomForest, RandomForestClassifier, RandomForestConfig, Voting};
pub use naive_bayes::{FittedGaussianNB, GaussianNB, GaussianNBConfig};
pub use tree::{Criterion, DecisionTreeClassifier, DecisionTreeConfig, FittedDecisionTree, MaxFeatures};

/// Unfitted classifier: hyperparameters plus a `fit` entry point.
pub trait Classifier: Clone {
    /// The fitted classifier produced by [`Classifier::fit`].
    type Fitted: FittedClassifier;

    /// Learn from `records` (`n_samples x n_features`) and `targets` (`n_samples`).
    ///
    /// # Errors
    /// Returns [`Error`] if:
    /// - Data is empty
    /// - Row count and target length differ
    /// - Data contains NaN or infinite values
    /// - A hyperparameter is out of range
    fn fit(&self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<Self::Fitted>;
}

/// Fitted classifier ready for inference and serialization.
///
/// # Guarantees
/// - Every value returned by `predict` is one of `classes()`.
/// - `extract_params()` + `from_params()` is a round-trip.
pub trait FittedClassifier: Clone {
    /// Serializable representation of learned parameters.
    type Params: Serialize + DeserializeOwned;

    /// One label per input row.
    fn predict(&self, records: &Array2<f64>) -> Result<Array1<f64>>;

    /// Distinct training labels in ascending order.
    fn classes(&self) -> &[f64];

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted classifier from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted classifier to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        save_params(&self.extract_params(), path)
    }

    /// Load a fitted classifier from a file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        Self::from_params(load_params(path)?)
    }
}

/// Fitted classifier that can also estimate class membership probabilities.
pub trait ProbabilisticClassifier: FittedClassifier {
    /// `n_samples x n_classes` matrix; column `j` is the probability of `classes()[j]`.
    /// Rows sum to one.
    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>>;
}

/// Shared input checks for every `fit`.
pub(crate) fn validate_fit_input(records: &Array2<f64>, targets: &Array1<f64>) -> Result<()> {
    let (rows, _) = records.dim();
    if rows == 0 {
        return Err(Error::EmptyData("cannot fit on zero samples".to_string()));
    }
    if records.ncols() == 0 {
        return Err(Error::EmptyData("cannot fit on zero features".to_string()));
    }
    if rows != targets.len() {
        return Err(Error::InvalidShape {
            expected: format!("{} targets", rows),
            got: format!("{} targets", targets.len()),
        });
    }
    check_finite(records, "training features")?;
    if !targets.iter().all(|v| v.is_finite()) {
        return Err(Error::Numerical(
            "training targets contain NaN or infinity".to_string(),
        ));
    }
    Ok(())
}

/// Shared input checks for every `predict`.
pub(crate) fn validate_predict_input(records: &Array2<f64>, n_features: usize) -> Result<()> {
    if records.ncols() != n_features {
        return Err(Error::FeatureMismatch {
            expected_features: n_features,
            got_features: records.ncols(),
        });
    }
    check_finite(records, "input features")
}

fn check_finite(records: &Array2<f64>, what: &str) -> Result<()> {
    if let Some(((row, col), value)) = records.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(Error::Numerical(format!(
            "{} contain {} at row {}, column {}",
            what, value, row, col
        )));
    }
    Ok(())
}

/// Map each label to its position in `classes` (ascending, distinct).
pub(crate) fn encode_labels(targets: &Array1<f64>, classes: &[f64]) -> Vec<usize> {
    targets
        .iter()
        .map(|t| {
            classes
                .binary_search_by(|c| c.total_cmp(t))
                .unwrap_or_default()
        })
        .collect()
}

/// Index of the largest value; ties go to the lowest index.
pub(crate) fn argmax(values: impl IntoIterator<Item = f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, v) in values.into_iter().enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}
