//! Core traits for feature transformers.
//!
//! This module defines the two central traits:
//! - [`SupervisedTransformer`]: Used during fitting; has hyperparameters and learns from labelled data.
//! - [`FittedTransformer`]: After fitting; ready for inference and serialization.

use crate::error::Result;
use crate::serialization::{load_params, save_params, SerializableParams};
use ndarray::{Array1, Array2};
use std::path::Path;

/// Trait for unfitted transformers that learn from features and labels.
///
/// # Example
/// ```
/// use ndarray::array;
/// use stackforest::model::GaussianNB;
/// use stackforest::preprocessing::{FittedTransformer, StackingEstimator, SupervisedTransformer};
///
/// let x = array![[0.0, 1.0], [0.2, 0.9], [5.0, 6.0], [5.1, 6.2]];
/// let y = array![0.0, 0.0, 1.0, 1.0];
/// let fitted = StackingEstimator::new(GaussianNB::new()).fit(&x, &y).unwrap();
/// let augmented = fitted.transform(&x).unwrap();
/// assert_eq!(augmented.ncols(), 2 + 2 + 1);
/// ```
pub trait SupervisedTransformer: Clone {
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`crate::Error`] if:
    /// - Data is empty
    /// - Data contains invalid values (NaN, Inf)
    /// - Row count and target length differ
    fn fit(&self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<Self::Fitted>;

    /// Fit the transformer and transform the training data in one step.
    fn fit_transform(&self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<Array2<f64>> {
        self.fit(records, targets)?.transform(records)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `transform` output always has `n_features_out()` columns.
pub trait FittedTransformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`crate::Error`] if:
    /// - Input shape doesn't match expected number of features
    /// - Input or output contains invalid values
    fn transform(&self, records: &Array2<f64>) -> Result<Array2<f64>>;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Returns the number of columns `transform` produces.
    fn n_features_out(&self) -> usize;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        save_params(&self.extract_params(), path)
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        Self::from_params(load_params(path)?)
    }
}
