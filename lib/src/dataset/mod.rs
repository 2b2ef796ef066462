//! Dataset abstractions for tabular classification.
//!
//! A dataset is a source of `(X, y)` pairs where `X` is a feature matrix of
//! shape `(n_samples, n_features)` and `y` is a target vector of shape
//! `(n_samples,)`. Targets are class labels stored as `f64`, exactly as they
//! were read from the input file.
//!
//! # Example
//!
//! ```rust
//! use stackforest::dataset::{Dataset, InMemoryDataset};
//!
//! let x = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
//! let y = vec![0.0, 1.0];
//! let dataset = InMemoryDataset::from_rows(x, y).unwrap();
//!
//! assert_eq!(dataset.n_samples(), 2);
//! assert_eq!(dataset.classes(), vec![0.0, 1.0]);
//! ```

use ndarray::{Array1, Array2};

pub mod delimited;
pub mod memory;
pub mod split;

pub use self::delimited::CsvLoader;
pub use self::memory::InMemoryDataset;
pub use self::split::train_test_split;

/// Abstract interface for a labelled tabular dataset.
///
/// Implementors guarantee `records().nrows() == targets().len()`.
pub trait Dataset {
    /// Feature matrix, one row per sample.
    fn records(&self) -> &Array2<f64>;

    /// Target labels aligned with [`Dataset::records`].
    fn targets(&self) -> &Array1<f64>;

    /// Build a new dataset from the rows at `indices`, in that order.
    ///
    /// Indices may repeat. Out-of-range indices panic, as with slice indexing.
    fn select(&self, indices: &[usize]) -> Self
    where
        Self: Sized;

    /// Number of samples (rows).
    fn n_samples(&self) -> usize {
        self.records().nrows()
    }

    /// Number of feature columns.
    fn n_features(&self) -> usize {
        self.records().ncols()
    }

    /// Checks whether the dataset has no samples.
    fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    /// Distinct target values in ascending order.
    fn classes(&self) -> Vec<f64> {
        unique_sorted(self.targets().iter().copied())
    }
}

/// Distinct values of `values` in ascending order.
///
/// NaN values are dropped; callers validate finiteness separately.
pub(crate) fn unique_sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}
