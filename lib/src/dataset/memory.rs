use crate::dataset::Dataset;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2, Axis};

/// A fully materialized dataset: feature matrix, targets and column names.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    records: Array2<f64>,
    targets: Array1<f64>,
    feature_names: Vec<String>,
}

impl InMemoryDataset {
    /// Wrap a feature matrix and its targets.
    ///
    /// Feature names default to `x0, x1, ...`.
    pub fn new(records: Array2<f64>, targets: Array1<f64>) -> Result<Self> {
        if records.nrows() != targets.len() {
            return Err(Error::InvalidShape {
                expected: format!("{} targets", records.nrows()),
                got: format!("{} targets", targets.len()),
            });
        }
        let feature_names = (0..records.ncols()).map(|i| format!("x{}", i)).collect();
        Ok(Self {
            records,
            targets,
            feature_names,
        })
    }

    /// Build a dataset from row vectors.
    pub fn from_rows(x: Vec<Vec<f64>>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::InvalidShape {
                expected: format!("{} targets", x.len()),
                got: format!("{} targets", y.len()),
            });
        }
        if x.is_empty() {
            return Err(Error::EmptyData("dataset has no rows".to_string()));
        }
        let n_features = x[0].len();
        if !x.iter().all(|row| row.len() == n_features) {
            return Err(Error::InvalidShape {
                expected: format!("{} features in every row", n_features),
                got: "ragged rows".to_string(),
            });
        }
        let n_samples = x.len();
        let data: Vec<f64> = x.into_iter().flatten().collect();
        let records = Array2::from_shape_vec((n_samples, n_features), data).map_err(|e| {
            Error::InvalidShape {
                expected: format!("({}, {})", n_samples, n_features),
                got: e.to_string(),
            }
        })?;
        Self::new(records, Array1::from(y))
    }

    /// Replace the feature names.
    pub fn with_feature_names(mut self, names: Vec<String>) -> Result<Self> {
        if names.len() != self.records.ncols() {
            return Err(Error::FeatureMismatch {
                expected_features: self.records.ncols(),
                got_features: names.len(),
            });
        }
        self.feature_names = names;
        Ok(self)
    }

    /// Column names of the feature matrix (the target column excluded).
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Split into owned `(records, targets)`.
    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>) {
        (self.records, self.targets)
    }
}

impl Dataset for InMemoryDataset {
    fn records(&self) -> &Array2<f64> {
        &self.records
    }

    fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }
}
