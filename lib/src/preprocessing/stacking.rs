//! Stacking feature augmentation.
//!
//! [`StackingEstimator`] wraps a probabilistic classifier and turns it into a
//! transformer: after fitting the wrapped model on `(X, y)`, `transform(X)`
//! returns the original columns followed by the model's class probabilities
//! (one column per class, ascending label order) and finally its predicted
//! label. Output width is `n_features + n_classes + 1`.

use crate::error::{Error, Result};
use crate::model::{Classifier, FittedClassifier, ProbabilisticClassifier};
use crate::preprocessing::traits::{FittedTransformer, SupervisedTransformer};
use log::debug;
use ndarray::{concatenate, Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Unfitted stacking stage around classifier `C`.
#[derive(Clone, Debug, Default)]
pub struct StackingEstimator<C> {
    estimator: C,
}

impl<C> StackingEstimator<C> {
    pub fn new(estimator: C) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &C {
        &self.estimator
    }
}

impl<C> SupervisedTransformer for StackingEstimator<C>
where
    C: Classifier,
    C::Fitted: ProbabilisticClassifier,
{
    type Fitted = FittedStackingEstimator<C::Fitted>;

    fn fit(&self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<Self::Fitted> {
        let estimator = self.estimator.fit(records, targets)?;
        debug!(
            "Stacking stage fitted: {} features + {} class probabilities + 1 prediction",
            records.ncols(),
            estimator.classes().len()
        );
        Ok(FittedStackingEstimator { estimator })
    }
}

/// Serializable parameters of a fitted stacking stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StackingEstimatorParams<P> {
    pub estimator: P,
}

/// Fitted stacking stage.
#[derive(Clone, Debug)]
pub struct FittedStackingEstimator<F> {
    estimator: F,
}

impl<F: ProbabilisticClassifier> FittedStackingEstimator<F> {
    /// The wrapped fitted classifier.
    pub fn estimator(&self) -> &F {
        &self.estimator
    }
}

impl<F> FittedTransformer for FittedStackingEstimator<F>
where
    F: ProbabilisticClassifier,
{
    type Params = StackingEstimatorParams<F::Params>;

    fn transform(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        let proba = self.estimator.predict_proba(records)?;
        if let Some(((row, col), value)) = proba.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::Numerical(format!(
                "stacked probability for class {} is {} at row {}",
                self.estimator.classes()[col],
                value,
                row
            )));
        }
        let predicted = self.estimator.predict(records)?.insert_axis(Axis(1));
        concatenate(
            Axis(1),
            &[records.view(), proba.view(), predicted.view()],
        )
        .map_err(|e| Error::InvalidShape {
            expected: format!("{} aligned rows", records.nrows()),
            got: e.to_string(),
        })
    }

    fn n_features_in(&self) -> usize {
        self.estimator.n_features_in()
    }

    fn n_features_out(&self) -> usize {
        self.estimator.n_features_in() + self.estimator.classes().len() + 1
    }

    fn extract_params(&self) -> Self::Params {
        StackingEstimatorParams {
            estimator: self.estimator.extract_params(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        Ok(Self {
            estimator: F::from_params(params.estimator)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FittedGaussianNB, GaussianNB};
    use ndarray::{array, s};

    fn data() -> (Array2<f64>, Array1<f64>) {
        let x = array![
            [0.0, 1.0, 2.0],
            [0.5, 1.5, 2.5],
            [0.2, 0.8, 2.2],
            [6.0, 7.0, 8.0],
            [6.5, 7.5, 8.5],
            [6.2, 6.8, 8.1]
        ];
        let y = array![3.0, 3.0, 3.0, 7.0, 7.0, 7.0];
        (x, y)
    }

    #[test]
    fn test_output_layout() {
        let (x, y) = data();
        let fitted = StackingEstimator::new(GaussianNB::new()).fit(&x, &y).unwrap();
        let out = fitted.transform(&x).unwrap();

        assert_eq!(out.dim(), (6, 3 + 2 + 1));
        assert_eq!(fitted.n_features_out(), 6);
        assert_eq!(out.slice(s![.., ..3]), x);

        let proba = fitted.estimator().predict_proba(&x).unwrap();
        assert_eq!(out.slice(s![.., 3..5]), proba);
        assert_eq!(out.column(5), fitted.estimator().predict(&x).unwrap());
    }

    #[test]
    fn test_predicted_column_holds_labels() {
        let (x, y) = data();
        let out = StackingEstimator::new(GaussianNB::new())
            .fit_transform(&x, &y)
            .unwrap();
        assert!(out.column(5).iter().all(|v| *v == 3.0 || *v == 7.0));
        for row in out.rows() {
            assert!((row[3] + row[4] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_transform_rejects_wrong_width() {
        let (x, y) = data();
        let fitted = StackingEstimator::new(GaussianNB::new()).fit(&x, &y).unwrap();
        assert!(matches!(
            fitted.transform(&array![[1.0, 2.0]]),
            Err(Error::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let (x, y) = data();
        let fitted = StackingEstimator::new(GaussianNB::new()).fit(&x, &y).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stacking.bin");
        fitted.save_to_file(&path).unwrap();

        let loaded = FittedStackingEstimator::<FittedGaussianNB>::load_from_file(&path).unwrap();
        assert_eq!(loaded.transform(&x).unwrap(), fitted.transform(&x).unwrap());
    }
}
