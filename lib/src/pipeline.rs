//! Two-stage stacking pipeline.
//!
//! [`StackingPipeline`] chains a [`StackingEstimator`] around Gaussian naive
//! Bayes with a random forest:
//!
//! ```text
//! X --stacking--> [X | P(class) | predicted] --forest--> labels
//! ```
//!
//! Fitting trains the augmentor on `(X, y)`, augments `X` with it and fits the
//! forest on the augmented matrix. Inference repeats the same transform before
//! asking the forest.

use crate::config::ExperimentConfig;
use crate::error::{Error, Result};
use crate::metrics::accuracy_score;
use crate::model::forest::RandomForestParams;
use crate::model::naive_bayes::GaussianNBParams;
use crate::model::{
    Classifier, FittedClassifier, FittedGaussianNB, FittedRandomForest, GaussianNB,
    GaussianNBConfig, ProbabilisticClassifier, RandomForestClassifier, RandomForestConfig,
};
use crate::preprocessing::{
    FittedStackingEstimator, FittedTransformer, StackingEstimator, StackingEstimatorParams,
    SupervisedTransformer,
};
use crate::serialization::{load_params, save_params};
use log::info;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Stage names in execution order.
pub const STEP_NAMES: [&str; 2] = ["stackingestimator", "randomforestclassifier"];

#[derive(Clone, Debug)]
struct FittedStages {
    augmentor: FittedStackingEstimator<FittedGaussianNB>,
    classifier: FittedRandomForest,
}

/// Serializable parameters of a fitted pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StackingPipelineParams {
    pub augmentor: StackingEstimatorParams<GaussianNBParams>,
    pub classifier: RandomForestParams,
}

/// Stacking augmentor followed by a random forest.
#[derive(Clone, Debug, Default)]
pub struct StackingPipeline {
    augmentor: StackingEstimator<GaussianNB>,
    classifier: RandomForestClassifier,
    fitted: Option<FittedStages>,
}

impl StackingPipeline {
    /// Unfitted pipeline with the given stage configurations.
    pub fn new(naive_bayes: GaussianNBConfig, forest: RandomForestConfig) -> Self {
        Self {
            augmentor: StackingEstimator::new(GaussianNB::from_config(naive_bayes)),
            classifier: RandomForestClassifier::from_config(forest),
            fitted: None,
        }
    }

    /// Unfitted pipeline using the model sections of an experiment config.
    pub fn from_config(config: &ExperimentConfig) -> Self {
        Self::new(config.naive_bayes.clone(), config.forest.clone())
    }

    pub fn step_names(&self) -> &'static [&'static str] {
        &STEP_NAMES
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Fit both stages; refitting replaces any previous state, and a failed
    /// refit leaves the pipeline unfitted.
    pub fn fit(&mut self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<&mut Self> {
        info!(
            "Fitting pipeline on {} rows x {} features",
            records.nrows(),
            records.ncols()
        );
        self.fitted = None;
        let augmentor = self.augmentor.fit(records, targets)?;
        let augmented = augmentor.transform(records)?;
        let classifier = self.classifier.fit(&augmented, targets)?;
        info!(
            "Pipeline fitted: {} augmented features, {} trees, {} classes",
            augmented.ncols(),
            classifier.n_estimators(),
            classifier.classes().len()
        );
        self.fitted = Some(FittedStages {
            augmentor,
            classifier,
        });
        Ok(self)
    }

    fn stages(&self) -> Result<&FittedStages> {
        self.fitted.as_ref().ok_or(Error::NotFitted("StackingPipeline"))
    }

    /// Output of the stacking stage: original features plus the augmented columns.
    pub fn transform(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        self.stages()?.augmentor.transform(records)
    }

    /// One predicted label per row.
    pub fn predict(&self, records: &Array2<f64>) -> Result<Array1<f64>> {
        let stages = self.stages()?;
        let augmented = stages.augmentor.transform(records)?;
        let predictions = stages.classifier.predict(&augmented)?;
        info!("Predicted {} rows", predictions.len());
        Ok(predictions)
    }

    /// Averaged forest class probabilities; columns follow [`Self::classes`].
    pub fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        let stages = self.stages()?;
        let augmented = stages.augmentor.transform(records)?;
        stages.classifier.predict_proba(&augmented)
    }

    /// Accuracy of `predict(records)` against `targets`.
    pub fn score(&self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<f64> {
        accuracy_score(targets, &self.predict(records)?)
    }

    /// Training labels in ascending order.
    pub fn classes(&self) -> Result<&[f64]> {
        Ok(self.stages()?.classifier.classes())
    }

    /// The fitted forest, e.g. for feature importances.
    pub fn forest(&self) -> Result<&FittedRandomForest> {
        Ok(&self.stages()?.classifier)
    }

    pub fn extract_params(&self) -> Result<StackingPipelineParams> {
        let stages = self.stages()?;
        Ok(StackingPipelineParams {
            augmentor: stages.augmentor.extract_params(),
            classifier: stages.classifier.extract_params(),
        })
    }

    /// Rebuild a fitted pipeline. Hyperparameters are left at their defaults;
    /// only the learned state is restored.
    pub fn from_params(params: StackingPipelineParams) -> Result<Self> {
        let augmentor = FittedStackingEstimator::from_params(params.augmentor)?;
        let classifier = FittedRandomForest::from_params(params.classifier)?;
        if classifier.n_features_in() != augmentor.n_features_out() {
            return Err(Error::FeatureMismatch {
                expected_features: augmentor.n_features_out(),
                got_features: classifier.n_features_in(),
            });
        }
        Ok(Self {
            fitted: Some(FittedStages {
                augmentor,
                classifier,
            }),
            ..Self::default()
        })
    }

    /// Save both fitted stages to a file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save_params(&self.extract_params()?, path)?;
        Ok(())
    }

    /// Load a pipeline written by [`Self::save_to_file`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_params(load_params(path)?)
    }
}
