//! End-to-end experiment: load, split, fit, predict.

use crate::config::ExperimentConfig;
use crate::dataset::{train_test_split, CsvLoader, Dataset};
use crate::error::Result;
use crate::metrics::accuracy_score;
use crate::model_selection::{cross_val_score, mean, KFold};
use crate::pipeline::StackingPipeline;
use log::info;
use serde::Serialize;

/// Outcome of [`run_experiment`].
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub n_train: usize,
    pub n_test: usize,
    pub n_features: usize,
    /// Distinct training labels, ascending.
    pub classes: Vec<f64>,
    /// One label per testing row, in testing-partition order.
    pub predictions: Vec<f64>,
    pub test_accuracy: f64,
    /// Per-fold accuracies on the training partition, when `cv_folds` is set.
    pub cv_scores: Option<Vec<f64>>,
    pub cv_mean: Option<f64>,
    /// Normalized forest importances over the augmented feature matrix.
    pub feature_importances: Vec<f64>,
}

/// Run the configured experiment.
///
/// # Errors
/// Any loading, splitting, fitting or inference error, unchanged.
pub fn run_experiment(config: &ExperimentConfig) -> Result<RunReport> {
    config.validate()?;

    let dataset = CsvLoader::from_config(&config.data)?.load()?;
    let (train, test) = train_test_split(&dataset, &config.split)?;

    let (cv_scores, cv_mean) = match config.cv_folds {
        Some(k) => {
            let mut kfold = KFold::new(k);
            kfold.seed = config.split.seed;
            let scores = cross_val_score(|| StackingPipeline::from_config(config), &train, &kfold)?;
            let m = mean(&scores);
            (Some(scores), Some(m))
        }
        None => (None, None),
    };

    let mut pipeline = StackingPipeline::from_config(config);
    pipeline.fit(train.records(), train.targets())?;
    let predictions = pipeline.predict(test.records())?;
    let test_accuracy = accuracy_score(test.targets(), &predictions)?;

    info!(
        "Test accuracy {:.4} on {} rows",
        test_accuracy,
        test.n_samples()
    );

    Ok(RunReport {
        n_train: train.n_samples(),
        n_test: test.n_samples(),
        n_features: dataset.n_features(),
        classes: pipeline.classes()?.to_vec(),
        predictions: predictions.to_vec(),
        test_accuracy,
        cv_scores,
        cv_mean,
        feature_importances: pipeline.forest()?.feature_importances().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    fn write_table(sep: char) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "age{sep}hours{sep}target").unwrap();
        for i in 0..100 {
            let class = i % 2;
            let age = 20 + class * 30 + (i * 7) % 9;
            let hours = 35 + (i * 3) % 11;
            writeln!(file, "{age}{sep}{hours}{sep}{class}").unwrap();
        }
        file
    }

    fn quick_config(path: &std::path::Path, sep: char) -> ExperimentConfig {
        let mut config = ExperimentConfig::new(path, sep);
        config.split.seed = Some(42);
        config.forest.n_estimators = 10;
        config.forest.seed = Some(0);
        config
    }

    #[test]
    fn test_run_on_hundred_rows() {
        let file = write_table(',');
        let report = run_experiment(&quick_config(file.path(), ',')).unwrap();

        assert_eq!(report.n_train, 75);
        assert_eq!(report.n_test, 25);
        assert_eq!(report.n_features, 2);
        assert_eq!(report.classes, vec![0.0, 1.0]);
        assert_eq!(report.predictions.len(), 25);
        assert!(report.predictions.iter().all(|p| *p == 0.0 || *p == 1.0));
        assert!(report.cv_scores.is_none());
        assert_eq!(report.feature_importances.len(), 2 + 2 + 1);
    }

    #[test]
    fn test_tab_separated_with_cross_validation() {
        let file = write_table('\t');
        let mut config = quick_config(file.path(), '\t');
        config.cv_folds = Some(3);
        let report = run_experiment(&config).unwrap();

        let scores = report.cv_scores.unwrap();
        assert_eq!(scores.len(), 3);
        assert!(report.cv_mean.unwrap() > 0.8);
    }

    #[test]
    fn test_same_seeds_same_predictions() {
        let file = write_table(',');
        let config = quick_config(file.path(), ',');
        let a = run_experiment(&config).unwrap();
        let b = run_experiment(&config).unwrap();
        assert_eq!(a.predictions, b.predictions);
    }

    #[test]
    fn test_missing_file() {
        let config = ExperimentConfig::new("/no/such/table.csv", ',');
        assert!(matches!(run_experiment(&config), Err(Error::Io(_))));
    }

    #[test]
    fn test_report_serializes() {
        let file = write_table(',');
        let report = run_experiment(&quick_config(file.path(), ',')).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["n_test"], 25);
        assert!(json["cv_scores"].is_null());
    }
}
