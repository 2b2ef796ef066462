//! K-fold cross-validation.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::pipeline::StackingPipeline;
use crate::rng::seeded_rng;
use log::{debug, info};
use rand::seq::SliceRandom;

/// K-fold partitioning of row indices.
///
/// The first `n_samples % n_splits` folds hold one extra row.
#[derive(Clone, Debug, PartialEq)]
pub struct KFold {
    pub n_splits: usize,
    pub shuffle: bool,
    pub seed: Option<u64>,
}

impl Default for KFold {
    fn default() -> Self {
        Self {
            n_splits: 5,
            shuffle: true,
            seed: None,
        }
    }
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            ..Self::default()
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `(train, validation)` index pairs, one per fold.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if self.n_splits < 2 {
            return Err(Error::InvalidParameter(format!(
                "n_splits must be >= 2, got {}",
                self.n_splits
            )));
        }
        if n_samples < self.n_splits {
            return Err(Error::InvalidParameter(format!(
                "cannot split {} samples into {} folds",
                n_samples, self.n_splits
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        if self.shuffle {
            indices.shuffle(&mut seeded_rng(self.seed));
        }

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for k in 0..self.n_splits {
            let end = start + base + usize::from(k < extra);
            let validation = indices[start..end].to_vec();
            let train = indices[..start]
                .iter()
                .chain(&indices[end..])
                .copied()
                .collect();
            folds.push((train, validation));
            start = end;
        }
        Ok(folds)
    }
}

/// Accuracy of a freshly built pipeline on each validation fold.
///
/// `make_pipeline` is called once per fold so no state leaks between folds.
pub fn cross_val_score<D, F>(make_pipeline: F, dataset: &D, kfold: &KFold) -> Result<Vec<f64>>
where
    D: Dataset,
    F: Fn() -> StackingPipeline,
{
    let folds = kfold.split(dataset.n_samples())?;
    let mut scores = Vec::with_capacity(folds.len());
    for (k, (train_idx, valid_idx)) in folds.iter().enumerate() {
        let train = dataset.select(train_idx);
        let valid = dataset.select(valid_idx);
        let mut pipeline = make_pipeline();
        pipeline.fit(train.records(), train.targets())?;
        let score = pipeline.score(valid.records(), valid.targets())?;
        debug!("Fold {}/{}: accuracy {:.4}", k + 1, folds.len(), score);
        scores.push(score);
    }
    info!(
        "Cross-validation accuracy over {} folds: {:.4}",
        scores.len(),
        mean(&scores)
    );
    Ok(scores)
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
