//! Random forest classifier.
//!
//! An ensemble of CART trees, each grown on a bootstrap resample of the
//! training rows with a random feature subset considered at every split.
//! Every tree receives its own seed drawn from the forest seed up front, so a
//! seeded forest is identical whether trees are grown sequentially or in
//! parallel (feature `parallel`).

use crate::dataset::unique_sorted;
use crate::error::{Error, Result};
use crate::model::tree::{Criterion, DecisionTreeConfig, MaxFeatures, Tree, TreeBuilder};
use crate::model::{
    argmax, encode_labels, validate_fit_input, validate_predict_input, Classifier,
    FittedClassifier, ProbabilisticClassifier,
};
use crate::rng::seeded_rng;
use log::debug;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How tree outputs are combined into one label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voting {
    /// Each tree votes for its leaf's majority class; ties go to the smallest label.
    Majority,
    /// Argmax of the averaged leaf distributions.
    Probability,
}

/// Hyperparameters of [`RandomForestClassifier`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestConfig {
    pub n_estimators: usize,
    pub criterion: Criterion,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
    /// Grow each tree on a bootstrap resample instead of the full training set.
    pub bootstrap: bool,
    pub voting: Voting,
    /// Seed for resampling and feature sampling; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for RandomForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            criterion: Criterion::Gini,
            max_depth: None,
            min_samples_split: 11,
            min_samples_leaf: 1,
            // The exported pipeline's literal, i.e. `0.1 + 0.2`.
            max_features: MaxFeatures::Fraction(0.30000000000000004),
            bootstrap: true,
            voting: Voting::Majority,
            seed: None,
        }
    }
}

impl RandomForestConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(Error::InvalidParameter(
                "n_estimators must be positive".to_string(),
            ));
        }
        self.tree_config().validate()
    }

    fn tree_config(&self) -> DecisionTreeConfig {
        DecisionTreeConfig {
            criterion: self.criterion,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
            seed: None,
        }
    }
}

/// Random forest classifier (unfitted).
#[derive(Clone, Debug, Default)]
pub struct RandomForestClassifier {
    config: RandomForestConfig,
}

impl RandomForestClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: RandomForestConfig) -> Self {
        Self { config }
    }

    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.config.n_estimators = n_estimators;
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.config.criterion = criterion;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.config.min_samples_split = min_samples_split;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples_leaf: usize) -> Self {
        self.config.min_samples_leaf = min_samples_leaf;
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.config.max_features = max_features;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.config.bootstrap = bootstrap;
        self
    }

    pub fn with_voting(mut self, voting: Voting) -> Self {
        self.config.voting = voting;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn config(&self) -> &RandomForestConfig {
        &self.config
    }
}

/// Grow one tree from its own seed.
fn grow_tree(
    records: &Array2<f64>,
    labels: &[usize],
    n_classes: usize,
    config: &DecisionTreeConfig,
    bootstrap: bool,
    seed: u64,
) -> Tree {
    let n = records.nrows();
    let mut rng = StdRng::seed_from_u64(seed);

    let weights = if bootstrap {
        let mut counts = vec![0.0; n];
        for _ in 0..n {
            counts[rng.gen_range(0..n)] += 1.0;
        }
        counts
    } else {
        vec![1.0; n]
    };
    let rows: Vec<usize> = (0..n).filter(|&i| weights[i] > 0.0).collect();

    TreeBuilder::new(records, labels, &weights, n_classes, config, rng).build(rows)
}

impl Classifier for RandomForestClassifier {
    type Fitted = FittedRandomForest;

    fn fit(&self, records: &Array2<f64>, targets: &Array1<f64>) -> Result<Self::Fitted> {
        self.config.validate()?;
        validate_fit_input(records, targets)?;

        let classes = unique_sorted(targets.iter().copied());
        let labels = encode_labels(targets, &classes);
        let n_classes = classes.len();

        let mut rng = seeded_rng(self.config.seed);
        let seeds: Vec<u64> = (0..self.config.n_estimators).map(|_| rng.gen()).collect();
        let tree_config = self.config.tree_config();
        let bootstrap = self.config.bootstrap;

        debug!(
            "Growing {} trees on {} rows x {} features, {} classes",
            seeds.len(),
            records.nrows(),
            records.ncols(),
            n_classes
        );

        #[cfg(feature = "parallel")]
        let trees: Vec<Tree> = seeds
            .par_iter()
            .map(|&seed| grow_tree(records, &labels, n_classes, &tree_config, bootstrap, seed))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let trees: Vec<Tree> = seeds
            .iter()
            .map(|&seed| grow_tree(records, &labels, n_classes, &tree_config, bootstrap, seed))
            .collect();

        debug!(
            "Forest fitted: max depth {}",
            trees.iter().map(Tree::depth).max().unwrap_or(0)
        );

        Ok(FittedRandomForest {
            params: RandomForestParams {
                classes,
                n_features: records.ncols(),
                voting: self.config.voting,
                trees,
            },
        })
    }
}

/// Serializable parameters for a fitted forest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub classes: Vec<f64>,
    pub n_features: usize,
    pub voting: Voting,
    pub trees: Vec<Tree>,
}

/// Fitted random forest ready for inference.
#[derive(Clone, Debug)]
pub struct FittedRandomForest {
    params: RandomForestParams,
}

impl FittedRandomForest {
    pub fn n_estimators(&self) -> usize {
        self.params.trees.len()
    }

    pub fn trees(&self) -> &[Tree] {
        &self.params.trees
    }

    /// Mean of the per-tree importances, normalized to sum to one.
    ///
    /// All zeros when no tree managed to split.
    pub fn feature_importances(&self) -> Array1<f64> {
        let mut total = Array1::<f64>::zeros(self.params.n_features);
        for tree in &self.params.trees {
            total += &Array1::from(tree.importances.clone());
        }
        let sum = total.sum();
        if sum > 0.0 {
            total /= sum;
        }
        total
    }

    fn majority_votes(&self, records: &Array2<f64>) -> Array1<f64> {
        let n_classes = self.params.classes.len();
        records
            .rows()
            .into_iter()
            .map(|row| {
                let mut votes = vec![0.0; n_classes];
                for tree in &self.params.trees {
                    let dist = tree.leaf_distribution(row);
                    votes[argmax(dist.iter().copied())] += 1.0;
                }
                self.params.classes[argmax(votes)]
            })
            .collect()
    }
}

impl FittedClassifier for FittedRandomForest {
    type Params = RandomForestParams;

    fn predict(&self, records: &Array2<f64>) -> Result<Array1<f64>> {
        validate_predict_input(records, self.params.n_features)?;
        match self.params.voting {
            Voting::Majority => Ok(self.majority_votes(records)),
            Voting::Probability => {
                let proba = self.predict_proba(records)?;
                Ok(proba
                    .rows()
                    .into_iter()
                    .map(|row| self.params.classes[argmax(row.iter().copied())])
                    .collect())
            }
        }
    }

    fn classes(&self) -> &[f64] {
        &self.params.classes
    }

    fn n_features_in(&self) -> usize {
        self.params.n_features
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params.trees.is_empty() {
            return Err(Error::InvalidParameter(
                "forest has no trees".to_string(),
            ));
        }
        let n_classes = params.classes.len();
        for tree in &params.trees {
            tree.validate(params.n_features, n_classes)?;
        }
        Ok(Self { params })
    }
}

impl ProbabilisticClassifier for FittedRandomForest {
    fn predict_proba(&self, records: &Array2<f64>) -> Result<Array2<f64>> {
        validate_predict_input(records, self.params.n_features)?;
        let n_classes = self.params.classes.len();
        let mut proba = Array2::<f64>::zeros((records.nrows(), n_classes));
        for (i, row) in records.rows().into_iter().enumerate() {
            let mut out = proba.row_mut(i);
            for tree in &self.params.trees {
                for (o, p) in out.iter_mut().zip(tree.leaf_distribution(row)) {
                    *o += p;
                }
            }
        }
        proba /= self.params.trees.len() as f64;
        Ok(proba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::Node;
    use ndarray::array;

    /// Two well separated clusters in the first feature, noise in the second.
    fn clusters(n_per_class: usize) -> (Array2<f64>, Array1<f64>) {
        let n = 2 * n_per_class;
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            let class = (i >= n_per_class) as usize as f64;
            if j == 0 {
                class * 10.0 + (i % n_per_class) as f64 * 0.1
            } else {
                ((i * 7) % 5) as f64
            }
        });
        let y = Array1::from_shape_fn(n, |i| if i >= n_per_class { 1.0 } else { 0.0 });
        (x, y)
    }

    #[test]
    fn test_default_config() {
        let config = RandomForestConfig::default();
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.min_samples_split, 11);
        assert_eq!(config.max_features, MaxFeatures::Fraction(0.1 + 0.2));
        assert!(config.bootstrap);
    }

    #[test]
    fn test_fit_predict_separable() {
        let (x, y) = clusters(30);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(20)
            .with_max_features(MaxFeatures::All)
            .with_seed(7)
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.n_estimators(), 20);
        assert_eq!(fitted.classes(), &[0.0, 1.0]);
        let preds = fitted.predict(&array![[0.5, 2.0], [10.5, 2.0]]).unwrap();
        assert_eq!(preds, array![0.0, 1.0]);
    }

    #[test]
    fn test_seeded_fit_is_deterministic() {
        let (x, y) = clusters(20);
        let forest = RandomForestClassifier::new().with_n_estimators(15).with_seed(11);
        let a = forest.fit(&x, &y).unwrap();
        let b = forest.fit(&x, &y).unwrap();
        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }

    #[test]
    fn test_predict_proba_rows_sum_to_one() {
        let (x, y) = clusters(15);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(10)
            .with_seed(3)
            .fit(&x, &y)
            .unwrap();
        let proba = fitted.predict_proba(&x).unwrap();
        assert_eq!(proba.dim(), (30, 2));
        for row in proba.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_probability_voting() {
        let (x, y) = clusters(15);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(10)
            .with_voting(Voting::Probability)
            .with_max_features(MaxFeatures::All)
            .with_seed(5)
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_predictions_are_training_labels() {
        let x = Array2::from_shape_fn((40, 3), |(i, j)| ((i * (j + 3)) % 11) as f64);
        let y = Array1::from_shape_fn(40, |i| [2.0, 5.0, 9.0][i % 3]);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(8)
            .with_seed(1)
            .fit(&x, &y)
            .unwrap();
        let preds = fitted.predict(&x).unwrap();
        assert!(preds.iter().all(|p| [2.0, 5.0, 9.0].contains(p)));
    }

    #[test]
    fn test_without_bootstrap_all_trees_see_all_rows() {
        let (x, y) = clusters(10);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(5)
            .with_bootstrap(false)
            .with_min_samples_split(2)
            .with_max_features(MaxFeatures::All)
            .with_seed(0)
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_feature_importances_prefer_signal() {
        let (x, y) = clusters(25);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(25)
            .with_max_features(MaxFeatures::All)
            .with_seed(2)
            .fit(&x, &y)
            .unwrap();
        let imp = fitted.feature_importances();
        assert!((imp.sum() - 1.0).abs() < 1e-9);
        assert!(imp[0] > imp[1]);
    }

    #[test]
    fn test_zero_estimators_rejected() {
        let (x, y) = clusters(5);
        let result = RandomForestClassifier::new().with_n_estimators(0).fit(&x, &y);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_feature_mismatch() {
        let (x, y) = clusters(5);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(2)
            .with_seed(0)
            .fit(&x, &y)
            .unwrap();
        assert!(matches!(
            fitted.predict(&array![[1.0]]),
            Err(Error::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let (x, y) = clusters(10);
        let fitted = RandomForestClassifier::new()
            .with_n_estimators(4)
            .with_seed(9)
            .fit(&x, &y)
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forest.bin");
        fitted.save_to_file(&path).unwrap();
        let loaded = FittedRandomForest::load_from_file(&path).unwrap();
        assert_eq!(loaded.predict(&x).unwrap(), fitted.predict(&x).unwrap());
    }

    #[test]
    fn test_trees_match_sequential_growth() {
        let (x, y) = clusters(12);
        let forest = RandomForestClassifier::new().with_n_estimators(6).with_seed(21);
        let fitted = forest.fit(&x, &y).unwrap();

        let mut rng = seeded_rng(Some(21));
        let seeds: Vec<u64> = (0..6).map(|_| rng.gen()).collect();
        let labels = encode_labels(&y, fitted.classes());
        let tree_config = forest.config().tree_config();
        for (tree, &seed) in fitted.trees().iter().zip(&seeds) {
            assert_eq!(*tree, grow_tree(&x, &labels, 2, &tree_config, true, seed));
        }
    }

    fn one_tree_params() -> RandomForestParams {
        let (x, y) = clusters(6);
        RandomForestClassifier::new()
            .with_n_estimators(1)
            .with_seed(4)
            .fit(&x, &y)
            .unwrap()
            .extract_params()
    }

    #[test]
    fn test_from_params_rejects_bad_feature_index() {
        let mut params = one_tree_params();
        params.trees[0].nodes = vec![
            Node::Split {
                feature: 99,
                threshold: 0.0,
                left: 1,
                right: 2,
            },
            Node::Leaf {
                distribution: vec![1.0, 0.0],
            },
            Node::Leaf {
                distribution: vec![0.0, 1.0],
            },
        ];
        assert!(matches!(
            FittedRandomForest::from_params(params),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_params_rejects_wrong_leaf_width() {
        let mut params = one_tree_params();
        params.trees[0].nodes = vec![Node::Leaf {
            distribution: vec![0.2, 0.3, 0.5],
        }];
        assert!(matches!(
            FittedRandomForest::from_params(params),
            Err(Error::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_from_params_rejects_self_loop() {
        let mut params = one_tree_params();
        params.trees[0].nodes = vec![Node::Split {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
        }];
        assert!(matches!(
            FittedRandomForest::from_params(params),
            Err(Error::InvalidParameter(_))
        ));
    }
}
