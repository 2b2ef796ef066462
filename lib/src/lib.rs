//! # stackforest
//!
//! A stacked classification pipeline for delimited numeric tables: Gaussian
//! naive Bayes augments the feature matrix with its class probabilities and
//! predicted label, then a random forest classifies the augmented rows.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: Estimators and their fitted counterparts are
//!   distinct types (`GaussianNB` vs `FittedGaussianNB`), so a model cannot be
//!   asked to predict before it has been trained.
//! - **Explicit Randomness**: every random choice (split, bootstrap, feature
//!   sampling) takes an optional seed; seeded runs are reproducible.
//! - **Serializable State**: fitted models expose plain parameter structs that
//!   round-trip through `bincode`.
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::{Array1, Array2};
//! use stackforest::dataset::{train_test_split, Dataset, InMemoryDataset};
//! use stackforest::{GaussianNBConfig, RandomForestConfig, SplitConfig, StackingPipeline};
//!
//! let records = Array2::from_shape_fn((40, 2), |(i, j)| ((i % 2) * 4 + (i + j) % 3) as f64);
//! let targets = Array1::from_shape_fn(40, |i| (i % 2) as f64);
//! let data = InMemoryDataset::new(records, targets).unwrap();
//!
//! let (train, test) = train_test_split(&data, &SplitConfig::default().with_seed(42)).unwrap();
//!
//! let forest = RandomForestConfig { n_estimators: 10, seed: Some(0), ..Default::default() };
//! let mut pipeline = StackingPipeline::new(GaussianNBConfig::default(), forest);
//! pipeline.fit(train.records(), train.targets()).unwrap();
//!
//! let predictions = pipeline.predict(test.records()).unwrap();
//! assert_eq!(predictions.len(), test.n_samples());
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: Delimited file loading, in-memory datasets, train/test split
//! - `model`: Gaussian naive Bayes, decision trees and random forests
//! - `preprocessing`: The stacking transformer
//! - `pipeline`: The two-stage `StackingPipeline`
//! - `metrics` / `model_selection`: Accuracy, confusion matrix, k-fold CV
//! - `config` / `runner`: TOML experiment configuration and the end-to-end run
//! - `serialization`: Parameter persistence

/// Experiment configuration loaded from TOML.
pub mod config;

/// Data loading utilities and dataset abstractions.
pub mod dataset;

pub mod error;

/// Classification metrics.
pub mod metrics;

/// Classifiers with compile-time fitted/unfitted separation.
pub mod model;

/// Cross-validation helpers.
pub mod model_selection;

pub mod pipeline;

/// Feature transformers for the stacking stage.
pub mod preprocessing;

pub mod rng;

/// End-to-end experiment runner.
pub mod runner;

/// Model persistence utilities.
pub mod serialization;

pub use config::{DataConfig, ExperimentConfig, SplitConfig};
pub use error::{Error, Result};
pub use model::{GaussianNBConfig, RandomForestConfig};
pub use pipeline::StackingPipeline;
pub use runner::{run_experiment, RunReport};
