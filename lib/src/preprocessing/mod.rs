//! Feature transformers for the stacking pipeline.
//!
//! Transformers follow the same type-state pattern as the models in this
//! library: an unfitted value holds hyperparameters, `fit` returns a distinct
//! fitted value that can transform data and be saved to disk.
//!
//! # Core Traits
//!
//! - [`SupervisedTransformer`]: Unfitted transformer that learns from `(X, y)`
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! - [`StackingEstimator`]: Appends a classifier's class probabilities and
//!   predicted label to the input features

pub mod stacking;
pub mod traits;

pub use stacking::{FittedStackingEstimator, StackingEstimator, StackingEstimatorParams};
pub use traits::{FittedTransformer, SupervisedTransformer};
