//! Experiment configuration.
//!
//! Every field has a default equal to the exported pipeline, so a TOML file
//! only needs to name what it overrides:
//!
//! ```toml
//! [data]
//! path = "census.csv"
//! separator = ","
//!
//! [split]
//! seed = 42
//!
//! [forest]
//! n_estimators = 50
//! ```

use crate::dataset::delimited::DEFAULT_TARGET_COLUMN;
use crate::error::{Error, Result};
use crate::model::forest::RandomForestConfig;
use crate::model::naive_bayes::GaussianNBConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the table lives and how to read it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the delimited file.
    pub path: PathBuf,
    /// Column separator, a single ASCII character.
    pub separator: char,
    /// Name of the column holding class labels.
    pub target_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            separator: ',',
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
        }
    }
}

impl DataConfig {
    /// Config for `path` read with `separator`.
    pub fn new(path: impl Into<PathBuf>, separator: char) -> Self {
        Self {
            path: path.into(),
            separator,
            ..Self::default()
        }
    }

    /// The separator as the byte the CSV reader expects.
    pub fn separator_byte(&self) -> Result<u8> {
        if self.separator.is_ascii() {
            Ok(self.separator as u8)
        } else {
            Err(Error::Config(format!(
                "separator must be a single ASCII character, got {:?}",
                self.separator
            )))
        }
    }
}

/// Train/test partition settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows assigned to the testing partition, in `(0, 1)`.
    pub test_size: f64,
    /// Shuffle rows before partitioning.
    pub shuffle: bool,
    /// Seed for the shuffle; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            shuffle: true,
            seed: None,
        }
    }
}

impl SplitConfig {
    /// Set the test fraction.
    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Set the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable or disable shuffling.
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
}

/// Full description of one load -> split -> fit -> predict run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub data: DataConfig,
    pub split: SplitConfig,
    /// Auxiliary model of the stacking stage.
    pub naive_bayes: GaussianNBConfig,
    /// Final ensemble classifier.
    pub forest: RandomForestConfig,
    /// When set, also report k-fold cross-validation accuracy on the training partition.
    pub cv_folds: Option<usize>,
}

impl ExperimentConfig {
    /// Default experiment reading `path` with `separator`.
    pub fn new(path: impl Into<PathBuf>, separator: char) -> Self {
        Self {
            data: DataConfig::new(path, separator),
            ..Self::default()
        }
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject settings no stage could run with.
    pub fn validate(&self) -> Result<()> {
        self.data.separator_byte()?;
        if !(self.split.test_size > 0.0 && self.split.test_size < 1.0) {
            return Err(Error::Config(format!(
                "split.test_size must be in (0, 1), got {}",
                self.split.test_size
            )));
        }
        if let Some(k) = self.cv_folds {
            if k < 2 {
                return Err(Error::Config(format!("cv_folds must be >= 2, got {}", k)));
            }
        }
        self.naive_bayes.validate()?;
        self.forest.validate()?;
        Ok(())
    }
}
