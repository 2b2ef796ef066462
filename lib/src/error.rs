//! Error types shared by every stage of the pipeline.

use thiserror::Error;

/// Error type for loading, fitting and inference.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading input or model files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input (ragged rows, invalid UTF-8, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A cell could not be coerced to `f64`.
    #[error("Parse error at row {row}, column '{column}': cannot parse {value:?} as f64")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// The configured target column is absent from the header.
    #[error("Missing target column '{0}'")]
    MissingTarget(String),

    /// Empty data provided where non-empty was required.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Shape mismatch between expected and actual array dimensions.
    #[error("Invalid shape: expected {expected}, got {got}")]
    InvalidShape { expected: String, got: String },

    /// Feature dimension mismatch.
    #[error("Feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    /// Invalid hyperparameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Non-finite input or intermediate values.
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// A stage was used for inference before `fit`.
    #[error("{0} is not fitted; call fit before transform or predict")]
    NotFitted(&'static str),

    /// Serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid experiment configuration.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
