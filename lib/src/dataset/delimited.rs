//! Delimited text loader.
//!
//! Reads a header row plus numeric rows, moves the target column out of the
//! feature matrix and coerces every cell to `f64`.

use crate::config::DataConfig;
use crate::dataset::InMemoryDataset;
use crate::error::{Error, Result};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use ndarray::{Array1, Array2};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Name of the target column when none is configured.
pub const DEFAULT_TARGET_COLUMN: &str = "target";

/// Loader for delimited numeric tables with a header row.
///
/// # Example
///
/// ```no_run
/// use stackforest::dataset::CsvLoader;
///
/// let dataset = CsvLoader::new("census.csv")
///     .with_separator(b'\t')
///     .with_target_column("target")
///     .load()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct CsvLoader {
    path: PathBuf,
    separator: u8,
    target_column: String,
}

impl CsvLoader {
    /// Loader for `path` with `,` as separator and `target` as target column.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            separator: b',',
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
        }
    }

    /// Loader described by a [`DataConfig`].
    ///
    /// The separator must be a single ASCII character.
    pub fn from_config(config: &DataConfig) -> Result<Self> {
        Ok(Self::new(&config.path)
            .with_separator(config.separator_byte()?)
            .with_target_column(config.target_column.clone()))
    }

    /// Set the column separator.
    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Set the name of the column holding class labels.
    pub fn with_target_column(mut self, name: impl Into<String>) -> Self {
        self.target_column = name.into();
        self
    }

    /// Read the configured file.
    ///
    /// # Errors
    /// - [`Error::Io`] if the file cannot be opened
    /// - [`Error::MissingTarget`] if the header lacks the target column
    /// - [`Error::Parse`] if a cell is not a number
    /// - [`Error::Csv`] for ragged rows
    /// - [`Error::EmptyData`] if there are no data rows
    pub fn load(&self) -> Result<InMemoryDataset> {
        info!("Loading dataset from {}", self.path.display());
        let file = File::open(&self.path)?;
        self.load_from_reader(BufReader::new(file))
    }

    /// Parse delimited text from any reader.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<InMemoryDataset> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.separator)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let target_idx = headers
            .iter()
            .position(|h| h == self.target_column)
            .ok_or_else(|| Error::MissingTarget(self.target_column.clone()))?;

        let feature_names: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != target_idx)
            .map(|(_, h)| h.to_string())
            .collect();
        let n_features = feature_names.len();

        let mut values = Vec::new();
        let mut targets = Vec::new();

        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            for (col, field) in record.iter().enumerate() {
                let value = field.parse::<f64>().map_err(|_| Error::Parse {
                    row: row + 1,
                    column: headers.get(col).unwrap_or_default().to_string(),
                    value: field.to_string(),
                })?;
                if col == target_idx {
                    targets.push(value);
                } else {
                    values.push(value);
                }
            }
        }

        let n_samples = targets.len();
        if n_samples == 0 {
            return Err(Error::EmptyData(format!(
                "{} has a header but no data rows",
                self.path.display()
            )));
        }

        let records = Array2::from_shape_vec((n_samples, n_features), values).map_err(|e| {
            Error::InvalidShape {
                expected: format!("({}, {})", n_samples, n_features),
                got: e.to_string(),
            }
        })?;

        debug!(
            "Parsed {} rows x {} features (target column '{}')",
            n_samples, n_features, self.target_column
        );

        InMemoryDataset::new(records, Array1::from(targets))?.with_feature_names(feature_names)
    }
}
