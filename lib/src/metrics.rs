//! Classification metrics.

use crate::dataset::unique_sorted;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use std::fmt;

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(Error::InvalidShape {
            expected: format!("{} predictions", y_true.len()),
            got: format!("{} predictions", y_pred.len()),
        });
    }
    if y_true.is_empty() {
        return Err(Error::EmptyData("no labels to score".to_string()));
    }
    Ok(())
}

/// Fraction of predictions equal to the true label.
///
/// # Errors
/// [`Error::InvalidShape`] on length mismatch, [`Error::EmptyData`] when both are empty.
pub fn accuracy_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Counts of (true, predicted) label pairs.
///
/// `counts[[i, j]]` is the number of samples with true label `labels[i]`
/// predicted as `labels[j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix {
    labels: Vec<f64>,
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    /// Build from true and predicted labels; the label set is the union of both, ascending.
    pub fn new(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        check_lengths(y_true, y_pred)?;
        let labels = unique_sorted(y_true.iter().chain(y_pred.iter()).copied());
        let index = |v: &f64| labels.binary_search_by(|l| l.total_cmp(v));

        let mut counts = Array2::<usize>::zeros((labels.len(), labels.len()));
        for (t, p) in y_true.iter().zip(y_pred.iter()) {
            if let (Ok(i), Ok(j)) = (index(t), index(p)) {
                counts[[i, j]] += 1;
            }
        }
        Ok(Self { labels, counts })
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.counts.sum();
        if total == 0 {
            return 0.0;
        }
        self.counts.diag().sum() as f64 / total as f64
    }

    /// Recall per label (`0.0` for labels never seen as truth).
    pub fn recall(&self) -> Vec<f64> {
        self.counts
            .rows()
            .into_iter()
            .enumerate()
            .map(|(i, row)| ratio(row[i], row.sum()))
            .collect()
    }

    /// Precision per label (`0.0` for labels never predicted).
    pub fn precision(&self) -> Vec<f64> {
        self.counts
            .columns()
            .into_iter()
            .enumerate()
            .map(|(j, col)| ratio(col[j], col.sum()))
            .collect()
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>10}", "true\\pred")?;
        for label in &self.labels {
            write!(f, "{:>8}", label)?;
        }
        writeln!(f)?;
        for (label, row) in self.labels.iter().zip(self.counts.rows()) {
            write!(f, "{:>10}", label)?;
            for c in row {
                write!(f, "{:>8}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
