//! Random train/test partitioning.

use crate::config::SplitConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::rng::seeded_rng;
use log::info;
use rand::seq::SliceRandom;

/// Number of `(train, test)` rows for `n_samples` at `test_size`.
///
/// The test side is rounded up, so a 0.25 split of 10 rows gives 7/3.
pub fn split_sizes(n_samples: usize, test_size: f64) -> Result<(usize, usize)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    let n_test = (test_size * n_samples as f64).ceil() as usize;
    let n_train = n_samples.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(Error::InvalidParameter(format!(
            "test_size={} with {} samples leaves an empty partition",
            test_size, n_samples
        )));
    }
    Ok((n_train, n_test))
}

/// Partition `dataset` into disjoint `(train, test)` subsets.
///
/// Row indices are permuted with the configured seed; the first `n_test`
/// permuted rows form the test set and the rest the training set. With
/// `shuffle = false` the test set is the tail of the table.
pub fn train_test_split<D: Dataset>(dataset: &D, config: &SplitConfig) -> Result<(D, D)> {
    let n_samples = dataset.n_samples();
    let (n_train, n_test) = split_sizes(n_samples, config.test_size)?;

    let (train_idx, test_idx) = if config.shuffle {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = seeded_rng(config.seed);
        indices.shuffle(&mut rng);
        let (test, train) = indices.split_at(n_test);
        (train.to_vec(), test.to_vec())
    } else {
        ((0..n_train).collect::<Vec<_>>(), (n_train..n_samples).collect())
    };

    info!(
        "Split {} rows into {} train / {} test (seed: {:?})",
        n_samples, n_train, n_test, config.seed
    );

    Ok((dataset.select(&train_idx), dataset.select(&test_idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::InMemoryDataset;
    use ndarray::{Array1, Array2};
    use std::collections::HashSet;

    fn numbered(n: usize) -> InMemoryDataset {
        let records = Array2::from_shape_fn((n, 2), |(i, j)| (i * 10 + j) as f64);
        let targets = Array1::from_shape_fn(n, |i| i as f64);
        InMemoryDataset::new(records, targets).unwrap()
    }

    #[test]
    fn test_default_proportion() {
        let ds = numbered(100);
        let (train, test) = train_test_split(&ds, &SplitConfig::default().with_seed(1)).unwrap();
        assert_eq!(train.n_samples(), 75);
        assert_eq!(test.n_samples(), 25);
    }

    #[test]
    fn test_test_side_rounds_up() {
        assert_eq!(split_sizes(10, 0.25).unwrap(), (7, 3));
        assert_eq!(split_sizes(4, 0.25).unwrap(), (3, 1));
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let ds = numbered(40);
        let (train, test) = train_test_split(&ds, &SplitConfig::default().with_seed(9)).unwrap();
        let train_ids: HashSet<u64> = train.targets().iter().map(|v| *v as u64).collect();
        let test_ids: HashSet<u64> = test.targets().iter().map(|v| *v as u64).collect();
        assert!(train_ids.is_disjoint(&test_ids));
        assert_eq!(train_ids.len() + test_ids.len(), 40);
    }

    #[test]
    fn test_rows_stay_aligned_with_targets() {
        let ds = numbered(20);
        let (train, _) = train_test_split(&ds, &SplitConfig::default().with_seed(3)).unwrap();
        for (row, target) in train.records().rows().into_iter().zip(train.targets()) {
            assert_eq!(row[0], target * 10.0);
        }
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let ds = numbered(50);
        let config = SplitConfig::default().with_seed(1234);
        let (a, _) = train_test_split(&ds, &config).unwrap();
        let (b, _) = train_test_split(&ds, &config).unwrap();
        assert_eq!(a.targets(), b.targets());
    }

    #[test]
    fn test_no_shuffle_takes_tail() {
        let ds = numbered(8);
        let config = SplitConfig::default().with_shuffle(false);
        let (train, test) = train_test_split(&ds, &config).unwrap();
        assert_eq!(train.targets().to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(test.targets().to_vec(), vec![6.0, 7.0]);
    }

    #[test]
    fn test_invalid_test_size() {
        let ds = numbered(10);
        let config = SplitConfig::default().with_test_size(0.0);
        assert!(matches!(
            train_test_split(&ds, &config),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_single_row_cannot_split() {
        let ds = numbered(1);
        assert!(matches!(
            train_test_split(&ds, &SplitConfig::default()),
            Err(Error::InvalidParameter(_))
        ));
    }
}
