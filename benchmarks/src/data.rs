//! Synthetic census-like classification data.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stackforest::dataset::InMemoryDataset;
use stackforest::Result;

/// Gaussian-ish class blobs: class `k` is centred at `k * separation` on every
/// informative feature; the remaining features are uniform noise.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub n_samples: usize,
    pub n_features: usize,
    pub n_informative: usize,
    pub n_classes: usize,
    pub separation: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            n_features: 14,
            n_informative: 4,
            n_classes: 2,
            separation: 1.5,
            seed: 42,
        }
    }
}

impl SyntheticConfig {
    pub fn with_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn with_classes(mut self, n_classes: usize) -> Self {
        self.n_classes = n_classes;
        self
    }
}

/// Approximately standard normal: sum of twelve uniforms, shifted.
fn noise(rng: &mut StdRng) -> f64 {
    (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0
}

/// Generate a dataset with balanced classes `0.0 .. n_classes`.
pub fn make_classification(config: &SyntheticConfig) -> Result<InMemoryDataset> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n_classes = config.n_classes.max(1);
    let targets = Array1::from_shape_fn(config.n_samples, |i| (i % n_classes) as f64);

    let mut records = Array2::<f64>::zeros((config.n_samples, config.n_features));
    for (i, mut row) in records.rows_mut().into_iter().enumerate() {
        let centre = targets[i] * config.separation;
        for (j, value) in row.iter_mut().enumerate() {
            *value = if j < config.n_informative {
                centre + noise(&mut rng)
            } else {
                rng.gen_range(0.0..10.0)
            };
        }
    }

    InMemoryDataset::new(records, targets)
}
