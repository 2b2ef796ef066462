//! Timing report for the stacking pipeline over growing synthetic datasets.
//!
//! Prints one JSON object per dataset size. For statistically sound numbers use
//! `cargo bench --package benchmarks --bench pipeline`.

use benchmarks::{benchmark_with_warmup, make_classification, SyntheticConfig};
use serde_json::json;
use stackforest::dataset::{train_test_split, Dataset};
use stackforest::{GaussianNBConfig, RandomForestConfig, SplitConfig, StackingPipeline};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    for n_samples in [500, 2000, 8000] {
        let data = make_classification(&SyntheticConfig::default().with_samples(n_samples))?;
        let (train, test) = train_test_split(&data, &SplitConfig::default().with_seed(42))?;
        let forest = RandomForestConfig {
            seed: Some(0),
            ..RandomForestConfig::default()
        };

        let (fitted, fit_stats) = benchmark_with_warmup(0, 3, || -> stackforest::Result<_> {
            let mut pipeline = StackingPipeline::new(GaussianNBConfig::default(), forest.clone());
            pipeline.fit(train.records(), train.targets())?;
            Ok(pipeline)
        });
        let pipeline = fitted?;

        let (accuracy, predict_stats) =
            benchmark_with_warmup(1, 10, || pipeline.score(test.records(), test.targets()));

        println!(
            "{}",
            json!({
                "n_samples": n_samples,
                "n_features": data.n_features(),
                "fit": fit_stats,
                "predict": predict_stats,
                "test_accuracy": accuracy?,
            })
        );
    }
    Ok(())
}
