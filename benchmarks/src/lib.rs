//! Benchmark utilities for stackforest.
//!
//! - Synthetic classification data with a fixed seed
//! - Timing helpers used by the `benchmarks` report binary

pub mod data;
pub mod utils;

pub use data::{make_classification, SyntheticConfig};
pub use utils::{benchmark_with_warmup, time_fn, BenchmarkStats};
