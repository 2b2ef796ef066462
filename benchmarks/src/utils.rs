use serde::Serialize;
use std::time::{Duration, Instant};

/// Run a function and measure its execution time.
///
/// # Returns
///
/// A tuple of (result, elapsed_time)
pub fn time_fn<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Run `f` `warmup` times unmeasured, then `iterations` times (at least once) measured.
///
/// Returns the last result together with timing statistics.
pub fn benchmark_with_warmup<F, R>(warmup: usize, iterations: usize, mut f: F) -> (R, BenchmarkStats)
where
    F: FnMut() -> R,
{
    for _ in 0..warmup {
        let _ = f();
    }

    let (mut result, elapsed) = time_fn(&mut f);
    let mut times = vec![elapsed.as_secs_f64() * 1000.0];
    for _ in 1..iterations {
        let (r, elapsed) = time_fn(&mut f);
        times.push(elapsed.as_secs_f64() * 1000.0);
        result = r;
    }

    (result, BenchmarkStats::from_times(times))
}

/// Statistics for benchmarking results, in milliseconds.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkStats {
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
}

impl BenchmarkStats {
    /// Calculate statistics from a list of times in milliseconds.
    pub fn from_times(mut times: Vec<f64>) -> Self {
        if times.is_empty() {
            return Self {
                mean_ms: 0.0,
                std_dev_ms: 0.0,
                min_ms: 0.0,
                max_ms: 0.0,
                median_ms: 0.0,
            };
        }
        times.sort_by(|a, b| a.total_cmp(b));

        let n = times.len();
        let mean = times.iter().sum::<f64>() / n as f64;
        let variance = times.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        } else {
            times[n / 2]
        };

        Self {
            mean_ms: mean,
            std_dev_ms: variance.sqrt(),
            min_ms: times[0],
            max_ms: times[n - 1],
            median_ms: median,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_fn() {
        let (value, elapsed) = time_fn(|| {
            std::thread::sleep(Duration::from_millis(5));
            7
        });
        assert_eq!(value, 7);
        assert!(elapsed.as_millis() >= 5);
    }

    #[test]
    fn test_benchmark_with_warmup() {
        let mut calls = 0;
        let (result, stats) = benchmark_with_warmup(2, 3, || {
            calls += 1;
            calls
        });
        assert_eq!(result, 5);
        assert!(stats.max_ms >= stats.min_ms);
    }

    #[test]
    fn test_benchmark_stats() {
        let stats = BenchmarkStats::from_times(vec![5.0, 1.0, 3.0, 2.0, 4.0]);
        assert!((stats.mean_ms - 3.0).abs() < 1e-9);
        assert!((stats.median_ms - 3.0).abs() < 1e-9);
        assert!((stats.min_ms - 1.0).abs() < 1e-9);
        assert!((stats.max_ms - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(BenchmarkStats::from_times(Vec::new()).mean_ms, 0.0);
    }
}
