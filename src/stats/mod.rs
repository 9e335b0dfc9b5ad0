//! Latency statistics for completed runs
//!
//! All values are reported in seconds, matching the summary artifacts.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Percentiles reported alongside the mean
pub const REPORTED_PERCENTILES: [f64; 3] = [50.0, 90.0, 99.0];

/// Descriptive statistics over the latencies of successful requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencyStatistics {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub p90: f64,
    pub p99: f64,
    pub std_dev: f64,
}

impl LatencyStatistics {
    /// Compute statistics; an empty slice yields all zeros
    pub fn from_latencies(latencies: &[Duration]) -> Self {
        if latencies.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<f64> = latencies.iter().map(Duration::as_secs_f64).collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = mean_seconds(latencies);

        Self {
            count: sorted.len(),
            mean,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: percentile(&sorted, REPORTED_PERCENTILES[0]),
            p90: percentile(&sorted, REPORTED_PERCENTILES[1]),
            p99: percentile(&sorted, REPORTED_PERCENTILES[2]),
            std_dev: standard_deviation(&sorted, mean),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Arithmetic mean in seconds, 0 for no samples
pub fn mean_seconds(latencies: &[Duration]) -> f64 {
    if latencies.is_empty() {
        return 0.0;
    }
    latencies.iter().map(Duration::as_secs_f64).sum::<f64>() / latencies.len() as f64
}

/// Completed requests per second of wall time, 0 when no time elapsed
pub fn throughput(completed: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        completed as f64 / secs
    } else {
        0.0
    }
}

/// Linear-interpolated percentile over already sorted values
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_values.len() as f64 - 1.0);
    let lower_index = index.floor() as usize;
    let upper_index = index.ceil() as usize;

    if lower_index == upper_index {
        sorted_values[lower_index]
    } else {
        let lower_value = sorted_values[lower_index];
        let upper_value = sorted_values[upper_index];
        let weight = index - lower_index as f64;
        lower_value + weight * (upper_value - lower_value)
    }
}

/// Sample standard deviation
fn standard_deviation(values: &[f64], mean: f64) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let variance = values.iter()
        .map(|x| (x - mean).powi(2))
        .sum::<f64>() / (values.len() - 1) as f64;

    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|&v| Duration::from_millis(v)).collect()
    }

    #[test]
    fn test_empty_statistics() {
        let stats = LatencyStatistics::from_latencies(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.max, 0.0);
    }

    #[test]
    fn test_basic_statistics() {
        let stats = LatencyStatistics::from_latencies(&ms(&[30, 10, 20]));
        assert_eq!(stats.count, 3);
        assert!((stats.mean - 0.020).abs() < 1e-9);
        assert!((stats.min - 0.010).abs() < 1e-9);
        assert!((stats.max - 0.030).abs() < 1e-9);
        assert!((stats.median - 0.020).abs() < 1e-9);
        assert!((stats.std_dev - 0.010).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_calculation() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(percentile(&values, 50.0), 5.5);
        assert!((percentile(&values, 90.0) - 9.1).abs() < 1e-9);
        assert_eq!(percentile(&values, 100.0), 10.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_single_sample_has_no_spread() {
        let stats = LatencyStatistics::from_latencies(&ms(&[42]));
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, stats.max);
        assert_eq!(stats.p99, stats.median);
    }

    #[test]
    fn test_throughput() {
        assert_eq!(throughput(0, Duration::ZERO), 0.0);
        assert_eq!(throughput(10, Duration::ZERO), 0.0);
        assert!((throughput(300, Duration::from_secs(2)) - 150.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn mean_lies_between_min_and_max(values in prop::collection::vec(1u64..5_000, 1..200)) {
            let stats = LatencyStatistics::from_latencies(&ms(&values));
            prop_assert!(stats.min <= stats.mean + 1e-12);
            prop_assert!(stats.mean <= stats.max + 1e-12);
            prop_assert!(stats.median <= stats.p90 + 1e-12);
            prop_assert!(stats.p90 <= stats.p99 + 1e-12);
        }
    }
}
