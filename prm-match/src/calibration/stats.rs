//! Distribution statistics helpers

use serde::{Deserialize, Serialize};

/// Percentile levels reported for score distributions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Percentiles {
    pub p1: f64,
    pub p5: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Full descriptive summary of one score distribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentiles: Percentiles,
    /// Median absolute deviation
    pub mad: f64,
}

/// Linear-interpolation percentile over a sorted slice; `p` in [0, 100].
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    if low == high {
        sorted[low]
    } else {
        let fraction = rank - low as f64;
        sorted[low] + (sorted[high] - sorted[low]) * fraction
    }
}

/// Population standard deviation.
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Median absolute deviation from the given median.
pub fn mad(values: &[f64], median: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut deviations: Vec<f64> = values.iter().map(|v| (v - median).abs()).collect();
    deviations.sort_by(|a, b| a.total_cmp(b));
    percentile(&deviations, 50.0)
}

/// Compute the full summary for a set of values.
pub fn summarize(values: &[f64]) -> DistributionSummary {
    if values.is_empty() {
        return DistributionSummary::default();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let median = percentile(&sorted, 50.0);

    DistributionSummary {
        count: sorted.len(),
        mean,
        median,
        std_dev: std_dev(&sorted, mean),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        percentiles: Percentiles {
            p1: percentile(&sorted, 1.0),
            p5: percentile(&sorted, 5.0),
            p10: percentile(&sorted, 10.0),
            p25: percentile(&sorted, 25.0),
            p50: median,
            p75: percentile(&sorted, 75.0),
            p90: percentile(&sorted, 90.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
        },
        mad: mad(&sorted, median),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolation() {
        let sorted = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 0.0);
        assert_eq!(percentile(&sorted, 50.0), 2.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert!((percentile(&sorted, 25.0) - 1.0).abs() < 1e-9);
        assert!((percentile(&sorted, 12.5) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_degenerate() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[0.7], 5.0), 0.7);
    }

    #[test]
    fn test_mad_of_constant_values_is_zero() {
        let values = vec![0.5; 10];
        assert_eq!(mad(&values, 0.5), 0.0);
    }

    #[test]
    fn test_summarize_basics() {
        let values = vec![0.1, 0.2, 0.3, 0.4, 0.5];
        let summary = summarize(&values);
        assert_eq!(summary.count, 5);
        assert!((summary.mean - 0.3).abs() < 1e-9);
        assert!((summary.median - 0.3).abs() < 1e-9);
        assert_eq!(summary.min, 0.1);
        assert_eq!(summary.max, 0.5);
        assert!((summary.mad - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_summarize_is_order_independent() {
        let a = summarize(&[0.3, 0.1, 0.5, 0.2, 0.4]);
        let b = summarize(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(a.median, b.median);
        assert_eq!(a.percentiles.p90, b.percentiles.p90);
    }
}
