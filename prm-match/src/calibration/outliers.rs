//! Outlier detection
//!
//! Three independent detectors applied to a score distribution: IQR fences,
//! z-score against population mean/stdev, and modified z-score using the
//! median absolute deviation.

use super::stats::{self, DistributionSummary};
use serde::{Deserialize, Serialize};

const Z_SCORE_CUTOFF: f64 = 3.0;
const MODIFIED_Z_CUTOFF: f64 = 3.5;
const MAD_CONSISTENCY: f64 = 0.6745;
const IQR_FENCE: f64 = 1.5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodResult {
    pub flagged: usize,
    pub flagged_pct: f64,
    /// Lower/upper fences for the IQR method; cutoffs elsewhere are fixed
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
}

/// Outlier counts for one distribution under all three methods.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutlierReport {
    pub iqr: MethodResult,
    pub z_score: MethodResult,
    pub modified_z_score: MethodResult,
}

fn pct(flagged: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        flagged as f64 / total as f64 * 100.0
    }
}

/// Values outside [Q1 - 1.5*IQR, Q3 + 1.5*IQR].
pub fn iqr_outliers(values: &[f64], summary: &DistributionSummary) -> MethodResult {
    let q1 = summary.percentiles.p25;
    let q3 = summary.percentiles.p75;
    let iqr = q3 - q1;
    let lower = q1 - IQR_FENCE * iqr;
    let upper = q3 + IQR_FENCE * iqr;
    let flagged = values.iter().filter(|&&v| v < lower || v > upper).count();
    MethodResult {
        flagged,
        flagged_pct: pct(flagged, values.len()),
        lower_bound: Some(lower),
        upper_bound: Some(upper),
    }
}

/// Values with |z| > 3 using population mean and standard deviation.
pub fn z_score_outliers(values: &[f64], summary: &DistributionSummary) -> MethodResult {
    if summary.std_dev == 0.0 {
        return MethodResult {
            flagged: 0,
            flagged_pct: 0.0,
            lower_bound: None,
            upper_bound: None,
        };
    }
    let flagged = values
        .iter()
        .filter(|&&v| ((v - summary.mean) / summary.std_dev).abs() > Z_SCORE_CUTOFF)
        .count();
    MethodResult {
        flagged,
        flagged_pct: pct(flagged, values.len()),
        lower_bound: None,
        upper_bound: None,
    }
}

/// Values with |0.6745*(x - median)/MAD| > 3.5. A zero MAD (constant
/// distribution) flags nothing.
pub fn modified_z_score_outliers(values: &[f64], summary: &DistributionSummary) -> MethodResult {
    if summary.mad == 0.0 {
        return MethodResult {
            flagged: 0,
            flagged_pct: 0.0,
            lower_bound: None,
            upper_bound: None,
        };
    }
    let flagged = values
        .iter()
        .filter(|&&v| (MAD_CONSISTENCY * (v - summary.median) / summary.mad).abs() > MODIFIED_Z_CUTOFF)
        .count();
    MethodResult {
        flagged,
        flagged_pct: pct(flagged, values.len()),
        lower_bound: None,
        upper_bound: None,
    }
}

/// Apply all three detectors to one distribution.
pub fn detect(values: &[f64]) -> OutlierReport {
    let summary = stats::summarize(values);
    OutlierReport {
        iqr: iqr_outliers(values, &summary),
        z_score: z_score_outliers(values, &summary),
        modified_z_score: modified_z_score_outliers(values, &summary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_outliers_in_tight_distribution() {
        let values: Vec<f64> = (0..100).map(|i| 0.70 + (i as f64) * 0.001).collect();
        let report = detect(&values);
        assert_eq!(report.iqr.flagged, 0);
        assert_eq!(report.z_score.flagged, 0);
        assert_eq!(report.modified_z_score.flagged, 0);
    }

    #[test]
    fn test_iqr_flags_extreme_value() {
        let mut values: Vec<f64> = (0..100).map(|i| 0.70 + (i as f64) * 0.001).collect();
        values.push(0.05);
        let report = detect(&values);
        assert!(report.iqr.flagged >= 1);
        assert!(report.modified_z_score.flagged >= 1);
    }

    #[test]
    fn test_constant_distribution_flags_nothing() {
        let values = vec![0.6; 50];
        let report = detect(&values);
        assert_eq!(report.z_score.flagged, 0);
        assert_eq!(report.modified_z_score.flagged, 0);
        assert_eq!(report.iqr.flagged, 0);
    }

    #[test]
    fn test_empty_distribution() {
        let report = detect(&[]);
        assert_eq!(report.iqr.flagged, 0);
        assert_eq!(report.iqr.flagged_pct, 0.0);
    }
}
