//! Anomaly-threshold derivation
//!
//! Candidates are computed on the best-match distribution; the recommended
//! threshold takes the maximum of the candidates to stay conservative (few
//! false positives among genuinely good matches) and is clamped to
//! [0.3, 0.7] to prevent degenerate thresholds at either extreme.

use super::outliers::{self, OutlierReport};
use super::stats::{self, DistributionSummary};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Clamp bounds for the recommended threshold.
pub const THRESHOLD_FLOOR: f64 = 0.3;
pub const THRESHOLD_CEILING: f64 = 0.7;

/// The four candidate thresholds, all from the best-match distribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdCandidates {
    /// 5th percentile
    pub p5: f64,
    /// mean - 2*stdev
    pub mean_minus_2_std: f64,
    /// Q1 - 1.5*IQR
    pub iqr_lower_fence: f64,
    /// median - 2*MAD
    pub median_minus_2_mad: f64,
}

impl ThresholdCandidates {
    pub fn max(&self) -> f64 {
        self.p5
            .max(self.mean_minus_2_std)
            .max(self.iqr_lower_fence)
            .max(self.median_minus_2_mad)
    }
}

/// Share of each distribution that the recommended threshold would flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdImpact {
    pub all_scores_flagged_pct: f64,
    pub best_scores_flagged_pct: f64,
}

/// Full calibration output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub all_scores: DistributionSummary,
    pub best_match_scores: DistributionSummary,
    pub all_scores_outliers: OutlierReport,
    pub best_match_outliers: OutlierReport,
    pub candidates: ThresholdCandidates,
    pub recommended_threshold: f64,
    pub impact: ThresholdImpact,
}

fn flagged_pct(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|&&v| v < threshold).count() as f64 / values.len() as f64 * 100.0
}

/// Calibrate an anomaly threshold from all pairwise scores and each
/// persona's best-match score.
pub fn calibrate(all_scores: &[f64], best_match_scores: &[f64]) -> CalibrationReport {
    let all_summary = stats::summarize(all_scores);
    let best_summary = stats::summarize(best_match_scores);

    let q1 = best_summary.percentiles.p25;
    let iqr = best_summary.percentiles.p75 - q1;
    let candidates = ThresholdCandidates {
        p5: best_summary.percentiles.p5,
        mean_minus_2_std: best_summary.mean - 2.0 * best_summary.std_dev,
        iqr_lower_fence: q1 - 1.5 * iqr,
        median_minus_2_mad: best_summary.median - 2.0 * best_summary.mad,
    };

    let recommended = candidates.max().clamp(THRESHOLD_FLOOR, THRESHOLD_CEILING);
    info!(
        "calibrated anomaly threshold {:.4} (candidates: p5 {:.4}, mean-2sd {:.4}, iqr {:.4}, mad {:.4})",
        recommended,
        candidates.p5,
        candidates.mean_minus_2_std,
        candidates.iqr_lower_fence,
        candidates.median_minus_2_mad
    );

    let impact = ThresholdImpact {
        all_scores_flagged_pct: flagged_pct(all_scores, recommended),
        best_scores_flagged_pct: flagged_pct(best_match_scores, recommended),
    };

    CalibrationReport {
        all_scores_outliers: outliers::detect(all_scores),
        best_match_outliers: outliers::detect(best_match_scores),
        all_scores: all_summary,
        best_match_scores: best_summary,
        candidates,
        recommended_threshold: recommended,
        impact,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_always_clamped() {
        // Degenerately high distribution clamps to the ceiling
        let high = vec![0.95; 40];
        let report = calibrate(&high, &high);
        assert_eq!(report.recommended_threshold, THRESHOLD_CEILING);

        // Degenerately low distribution clamps to the floor
        let low = vec![0.05; 40];
        let report = calibrate(&low, &low);
        assert_eq!(report.recommended_threshold, THRESHOLD_FLOOR);

        // Spread distribution stays inside the clamp band
        let spread: Vec<f64> = (0..100).map(|i| i as f64 / 100.0).collect();
        let report = calibrate(&spread, &spread);
        assert!(report.recommended_threshold >= THRESHOLD_FLOOR);
        assert!(report.recommended_threshold <= THRESHOLD_CEILING);
    }

    #[test]
    fn test_recommended_is_max_of_candidates_before_clamp() {
        let best: Vec<f64> = (0..100).map(|i| 0.4 + (i as f64) * 0.003).collect();
        let report = calibrate(&best, &best);
        let max = report.candidates.max();
        assert_eq!(report.recommended_threshold, max.clamp(0.3, 0.7));
    }

    #[test]
    fn test_impact_percentages() {
        // Half below 0.3 floor: with constant best distribution the clamp
        // fires and impact reflects the clamped threshold
        let all: Vec<f64> = (0..10).map(|i| if i < 5 { 0.1 } else { 0.9 }).collect();
        let best = vec![0.9; 5];
        let report = calibrate(&all, &best);
        assert_eq!(report.recommended_threshold, THRESHOLD_CEILING);
        assert!((report.impact.all_scores_flagged_pct - 50.0).abs() < 1e-9);
        assert_eq!(report.impact.best_scores_flagged_pct, 0.0);
    }

    #[test]
    fn test_empty_distributions() {
        let report = calibrate(&[], &[]);
        assert_eq!(report.recommended_threshold, THRESHOLD_FLOOR);
        assert_eq!(report.all_scores.count, 0);
    }
}
