//! Match quality classification and batch statistics

use crate::assignment::Assignment;
use crate::io::Persona;
use crate::matrix::CompatibilityMatrix;
use prm_common::model::record::HealthRecordSemanticTree;
use prm_common::model::{Match, QualityCategory};
use serde::{Deserialize, Serialize};

/// Label each matched pair and capture its age difference.
pub fn classify_matches(
    assignment: &Assignment,
    matrix: &CompatibilityMatrix,
    personas: &[Persona],
    records: &[HealthRecordSemanticTree],
) -> Vec<Match> {
    assignment
        .pairs
        .iter()
        .map(|&(persona_idx, record_idx, score)| {
            let persona_age = personas[persona_idx]
                .semantic_tree
                .as_ref()
                .and_then(|t| t.demographics.age);
            let record_age = records[record_idx].age;
            let age_difference = match (persona_age, record_age) {
                (Some(p), Some(r)) => Some(p.abs_diff(r)),
                _ => None,
            };

            Match {
                persona_idx,
                record_idx,
                compatibility_score: score,
                quality: QualityCategory::from_score(score),
                breakdown: *matrix.breakdown(persona_idx, record_idx),
                age_difference,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreStatistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p25: f64,
    pub p75: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityDistribution {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
    pub excellent_pct: f64,
    pub good_pct: f64,
    pub fair_pct: f64,
    pub poor_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgeDifferenceStatistics {
    /// Matches where both ages were present
    pub counted: usize,
    pub mean: f64,
    pub median: f64,
    pub max: u32,
    pub within_2_years_pct: f64,
    pub within_5_years_pct: f64,
}

/// Per-component score averages across the whole batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentAverages {
    pub demographic_age: f64,
    pub demographic_education: f64,
    pub demographic_income: f64,
    pub demographic_marital_status: f64,
    pub demographic_occupation: f64,
    pub semantic_demographics: f64,
    pub semantic_socioeconomic: f64,
    pub semantic_health_profile: f64,
    pub semantic_behavioral: f64,
    pub semantic_psychosocial: f64,
}

/// Descriptive statistics over one batch of matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub match_count: usize,
    pub scores: ScoreStatistics,
    pub quality: QualityDistribution,
    pub age_differences: AgeDifferenceStatistics,
    pub component_averages: ComponentAverages,
}

/// Summarize a batch of matches. An empty batch yields zeroed statistics.
pub fn compute_statistics(matches: &[Match]) -> MatchStatistics {
    if matches.is_empty() {
        return MatchStatistics::default();
    }
    let count = matches.len();
    let n = count as f64;

    let mut scores: Vec<f64> = matches.iter().map(|m| m.compatibility_score).collect();
    scores.sort_by(|a, b| a.total_cmp(b));

    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

    let score_stats = ScoreStatistics {
        mean,
        median: sorted_percentile(&scores, 50.0),
        std_dev: variance.sqrt(),
        min: scores[0],
        max: scores[count - 1],
        p25: sorted_percentile(&scores, 25.0),
        p75: sorted_percentile(&scores, 75.0),
    };

    let mut quality = QualityDistribution::default();
    for m in matches {
        match m.quality {
            QualityCategory::Excellent => quality.excellent += 1,
            QualityCategory::Good => quality.good += 1,
            QualityCategory::Fair => quality.fair += 1,
            QualityCategory::Poor => quality.poor += 1,
        }
    }
    quality.excellent_pct = quality.excellent as f64 / n * 100.0;
    quality.good_pct = quality.good as f64 / n * 100.0;
    quality.fair_pct = quality.fair as f64 / n * 100.0;
    quality.poor_pct = quality.poor as f64 / n * 100.0;

    let mut diffs: Vec<u32> = matches.iter().filter_map(|m| m.age_difference).collect();
    diffs.sort_unstable();
    let age_differences = if diffs.is_empty() {
        AgeDifferenceStatistics::default()
    } else {
        let dn = diffs.len() as f64;
        let diff_f: Vec<f64> = diffs.iter().map(|&d| d as f64).collect();
        AgeDifferenceStatistics {
            counted: diffs.len(),
            mean: diff_f.iter().sum::<f64>() / dn,
            median: sorted_percentile(&diff_f, 50.0),
            max: diffs[diffs.len() - 1],
            within_2_years_pct: diffs.iter().filter(|&&d| d <= 2).count() as f64 / dn * 100.0,
            within_5_years_pct: diffs.iter().filter(|&&d| d <= 5).count() as f64 / dn * 100.0,
        }
    };

    let mut avg = ComponentAverages::default();
    for m in matches {
        avg.demographic_age += m.breakdown.demographic.age;
        avg.demographic_education += m.breakdown.demographic.education;
        avg.demographic_income += m.breakdown.demographic.income;
        avg.demographic_marital_status += m.breakdown.demographic.marital_status;
        avg.demographic_occupation += m.breakdown.demographic.occupation;
        avg.semantic_demographics += m.breakdown.semantic.demographics;
        avg.semantic_socioeconomic += m.breakdown.semantic.socioeconomic;
        avg.semantic_health_profile += m.breakdown.semantic.health_profile;
        avg.semantic_behavioral += m.breakdown.semantic.behavioral;
        avg.semantic_psychosocial += m.breakdown.semantic.psychosocial;
    }
    avg.demographic_age /= n;
    avg.demographic_education /= n;
    avg.demographic_income /= n;
    avg.demographic_marital_status /= n;
    avg.demographic_occupation /= n;
    avg.semantic_demographics /= n;
    avg.semantic_socioeconomic /= n;
    avg.semantic_health_profile /= n;
    avg.semantic_behavioral /= n;
    avg.semantic_psychosocial /= n;

    MatchStatistics {
        match_count: count,
        scores: score_stats,
        quality,
        age_differences,
        component_averages: avg,
    }
}

/// Linear-interpolation percentile over an already sorted slice.
fn sorted_percentile(sorted: &[f64], p: f64) -> f64 {
    crate::calibration::stats::percentile(sorted, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prm_common::model::ScoreBreakdown;

    fn match_with(score: f64, age_difference: Option<u32>) -> Match {
        Match {
            persona_idx: 0,
            record_idx: 0,
            compatibility_score: score,
            quality: QualityCategory::from_score(score),
            breakdown: ScoreBreakdown::default(),
            age_difference,
        }
    }

    #[test]
    fn test_empty_batch() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.match_count, 0);
        assert_eq!(stats.scores.mean, 0.0);
    }

    #[test]
    fn test_quality_distribution() {
        let matches = vec![
            match_with(0.9, Some(1)),
            match_with(0.8, Some(3)),
            match_with(0.7, Some(6)),
            match_with(0.5, Some(12)),
        ];
        let stats = compute_statistics(&matches);
        assert_eq!(stats.match_count, 4);
        assert_eq!(stats.quality.excellent, 1);
        assert_eq!(stats.quality.good, 1);
        assert_eq!(stats.quality.fair, 1);
        assert_eq!(stats.quality.poor, 1);
        assert!((stats.quality.excellent_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_statistics() {
        let matches = vec![
            match_with(0.6, None),
            match_with(0.7, None),
            match_with(0.8, None),
        ];
        let stats = compute_statistics(&matches);
        assert!((stats.scores.mean - 0.7).abs() < 1e-9);
        assert!((stats.scores.median - 0.7).abs() < 1e-9);
        assert_eq!(stats.scores.min, 0.6);
        assert_eq!(stats.scores.max, 0.8);
    }

    #[test]
    fn test_age_difference_statistics() {
        let matches = vec![
            match_with(0.8, Some(0)),
            match_with(0.8, Some(2)),
            match_with(0.8, Some(4)),
            match_with(0.8, Some(10)),
            match_with(0.8, None),
        ];
        let stats = compute_statistics(&matches);
        assert_eq!(stats.age_differences.counted, 4);
        assert_eq!(stats.age_differences.max, 10);
        assert!((stats.age_differences.within_2_years_pct - 50.0).abs() < 1e-9);
        assert!((stats.age_differences.within_5_years_pct - 75.0).abs() < 1e-9);
    }
}
