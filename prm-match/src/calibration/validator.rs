//! Threshold regression validation
//!
//! Checks a calibrated threshold against categorized edge cases drawn from
//! the sorted pairwise score list. Four categories are critical (best,
//! worst, and the two borderline bands); the remainder are informational
//! and surfaced for human review only. The threshold arrives as
//! configuration, never as a module global.

use crate::matrix::CompatibilityMatrix;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Half-width of the borderline bands around the threshold.
const BORDERLINE_BAND: f64 = 0.05;
/// Age gap (years) beyond which a high-scoring pair is surfaced for review.
const AGE_MISMATCH_YEARS: u32 = 10;
/// Component divergence treated as a semantic/demographic disagreement.
const COMPONENT_DIVERGENCE: f64 = 0.3;
/// Size of the best/worst edge-case sets.
const EDGE_SET_SIZE: usize = 10;
/// Cap on examples carried into the report per category.
const MAX_EXAMPLES: usize = 10;

/// One pairwise score with enough context to review it by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairScore {
    pub persona_idx: usize,
    pub record_idx: usize,
    pub score: f64,
    pub demographic_score: f64,
    pub semantic_score: f64,
    pub age_difference: Option<u32>,
}

/// Result for one edge-case category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResult {
    pub name: String,
    /// Critical categories gate the overall status; informational ones never fail
    pub critical: bool,
    pub passed: bool,
    pub checked: usize,
    pub violations: usize,
    pub examples: Vec<PairScore>,
    pub message: Option<String>,
}

/// Full validation output for one threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub threshold: f64,
    pub categories: Vec<CategoryResult>,
    /// AND of the critical category results
    pub passed: bool,
}

/// Collect every pairwise score with its context, sorted by score descending.
pub fn collect_pair_scores(
    matrix: &CompatibilityMatrix,
    persona_ages: &[Option<u32>],
    record_ages: &[Option<u32>],
) -> Vec<PairScore> {
    let mut pairs = Vec::with_capacity(matrix.rows() * matrix.cols());
    for i in 0..matrix.rows() {
        for j in 0..matrix.cols() {
            let breakdown = matrix.breakdown(i, j);
            let age_difference = match (persona_ages[i], record_ages[j]) {
                (Some(p), Some(r)) => Some(p.abs_diff(r)),
                _ => None,
            };
            pairs.push(PairScore {
                persona_idx: i,
                record_idx: j,
                score: matrix.score(i, j),
                demographic_score: breakdown.demographic.total,
                semantic_score: breakdown.semantic.total,
                age_difference,
            });
        }
    }
    pairs.sort_by(|a, b| b.score.total_cmp(&a.score));
    pairs
}

fn category(
    name: &str,
    critical: bool,
    checked: &[&PairScore],
    violation: impl Fn(&PairScore) -> bool,
    message: Option<String>,
) -> CategoryResult {
    let violators: Vec<&&PairScore> = checked.iter().filter(|p| violation(**p)).collect();
    let passed = !critical || violators.is_empty();
    let examples = if critical {
        violators
            .iter()
            .take(MAX_EXAMPLES)
            .map(|p| (**p).clone())
            .collect()
    } else {
        checked.iter().take(MAX_EXAMPLES).map(|p| (*p).clone()).collect()
    };
    CategoryResult {
        name: name.to_string(),
        critical,
        passed,
        checked: checked.len(),
        violations: violators.len(),
        examples,
        message,
    }
}

/// Regression-test a calibrated threshold against the full pairwise
/// score distribution.
pub fn validate_threshold(
    matrix: &CompatibilityMatrix,
    persona_ages: &[Option<u32>],
    record_ages: &[Option<u32>],
    threshold: f64,
) -> ValidationReport {
    let sorted = collect_pair_scores(matrix, persona_ages, record_ages);

    let best: Vec<&PairScore> = sorted.iter().take(EDGE_SET_SIZE).collect();
    let worst: Vec<&PairScore> = sorted.iter().rev().take(EDGE_SET_SIZE).collect();
    let borderline_above: Vec<&PairScore> = sorted
        .iter()
        .filter(|p| p.score >= threshold && p.score < threshold + BORDERLINE_BAND)
        .collect();
    let borderline_below: Vec<&PairScore> = sorted
        .iter()
        .filter(|p| p.score < threshold && p.score > threshold - BORDERLINE_BAND)
        .collect();
    let age_mismatched: Vec<&PairScore> = sorted
        .iter()
        .filter(|p| p.score > threshold && p.age_difference.is_some_and(|d| d > AGE_MISMATCH_YEARS))
        .collect();
    let high_semantic_low_demographic: Vec<&PairScore> = sorted
        .iter()
        .filter(|p| p.semantic_score >= p.demographic_score + COMPONENT_DIVERGENCE)
        .collect();
    let low_semantic_high_demographic: Vec<&PairScore> = sorted
        .iter()
        .filter(|p| p.demographic_score >= p.semantic_score + COMPONENT_DIVERGENCE)
        .collect();

    let categories = vec![
        category(
            "best_matches",
            true,
            &best,
            |p| p.score < threshold,
            Some("top pairwise matches must clear the threshold".to_string()),
        ),
        category(
            "worst_matches",
            true,
            &worst,
            |p| p.score >= threshold,
            Some("bottom pairwise matches must fall below the threshold".to_string()),
        ),
        category(
            "borderline_above",
            true,
            &borderline_above,
            |p| p.score < threshold,
            Some("pairs just above the threshold must not be flagged".to_string()),
        ),
        category(
            "borderline_below",
            true,
            &borderline_below,
            |p| p.score >= threshold,
            Some("pairs just below the threshold must be flagged".to_string()),
        ),
        category(
            "age_mismatched",
            false,
            &age_mismatched,
            |_| false,
            Some(format!(
                "pairs above threshold despite an age gap over {} years; review by hand",
                AGE_MISMATCH_YEARS
            )),
        ),
        category(
            "high_semantic_low_demographic",
            false,
            &high_semantic_low_demographic,
            |_| false,
            Some("semantic model disagrees upward with demographic model".to_string()),
        ),
        category(
            "low_semantic_high_demographic",
            false,
            &low_semantic_high_demographic,
            |_| false,
            Some("demographic model disagrees upward with semantic model".to_string()),
        ),
    ];

    let passed = categories
        .iter()
        .filter(|c| c.critical)
        .all(|c| c.passed);

    if passed {
        info!("threshold {:.4} passed validation", threshold);
    } else {
        for c in categories.iter().filter(|c| c.critical && !c.passed) {
            warn!(
                "threshold {:.4} failed category '{}': {}/{} violations",
                threshold, c.name, c.violations, c.checked
            );
        }
    }

    ValidationReport {
        threshold,
        categories,
        passed,
    }
}
