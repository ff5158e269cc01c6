//! Pairwise similarity scoring
//!
//! Two independent models per (persona, record) pair: a demographic
//! compatibility model and a hierarchical semantic-tree model. Both are
//! pure and deterministic; a missing or unusable field defaults its
//! sub-score to neutral 0.5 rather than failing the pair.

pub mod demographic;
pub mod semantic;

use prm_common::model::{PersonaSemanticTree, ScoreBreakdown};
use prm_common::model::record::HealthRecordSemanticTree;
use prm_common::MatchingConfig;

/// Sub-score used when a field is missing or a computation is unusable.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Age compatibility decay curve, shared by both models.
///
/// Exact match scores 1.0; the score then decays linearly in three bands of
/// width `tolerance` and exponentially beyond, reaching 0.85 at `tolerance`
/// and 0.30 at three tolerances. Missing age on either side is neutral.
pub fn age_compatibility(
    persona_age: Option<u32>,
    record_age: Option<u32>,
    tolerance: u32,
) -> f64 {
    let (pa, ra) = match (persona_age, record_age) {
        (Some(p), Some(r)) => (p, r),
        _ => return NEUTRAL_SCORE,
    };

    let diff = (pa as f64 - ra as f64).abs();
    let t = tolerance as f64;

    if diff == 0.0 {
        1.0
    } else if diff <= t {
        1.0 - (diff / t) * 0.15
    } else if diff <= 2.0 * t {
        0.85 - ((diff - t) / t) * 0.25
    } else if diff <= 3.0 * t {
        0.60 - ((diff - 2.0 * t) / t) * 0.30
    } else {
        (0.30 * 0.5_f64.powf((diff - 3.0 * t) / 5.0)).max(0.0)
    }
}

/// Score one (persona, record) pair under both models and blend them.
///
/// `matrix[i][j] = demographic*(1-w) + semantic*w` where `w` is
/// `config.semantic_weight`. A persona without a semantic tree scores
/// neutral on both models.
pub fn score_pair(
    persona: Option<&PersonaSemanticTree>,
    record: &HealthRecordSemanticTree,
    config: &MatchingConfig,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    match persona {
        Some(tree) => {
            breakdown.demographic = demographic::demographic_compatibility(
                tree,
                record,
                &config.demographic_weights,
                config.age_tolerance,
            );
            breakdown.semantic = semantic::semantic_compatibility(
                tree,
                record,
                &config.semantic_weights,
                config.age_tolerance,
            );
        }
        None => {
            breakdown.demographic.total = NEUTRAL_SCORE;
            breakdown.semantic.total = NEUTRAL_SCORE;
        }
    }

    let w = config.semantic_weight;
    breakdown.combined = breakdown.demographic.total * (1.0 - w) + breakdown.semantic.total * w;
    breakdown
}
