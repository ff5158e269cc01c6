//! Semantic tree compatibility model
//!
//! Five weighted components comparing the persona's attribute tree against
//! the record's clinical summary. Several components are alignment checks
//! between a persona trait and a clinical proxy for it (e.g. healthcare
//! access vs. estimated access from utilization), not literal field
//! equality.

use super::{age_compatibility, NEUTRAL_SCORE};
use prm_common::config::SemanticWeights;
use prm_common::model::persona::PersonaSemanticTree;
use prm_common::model::record::HealthRecordSemanticTree;
use prm_common::model::{Scale1to5, SemanticBreakdown};

/// Income bracket mapped to an expected healthcare-access level and compared
/// to the record's estimated access with a step function.
fn socioeconomic_similarity(
    persona: &PersonaSemanticTree,
    record: &HealthRecordSemanticTree,
) -> f64 {
    let bracket = match persona.socioeconomic.income_bracket {
        Some(b) => b,
        None => return NEUTRAL_SCORE,
    };
    let expected = bracket.expected_healthcare_access() as i32;
    let estimated = record.healthcare_utilization.estimated_healthcare_access.get() as i32;

    match (expected - estimated).abs() {
        0 => 1.0,
        1 => 0.85,
        2 => 0.65,
        diff => (1.0 - diff as f64 * 0.2).max(0.3),
    }
}

/// Linear similarity between two 1..=5 scale values: 1 - |a-b|/5.
fn scale_similarity(a: Option<Scale1to5>, b: Scale1to5) -> f64 {
    match a {
        Some(a) => 1.0 - (a.get() as f64 - b.get() as f64).abs() / 5.0,
        None => NEUTRAL_SCORE,
    }
}

/// Health profile: consciousness vs. primary-care engagement, access vs.
/// estimated access, and pregnancy readiness vs. pregnancy risk. Readiness
/// and risk are inversely correlated: high readiness should pair with low
/// risk.
fn health_profile_similarity(
    persona: &PersonaSemanticTree,
    record: &HealthRecordSemanticTree,
) -> f64 {
    let util = &record.healthcare_utilization;

    let consciousness = scale_similarity(
        persona.health_profile.health_consciousness,
        util.primary_care_engagement,
    );
    let access = scale_similarity(
        persona.health_profile.healthcare_access,
        util.estimated_healthcare_access,
    );
    let readiness = match persona.health_profile.pregnancy_readiness {
        Some(readiness) => {
            let readiness_norm = readiness.normalized();
            let risk_norm = record.pregnancy_profile.risk_level.normalized();
            1.0 - (readiness_norm - (1.0 - risk_norm)).abs()
        }
        None => NEUTRAL_SCORE,
    };

    (consciousness + access + readiness) / 3.0
}

/// Behavioral: activity level against the record's overall health status,
/// plus a smoking vs. chronic-disease-burden consistency check.
fn behavioral_similarity(
    persona: &PersonaSemanticTree,
    record: &HealthRecordSemanticTree,
) -> f64 {
    let activity = match (persona.behavioral.physical_activity, record.overall_health_status) {
        (Some(activity), Some(status)) => 1.0 - (activity.normalized() - status.rank()).abs(),
        _ => NEUTRAL_SCORE,
    };

    let smoking = match persona.behavioral.smoking_status {
        Some(status) => {
            let burden = (record.chronic_disease_count as f64 / 10.0).min(1.0);
            1.0 - (status.risk() - burden).abs()
        }
        None => NEUTRAL_SCORE,
    };

    (activity + smoking) / 2.0
}

/// Psychosocial: three alignment checks against clinical proxies.
/// Healthcare access stands in for engagement; the comorbidity index is
/// inverted as a proxy for overall wellbeing.
fn psychosocial_similarity(
    persona: &PersonaSemanticTree,
    record: &HealthRecordSemanticTree,
) -> f64 {
    let access_norm = record
        .healthcare_utilization
        .estimated_healthcare_access
        .normalized();

    let stability = match persona.psychosocial.relationship_stability {
        Some(s) => 1.0 - (s.normalized() - access_norm).abs(),
        None => NEUTRAL_SCORE,
    };

    let financial = match persona.psychosocial.financial_stress {
        Some(s) => 1.0 - ((1.0 - s.normalized()) - access_norm).abs(),
        None => NEUTRAL_SCORE,
    };

    let support = match persona.psychosocial.social_support {
        Some(s) => 1.0 - (s.normalized() - (1.0 - record.comorbidity_index)).abs(),
        None => NEUTRAL_SCORE,
    };

    (stability + financial + support) / 3.0
}

/// Compute the semantic compatibility breakdown for one pair.
pub fn semantic_compatibility(
    persona: &PersonaSemanticTree,
    record: &HealthRecordSemanticTree,
    weights: &SemanticWeights,
    age_tolerance: u32,
) -> SemanticBreakdown {
    let demographics = age_compatibility(persona.demographics.age, record.age, age_tolerance);
    let socioeconomic = socioeconomic_similarity(persona, record);
    let health_profile = health_profile_similarity(persona, record);
    let behavioral = behavioral_similarity(persona, record);
    let psychosocial = psychosocial_similarity(persona, record);

    let total = (demographics * weights.demographics
        + socioeconomic * weights.socioeconomic
        + health_profile * weights.health_profile
        + behavioral * weights.behavioral
        + psychosocial * weights.psychosocial)
        / weights.sum();

    SemanticBreakdown {
        demographics,
        socioeconomic,
        health_profile,
        behavioral,
        psychosocial,
        total,
    }
}
