//! Demographic compatibility model
//!
//! Weighted sum of age, education, income, marital-status, and
//! occupation-education components. The record side carries no direct
//! education or income attributes, so those components are smoothing terms
//! keyed off the persona, not true two-sided comparisons.

use super::{age_compatibility, NEUTRAL_SCORE};
use prm_common::config::DemographicWeights;
use prm_common::model::persona::{EducationLevel, MaritalStatus, PersonaSemanticTree};
use prm_common::model::record::HealthRecordSemanticTree;
use prm_common::model::DemographicBreakdown;

/// Keyword buckets for occupation classification.
const HIGH_SKILLED_KEYWORDS: &[&str] = &[
    "physician", "doctor", "surgeon", "dentist", "pharmacist", "engineer", "scientist",
    "researcher", "professor", "lawyer", "attorney", "architect", "executive", "director",
    "manager", "analyst", "consultant",
];

const MEDIUM_SKILLED_KEYWORDS: &[&str] = &[
    "nurse", "teacher", "technician", "accountant", "administrator", "therapist",
    "counselor", "social worker", "designer", "paralegal", "sales", "supervisor",
];

const LOW_SKILLED_KEYWORDS: &[&str] = &[
    "cashier", "retail", "server", "waiter", "waitress", "food service", "cleaner",
    "janitor", "driver", "laborer", "warehouse", "clerk", "receptionist",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkillLevel {
    High,
    Medium,
    Low,
}

fn classify_occupation(occupation: &str) -> Option<SkillLevel> {
    let lowered = occupation.to_lowercase();
    if HIGH_SKILLED_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Some(SkillLevel::High)
    } else if MEDIUM_SKILLED_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Some(SkillLevel::Medium)
    } else if LOW_SKILLED_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Some(SkillLevel::Low)
    } else {
        None
    }
}

/// Education smoothing term: higher education levels score slightly higher.
fn education_score(level: Option<EducationLevel>) -> f64 {
    match level {
        Some(level) => 0.7 + (level.ordinal() as f64 / 5.0) * 0.3,
        None => NEUTRAL_SCORE,
    }
}

/// Income scored by ordinal distance from the "middle" bracket (index 2).
fn income_score(persona: &PersonaSemanticTree) -> f64 {
    match persona.socioeconomic.income_bracket {
        Some(bracket) => {
            let distance = (bracket.ordinal() as f64 - 2.0).abs();
            1.0 - (distance / 4.0) * 0.3
        }
        None => NEUTRAL_SCORE,
    }
}

fn marital_score(status: Option<MaritalStatus>, record_age: Option<u32>) -> f64 {
    match status {
        Some(MaritalStatus::Married) | Some(MaritalStatus::Partnered) => 1.0,
        Some(MaritalStatus::Single) => 0.8,
        Some(MaritalStatus::Divorced) | Some(MaritalStatus::Separated) => 0.7,
        Some(MaritalStatus::Widowed) => match record_age {
            Some(age) if age >= 35 => 0.6,
            _ => 0.5,
        },
        None => NEUTRAL_SCORE,
    }
}

/// Occupation-education consistency: high-skilled occupations expect
/// advanced degrees, medium-skilled expect at least some college,
/// low-skilled carry no expectation. Unclassifiable occupations score 0.7.
fn occupation_score(persona: &PersonaSemanticTree) -> f64 {
    let occupation = match persona.socioeconomic.occupation_category.as_deref() {
        Some(o) if !o.trim().is_empty() => o,
        _ => return 0.7,
    };
    let skill = match classify_occupation(occupation) {
        Some(s) => s,
        None => return 0.7,
    };
    let education = persona.socioeconomic.education_level;

    match skill {
        SkillLevel::High => match education {
            Some(EducationLevel::MastersOrHigher) => 1.0,
            Some(EducationLevel::Bachelors) => 0.8,
            _ => 0.6,
        },
        SkillLevel::Medium => match education {
            Some(level) if level >= EducationLevel::Bachelors => 1.0,
            Some(level) if level >= EducationLevel::SomeCollege => 0.8,
            _ => 0.6,
        },
        SkillLevel::Low => 1.0,
    }
}

/// Compute the demographic compatibility breakdown for one pair.
pub fn demographic_compatibility(
    persona: &PersonaSemanticTree,
    record: &HealthRecordSemanticTree,
    weights: &DemographicWeights,
    age_tolerance: u32,
) -> DemographicBreakdown {
    let age = age_compatibility(persona.demographics.age, record.age, age_tolerance);
    let education = education_score(persona.socioeconomic.education_level);
    let income = income_score(persona);
    let marital_status = marital_score(persona.psychosocial.marital_status, record.age);
    let occupation = occupation_score(persona);

    let total = (age * weights.age
        + education * weights.education
        + income * weights.income
        + marital_status * weights.marital_status
        + occupation * weights.occupation)
        / weights.sum();

    DemographicBreakdown {
        age,
        education,
        income,
        marital_status,
        occupation,
        total,
    }
}
