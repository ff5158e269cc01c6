//! Persona semantic tree
//!
//! The hierarchical attribute structure describing a synthetic persona:
//! demographics, socioeconomic status, health profile, behavioral traits,
//! psychosocial state, and pregnancy intentions. All sections are optional
//! in the input JSON; missing attributes score as neutral downstream.

use super::{clamp_scale, Scale1to5, ValidationWarning};
use serde::{Deserialize, Serialize};

/// Valid persona age range for this corpus.
pub const MIN_PERSONA_AGE: u32 = 12;
pub const MAX_PERSONA_AGE: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Urban,
    Suburban,
    Rural,
}

/// Education level as an ordinal (0 = less than high school, 5 = masters+).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    LessThanHighSchool,
    HighSchool,
    SomeCollege,
    Associate,
    Bachelors,
    MastersOrHigher,
}

impl EducationLevel {
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

/// Income bracket as an ordinal (0 = low, 4 = high); index 2 is "middle".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    Low,
    LowerMiddle,
    Middle,
    UpperMiddle,
    High,
}

impl IncomeBracket {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Expected healthcare-access level (1..=5) implied by income.
    pub fn expected_healthcare_access(self) -> u8 {
        self.ordinal() + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Married,
    Partnered,
    Single,
    Divorced,
    Separated,
    Widowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl SmokingStatus {
    /// Normalized smoking risk in [0.0, 1.0].
    pub fn risk(self) -> f64 {
        match self {
            SmokingStatus::Never => 0.0,
            SmokingStatus::Former => 0.5,
            SmokingStatus::Current => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholConsumption {
    None,
    Occasional,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Demographics {
    pub age: Option<u32>,
    pub location_type: Option<LocationType>,
    pub ethnicity: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Socioeconomic {
    pub education_level: Option<EducationLevel>,
    pub income_bracket: Option<IncomeBracket>,
    pub occupation_category: Option<String>,
    pub employment_status: Option<String>,
    pub insurance_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthProfile {
    pub health_consciousness: Option<Scale1to5>,
    pub healthcare_access: Option<Scale1to5>,
    pub pregnancy_readiness: Option<Scale1to5>,
    pub conditions: Vec<String>,
    pub medications: Vec<String>,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavioral {
    pub physical_activity: Option<Scale1to5>,
    pub nutrition_awareness: Option<Scale1to5>,
    pub smoking_status: Option<SmokingStatus>,
    pub alcohol_consumption: Option<AlcoholConsumption>,
    pub sleep_quality: Option<Scale1to5>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Psychosocial {
    pub mental_health_status: Option<Scale1to5>,
    pub stress_level: Option<Scale1to5>,
    pub social_support: Option<Scale1to5>,
    pub marital_status: Option<MaritalStatus>,
    pub relationship_stability: Option<Scale1to5>,
    pub financial_stress: Option<Scale1to5>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PregnancyIntentions {
    pub gravida: u32,
    pub para: u32,
    pub trying_duration_months: u32,
}

/// A persona's full semantic tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSemanticTree {
    pub demographics: Demographics,
    pub socioeconomic: Socioeconomic,
    pub health_profile: HealthProfile,
    pub behavioral: Behavioral,
    pub psychosocial: Psychosocial,
    pub pregnancy_intentions: PregnancyIntentions,
}

impl PersonaSemanticTree {
    /// Validate bounded fields, clamping where needed. Returns the warnings
    /// rather than failing: bad values in one persona never abort a load.
    pub fn validate_and_clamp(&mut self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if let Some(age) = self.demographics.age {
            if !(MIN_PERSONA_AGE..=MAX_PERSONA_AGE).contains(&age) {
                warnings.push(ValidationWarning::new(
                    "demographics.age",
                    format!(
                        "age {} outside expected range [{}, {}]",
                        age, MIN_PERSONA_AGE, MAX_PERSONA_AGE
                    ),
                ));
            }
        }

        let hp = &mut self.health_profile;
        clamp_scale(&mut hp.health_consciousness, "health_profile.health_consciousness", &mut warnings);
        clamp_scale(&mut hp.healthcare_access, "health_profile.healthcare_access", &mut warnings);
        clamp_scale(&mut hp.pregnancy_readiness, "health_profile.pregnancy_readiness", &mut warnings);

        let b = &mut self.behavioral;
        clamp_scale(&mut b.physical_activity, "behavioral.physical_activity", &mut warnings);
        clamp_scale(&mut b.nutrition_awareness, "behavioral.nutrition_awareness", &mut warnings);
        clamp_scale(&mut b.sleep_quality, "behavioral.sleep_quality", &mut warnings);

        let p = &mut self.psychosocial;
        clamp_scale(&mut p.mental_health_status, "psychosocial.mental_health_status", &mut warnings);
        clamp_scale(&mut p.stress_level, "psychosocial.stress_level", &mut warnings);
        clamp_scale(&mut p.social_support, "psychosocial.social_support", &mut warnings);
        clamp_scale(&mut p.relationship_stability, "psychosocial.relationship_stability", &mut warnings);
        clamp_scale(&mut p.financial_stress, "psychosocial.financial_stress", &mut warnings);

        let pi = &mut self.pregnancy_intentions;
        if pi.para > pi.gravida {
            warnings.push(ValidationWarning::new(
                "pregnancy_intentions.para",
                format!("para {} exceeds gravida {}, clamped", pi.para, pi.gravida),
            ));
            pi.para = pi.gravida;
        }

        warnings
    }
}
