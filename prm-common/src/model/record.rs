//! Health record semantic tree
//!
//! The output contract of the external FHIR extractor: a clinical record
//! summarized into conditions, medications, healthcare utilization, and a
//! pregnancy profile. This crate consumes the tree shape only; the FHIR
//! code-mapping tables live in the extractor.

use super::{clamp_scale_required, Scale1to5, ValidationWarning};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Chronic,
    Acute,
    PregnancyRelated,
    Complication,
    Preventive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancySafety {
    Contraindicated,
    Avoid,
    UseWithCaution,
    Compatible,
    Safe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitFrequency {
    Rare,
    Occasional,
    Regular,
    Frequent,
    VeryFrequent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyStage {
    FirstTrimester,
    SecondTrimester,
    ThirdTrimester,
    Postpartum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Complex,
}

impl HealthStatus {
    /// Rank on a [0.0, 1.0] scale, highest for excellent health. Complex
    /// (multi-system) records rank below poor for behavioral alignment.
    pub fn rank(self) -> f64 {
        match self {
            HealthStatus::Excellent => 1.0,
            HealthStatus::Good => 0.75,
            HealthStatus::Fair => 0.5,
            HealthStatus::Poor => 0.25,
            HealthStatus::Complex => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalCondition {
    pub code: String,
    pub category: ConditionCategory,
    pub severity: Scale1to5,
    pub pregnancy_relevance: Scale1to5,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MedicationProfile {
    pub categories: Vec<String>,
    pub pregnancy_safety: PregnancySafety,
    pub count: u32,
}

impl Default for MedicationProfile {
    fn default() -> Self {
        MedicationProfile {
            categories: Vec::new(),
            pregnancy_safety: PregnancySafety::Safe,
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcareUtilizationProfile {
    pub visit_frequency: VisitFrequency,
    pub primary_care_engagement: Scale1to5,
    pub specialist_utilization: Scale1to5,
    pub preventive_care_visits: u32,
    pub emergency_visits: u32,
    pub inpatient_admissions: u32,
    pub estimated_healthcare_access: Scale1to5,
}

impl Default for HealthcareUtilizationProfile {
    fn default() -> Self {
        HealthcareUtilizationProfile {
            visit_frequency: VisitFrequency::Occasional,
            primary_care_engagement: Scale1to5::MID,
            specialist_utilization: Scale1to5::MID,
            preventive_care_visits: 0,
            emergency_visits: 0,
            inpatient_admissions: 0,
            estimated_healthcare_access: Scale1to5::MID,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PregnancyProfile {
    pub has_pregnancy_codes: bool,
    pub stage: Option<PregnancyStage>,
    pub risk_level: Scale1to5,
    pub gestational_age_weeks: Option<f64>,
    pub blood_pressure_systolic: Option<f64>,
    pub blood_pressure_diastolic: Option<f64>,
    pub fetal_heart_rate: Option<f64>,
    pub maternal_weight_kg: Option<f64>,
    pub maternal_height_cm: Option<f64>,
    pub maternal_bmi: Option<f64>,
    pub weight_gain_kg: Option<f64>,
}

impl Default for PregnancyProfile {
    fn default() -> Self {
        PregnancyProfile {
            has_pregnancy_codes: false,
            stage: None,
            risk_level: Scale1to5::MIN,
            gestational_age_weeks: None,
            blood_pressure_systolic: None,
            blood_pressure_diastolic: None,
            fetal_heart_rate: None,
            maternal_weight_kg: None,
            maternal_height_cm: None,
            maternal_bmi: None,
            weight_gain_kg: None,
        }
    }
}

/// A health record's full semantic tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthRecordSemanticTree {
    pub age: Option<u32>,
    pub conditions: Vec<ClinicalCondition>,
    pub condition_categories: HashMap<ConditionCategory, usize>,
    pub chronic_disease_count: u32,
    pub acute_condition_count: u32,
    /// Summary of chronic + acute disease burden, in [0.0, 1.0]
    pub comorbidity_index: f64,
    pub medication_profile: MedicationProfile,
    pub healthcare_utilization: HealthcareUtilizationProfile,
    pub pregnancy_profile: PregnancyProfile,
    pub overall_health_status: Option<HealthStatus>,
}

impl HealthRecordSemanticTree {
    /// Validate bounded fields, clamping where needed. Non-fatal: bad values
    /// in one record never abort a load.
    pub fn validate_and_clamp(&mut self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if !(0.0..=1.0).contains(&self.comorbidity_index) || self.comorbidity_index.is_nan() {
            let clamped = if self.comorbidity_index.is_nan() {
                0.0
            } else {
                self.comorbidity_index.clamp(0.0, 1.0)
            };
            warnings.push(ValidationWarning::new(
                "comorbidity_index",
                format!(
                    "value {} outside [0.0, 1.0], clamped to {}",
                    self.comorbidity_index, clamped
                ),
            ));
            self.comorbidity_index = clamped;
        }

        for (i, condition) in self.conditions.iter_mut().enumerate() {
            clamp_scale_required(
                &mut condition.severity,
                &format!("conditions[{}].severity", i),
                &mut warnings,
            );
            clamp_scale_required(
                &mut condition.pregnancy_relevance,
                &format!("conditions[{}].pregnancy_relevance", i),
                &mut warnings,
            );
        }

        let util = &mut self.healthcare_utilization;
        clamp_scale_required(
            &mut util.primary_care_engagement,
            "healthcare_utilization.primary_care_engagement",
            &mut warnings,
        );
        clamp_scale_required(
            &mut util.specialist_utilization,
            "healthcare_utilization.specialist_utilization",
            &mut warnings,
        );
        clamp_scale_required(
            &mut util.estimated_healthcare_access,
            "healthcare_utilization.estimated_healthcare_access",
            &mut warnings,
        );

        clamp_scale_required(
            &mut self.pregnancy_profile.risk_level,
            "pregnancy_profile.risk_level",
            &mut warnings,
        );

        warnings
    }
}
