//! Match types derived from a matching run
//!
//! Matches are recomputed fresh each run and never persisted as mutable
//! state.

use serde::{Deserialize, Serialize};

/// Coarse quality bucket for a match, by compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityCategory {
    /// Inclusive lower bounds, checked top-down:
    /// >= 0.85 excellent, >= 0.75 good, >= 0.65 fair, else poor.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            QualityCategory::Excellent
        } else if score >= 0.75 {
            QualityCategory::Good
        } else if score >= 0.65 {
            QualityCategory::Fair
        } else {
            QualityCategory::Poor
        }
    }
}

impl std::fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityCategory::Excellent => write!(f, "excellent"),
            QualityCategory::Good => write!(f, "good"),
            QualityCategory::Fair => write!(f, "fair"),
            QualityCategory::Poor => write!(f, "poor"),
        }
    }
}

/// Component scores of the demographic compatibility model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    pub age: f64,
    pub education: f64,
    pub income: f64,
    pub marital_status: f64,
    pub occupation: f64,
    pub total: f64,
}

/// Component scores of the semantic tree compatibility model.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SemanticBreakdown {
    pub demographics: f64,
    pub socioeconomic: f64,
    pub health_profile: f64,
    pub behavioral: f64,
    pub psychosocial: f64,
    pub total: f64,
}

/// Full named breakdown for one (persona, record) pair.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub demographic: DemographicBreakdown,
    pub semantic: SemanticBreakdown,
    /// Blended score: demographic*(1-w) + semantic*w
    pub combined: f64,
}

/// One matched (persona, record) pair with its quality label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub persona_idx: usize,
    pub record_idx: usize,
    pub compatibility_score: f64,
    pub quality: QualityCategory,
    pub breakdown: ScoreBreakdown,
    /// |persona age - record age|; absent when either age is missing
    pub age_difference: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_boundaries() {
        assert_eq!(QualityCategory::from_score(0.85), QualityCategory::Excellent);
        assert_eq!(QualityCategory::from_score(0.8499), QualityCategory::Good);
        assert_eq!(QualityCategory::from_score(0.75), QualityCategory::Good);
        assert_eq!(QualityCategory::from_score(0.65), QualityCategory::Fair);
        assert_eq!(QualityCategory::from_score(0.6499), QualityCategory::Poor);
        assert_eq!(QualityCategory::from_score(0.0), QualityCategory::Poor);
        assert_eq!(QualityCategory::from_score(1.0), QualityCategory::Excellent);
    }

    #[test]
    fn test_quality_display() {
        assert_eq!(QualityCategory::Excellent.to_string(), "excellent");
        assert_eq!(QualityCategory::Poor.to_string(), "poor");
    }
}
