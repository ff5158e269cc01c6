//! Matching configuration loading and parameter resolution
//!
//! Parameter resolution follows the priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (handled by the CLI layer)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weights for the demographic compatibility model.
///
/// Defaults: age 0.40, education 0.20, income 0.15, marital status 0.15,
/// occupation 0.10. The weighted sum is normalized by `sum()` so overridden
/// weights need not total exactly 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicWeights {
    pub age: f64,
    pub education: f64,
    pub income: f64,
    pub marital_status: f64,
    pub occupation: f64,
}

impl Default for DemographicWeights {
    fn default() -> Self {
        DemographicWeights {
            age: 0.40,
            education: 0.20,
            income: 0.15,
            marital_status: 0.15,
            occupation: 0.10,
        }
    }
}

impl DemographicWeights {
    pub fn sum(&self) -> f64 {
        self.age + self.education + self.income + self.marital_status + self.occupation
    }
}

/// Weights for the semantic tree compatibility model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticWeights {
    pub demographics: f64,
    pub socioeconomic: f64,
    pub health_profile: f64,
    pub behavioral: f64,
    pub psychosocial: f64,
}

impl Default for SemanticWeights {
    fn default() -> Self {
        SemanticWeights {
            demographics: 0.25,
            socioeconomic: 0.15,
            health_profile: 0.30,
            behavioral: 0.15,
            psychosocial: 0.15,
        }
    }
}

impl SemanticWeights {
    pub fn sum(&self) -> f64 {
        self.demographics
            + self.socioeconomic
            + self.health_profile
            + self.behavioral
            + self.psychosocial
    }
}

/// Full matching configuration.
///
/// `semantic_weight` blends the two models: 0.0 is pure demographic,
/// 1.0 is pure semantic.
///
/// Both models normalize their weighted sums by the weight total, so
/// overridden weight tables need not sum to 1.0 — only the ratios between
/// weights matter, and scores stay in [0.0, 1.0] under any override. With
/// the default tables (sum 1.0) this is a plain weighted sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Blend between demographic (0.0) and semantic (1.0) models
    pub semantic_weight: f64,

    /// Age tolerance in years for the age-decay curve
    pub age_tolerance: u32,

    pub demographic_weights: DemographicWeights,
    pub semantic_weights: SemanticWeights,

    /// Calibrated anomaly threshold, if one has been derived for this corpus.
    /// Threaded through to threshold validation; never a module global.
    pub anomaly_threshold: Option<f64>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            semantic_weight: 0.6,
            age_tolerance: 2,
            demographic_weights: DemographicWeights::default(),
            semantic_weights: SemanticWeights::default(),
            anomaly_threshold: None,
        }
    }
}

impl MatchingConfig {
    /// Load configuration from a TOML file. Missing keys fall back to defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read config file {}: {}", path.display(), e))
        })?;
        let config: MatchingConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid config file {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.semantic_weight) {
            return Err(Error::Config(format!(
                "semantic_weight must be in [0.0, 1.0], got {}",
                self.semantic_weight
            )));
        }
        if self.age_tolerance == 0 {
            return Err(Error::Config("age_tolerance must be >= 1".to_string()));
        }
        if self.demographic_weights.sum() <= 0.0 {
            return Err(Error::Config(
                "demographic weights must sum to a positive value".to_string(),
            ));
        }
        if self.semantic_weights.sum() <= 0.0 {
            return Err(Error::Config(
                "semantic weights must sum to a positive value".to_string(),
            ));
        }
        if let Some(t) = self.anomaly_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(Error::Config(format!(
                    "anomaly_threshold must be in [0.0, 1.0], got {}",
                    t
                )));
            }
        }
        Ok(())
    }
}
