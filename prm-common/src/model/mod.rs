//! Semantic tree data models
//!
//! Typed, immutable attribute trees for personas and health records, plus
//! the match types derived from them. Trees are deserialized once at load
//! time, validated (non-fatally), and never mutated afterwards.

pub mod matching;
pub mod persona;
pub mod record;

pub use matching::{
    DemographicBreakdown, Match, QualityCategory, ScoreBreakdown, SemanticBreakdown,
};
pub use persona::PersonaSemanticTree;
pub use record::HealthRecordSemanticTree;

use serde::{Deserialize, Serialize};

/// A bounded 1..=5 ordinal scale value.
///
/// Deserialization accepts any u8; out-of-range values are clamped during
/// tree validation with a recorded warning rather than failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scale1to5(u8);

impl Scale1to5 {
    /// Scale minimum (1).
    pub const MIN: Scale1to5 = Scale1to5(1);
    /// Scale midpoint (3), used as the neutral default.
    pub const MID: Scale1to5 = Scale1to5(3);

    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Scale1to5(value))
    }

    /// Construct by clamping into range. Returns the value and whether
    /// clamping was needed.
    pub fn clamped(value: u8) -> (Self, bool) {
        let clamped = value.clamp(1, 5);
        (Scale1to5(clamped), clamped != value)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Normalize to [0.0, 1.0]: 1 -> 0.0, 5 -> 1.0
    pub fn normalized(self) -> f64 {
        (self.0 as f64 - 1.0) / 4.0
    }
}

/// A non-fatal problem found while validating a loaded tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Dotted path of the offending field (e.g. "health_profile.healthcare_access")
    pub field: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        ValidationWarning {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Clamp a required scale field in place, recording a warning if needed.
pub(crate) fn clamp_scale_required(
    value: &mut Scale1to5,
    field: &str,
    warnings: &mut Vec<ValidationWarning>,
) {
    let raw = value.get();
    let (clamped, changed) = Scale1to5::clamped(raw);
    if changed {
        warnings.push(ValidationWarning::new(
            field,
            format!("value {} outside 1..=5, clamped to {}", raw, clamped.get()),
        ));
        *value = clamped;
    }
}

/// Clamp an optional scale field in place, recording a warning if needed.
pub(crate) fn clamp_scale(
    value: &mut Option<Scale1to5>,
    field: &str,
    warnings: &mut Vec<ValidationWarning>,
) {
    if let Some(v) = value {
        let raw = v.get();
        let (clamped, changed) = Scale1to5::clamped(raw);
        if changed {
            warnings.push(ValidationWarning::new(
                field,
                format!("value {} outside 1..=5, clamped to {}", raw, clamped.get()),
            ));
            *value = Some(clamped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_bounds() {
        assert!(Scale1to5::new(0).is_none());
        assert!(Scale1to5::new(6).is_none());
        assert_eq!(Scale1to5::new(3).unwrap().get(), 3);
    }

    #[test]
    fn test_scale_normalized() {
        assert_eq!(Scale1to5::new(1).unwrap().normalized(), 0.0);
        assert_eq!(Scale1to5::new(5).unwrap().normalized(), 1.0);
        assert_eq!(Scale1to5::new(3).unwrap().normalized(), 0.5);
    }

    #[test]
    fn test_scale_clamped() {
        assert_eq!(Scale1to5::clamped(9), (Scale1to5::new(5).unwrap(), true));
        assert_eq!(Scale1to5::clamped(0), (Scale1to5::new(1).unwrap(), true));
        assert_eq!(Scale1to5::clamped(2), (Scale1to5::new(2).unwrap(), false));
    }
}
