//! Anomaly-threshold calibration and validation
//!
//! Derives a data-driven anomaly threshold from a representative run's
//! score distribution and regression-tests it against categorized edge
//! cases. Calibration runs over all pairwise scores, not just the optimal
//! assignment: the goal is detecting a pathological assignment, not merely
//! a low pairwise score.

pub mod outliers;
pub mod stats;
pub mod threshold;
pub mod validator;

pub use threshold::{calibrate, CalibrationReport};
pub use validator::{validate_threshold, ValidationReport};
