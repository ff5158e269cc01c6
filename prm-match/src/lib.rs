//! prm-match - Persona / Clinical-Record Matching Engine
//!
//! Assigns synthetic personas to synthetic clinical records so that
//! downstream interview generation operates on demographically and
//! clinically plausible pairs.
//!
//! Pipeline stages, each a pure transformation of the previous stage:
//! - `scoring` - pairwise demographic + semantic similarity
//! - `matrix` - full NxM compatibility matrix
//! - `assignment` - globally optimal one-to-one assignment (rectangular)
//! - `quality` - per-match quality labels and batch statistics
//! - `calibration` - anomaly-threshold derivation and regression validation
//! - `io` / `reports` - JSON input loading and report output

pub mod assignment;
pub mod calibration;
pub mod io;
pub mod matrix;
pub mod quality;
pub mod reports;
pub mod scoring;
