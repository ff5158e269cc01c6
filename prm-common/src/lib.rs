//! # PRM Common Library
//!
//! Shared code for the persona-record matcher including:
//! - Semantic tree data models (persona and health record)
//! - Match and score-breakdown types
//! - Matching configuration loading
//! - Common error types

pub mod config;
pub mod error;
pub mod model;

pub use config::MatchingConfig;
pub use error::{Error, Result};
