//! Report output
//!
//! All run outputs are pretty-printed JSON files stamped with a UTC
//! generation time.

use crate::calibration::{CalibrationReport, ValidationReport};
use crate::io::Persona;
use crate::quality::MatchStatistics;
use chrono::{DateTime, Utc};
use prm_common::model::{Match, ScoreBreakdown};
use prm_common::{MatchingConfig, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const MATCHED_PERSONAS_FILE: &str = "matched_personas.json";
pub const QUALITY_METRICS_FILE: &str = "match_quality_metrics.json";
pub const STATISTICS_FILE: &str = "matching_statistics.json";
pub const CALIBRATION_FILE: &str = "anomaly_calibration_report.json";
pub const VALIDATION_FILE: &str = "threshold_validation_report.json";

/// Envelope adding a generation timestamp to any report body.
#[derive(Debug, Serialize)]
struct Report<T: Serialize> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body: T,
}

fn write_json<T: Serialize>(dir: &Path, file: &str, body: T) -> Result<()> {
    let report = Report {
        generated_at: Utc::now(),
        body,
    };
    let path = dir.join(file);
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json)?;
    info!("wrote {}", path.display());
    Ok(())
}

#[derive(Debug, Serialize)]
struct MatchedPersonaEntry<'a> {
    persona_idx: usize,
    persona_id: Option<&'a str>,
    record_idx: usize,
    compatibility_score: f64,
    quality: String,
}

#[derive(Debug, Serialize)]
struct MatchedPersonasBody<'a> {
    semantic_weight: f64,
    matches: Vec<MatchedPersonaEntry<'a>>,
    unmatched_personas: &'a [usize],
    unmatched_records: &'a [usize],
}

/// Write `matched_personas.json`: the assignment with quality labels.
pub fn write_matched_personas(
    dir: &Path,
    matches: &[Match],
    personas: &[Persona],
    unmatched_personas: &[usize],
    unmatched_records: &[usize],
    config: &MatchingConfig,
) -> Result<()> {
    let entries = matches
        .iter()
        .map(|m| MatchedPersonaEntry {
            persona_idx: m.persona_idx,
            persona_id: personas[m.persona_idx].id.as_deref(),
            record_idx: m.record_idx,
            compatibility_score: m.compatibility_score,
            quality: m.quality.to_string(),
        })
        .collect();
    write_json(
        dir,
        MATCHED_PERSONAS_FILE,
        MatchedPersonasBody {
            semantic_weight: config.semantic_weight,
            matches: entries,
            unmatched_personas,
            unmatched_records,
        },
    )
}

#[derive(Debug, Serialize)]
struct QualityMetricEntry {
    persona_idx: usize,
    record_idx: usize,
    compatibility_score: f64,
    quality: String,
    age_difference: Option<u32>,
    breakdown: ScoreBreakdown,
}

#[derive(Debug, Serialize)]
struct QualityMetricsBody {
    matches: Vec<QualityMetricEntry>,
}

/// Write `match_quality_metrics.json`: per-pair score breakdowns.
pub fn write_quality_metrics(dir: &Path, matches: &[Match]) -> Result<()> {
    let entries = matches
        .iter()
        .map(|m| QualityMetricEntry {
            persona_idx: m.persona_idx,
            record_idx: m.record_idx,
            compatibility_score: m.compatibility_score,
            quality: m.quality.to_string(),
            age_difference: m.age_difference,
            breakdown: m.breakdown,
        })
        .collect();
    write_json(dir, QUALITY_METRICS_FILE, QualityMetricsBody { matches: entries })
}

#[derive(Debug, Serialize)]
struct StatisticsBody<'a> {
    persona_count: usize,
    record_count: usize,
    semantic_weight: f64,
    statistics: &'a MatchStatistics,
}

/// Write `matching_statistics.json`: batch descriptive statistics.
pub fn write_statistics(
    dir: &Path,
    statistics: &MatchStatistics,
    persona_count: usize,
    record_count: usize,
    config: &MatchingConfig,
) -> Result<()> {
    write_json(
        dir,
        STATISTICS_FILE,
        StatisticsBody {
            persona_count,
            record_count,
            semantic_weight: config.semantic_weight,
            statistics,
        },
    )
}

/// Write `anomaly_calibration_report.json`.
pub fn write_calibration_report(dir: &Path, report: &CalibrationReport) -> Result<()> {
    write_json(dir, CALIBRATION_FILE, report)
}

/// Write `threshold_validation_report.json`.
pub fn write_validation_report(dir: &Path, report: &ValidationReport) -> Result<()> {
    write_json(dir, VALIDATION_FILE, report)
}
