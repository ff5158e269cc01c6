//! prm-match - Persona / Clinical-Record Matching CLI
//!
//! Loads a persona pool and a health-record pool, computes the blended
//! compatibility matrix, solves the optimal assignment, classifies match
//! quality, and writes the JSON reports. With `--calibrate` it also derives
//! an anomaly threshold from the full score distribution and regression-
//! validates it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prm_common::MatchingConfig;
use prm_match::{assignment, calibration, io, matrix, quality, reports};

/// Command-line arguments for prm-match
#[derive(Parser, Debug)]
#[command(name = "prm-match")]
#[command(about = "Optimal persona-to-clinical-record matching")]
#[command(version)]
struct Args {
    /// Persona pool JSON file (array of objects with a semantic_tree)
    #[arg(short, long, env = "PRM_PERSONAS")]
    personas: PathBuf,

    /// Health-record pool JSON file (array of extracted semantic trees)
    #[arg(short, long, env = "PRM_RECORDS")]
    records: PathBuf,

    /// Directory for generated reports
    #[arg(short, long, default_value = ".", env = "PRM_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Optional TOML config file with matching parameters
    #[arg(short, long, env = "PRM_CONFIG")]
    config: Option<PathBuf>,

    /// Blend between demographic (0.0) and semantic (1.0) models
    #[arg(long, env = "PRM_SEMANTIC_WEIGHT")]
    semantic_weight: Option<f64>,

    /// Use the semantic model only (equivalent to --semantic-weight 1.0)
    #[arg(long)]
    semantic_only: bool,

    /// Derive and validate an anomaly threshold from this run
    #[arg(long)]
    calibrate: bool,

    /// Anomaly threshold to validate instead of the calibrated one
    #[arg(long, env = "PRM_ANOMALY_THRESHOLD")]
    anomaly_threshold: Option<f64>,
}

fn resolve_config(args: &Args) -> Result<MatchingConfig> {
    // Priority: CLI/env flag > config file > compiled default
    let mut config = match &args.config {
        Some(path) => MatchingConfig::from_toml_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => MatchingConfig::default(),
    };
    if let Some(weight) = args.semantic_weight {
        config.semantic_weight = weight;
    }
    if args.semantic_only {
        config.semantic_weight = 1.0;
    }
    if let Some(threshold) = args.anomaly_threshold {
        config.anomaly_threshold = Some(threshold);
    }
    config.validate().context("invalid matching configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prm_match=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    info!("Starting prm-match");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Semantic weight: {:.2}{}",
        config.semantic_weight,
        if args.semantic_only { " (semantic only)" } else { "" }
    );

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!("failed to create output directory {}", args.output_dir.display())
    })?;

    let personas =
        io::load_personas(&args.personas).context("failed to load persona pool")?;
    let records =
        io::load_health_records(&args.records).context("failed to load health-record pool")?;

    let matrix = matrix::build_matrix(&personas.items, &records.items, &config);
    let assignment = assignment::solve(&matrix);
    info!(
        "assigned {} pairs ({} personas unmatched, {} records unmatched)",
        assignment.pairs.len(),
        assignment.unmatched_personas.len(),
        assignment.unmatched_records.len()
    );

    let matches =
        quality::classify_matches(&assignment, &matrix, &personas.items, &records.items);
    let statistics = quality::compute_statistics(&matches);
    info!(
        "quality: {} excellent, {} good, {} fair, {} poor (mean score {:.4})",
        statistics.quality.excellent,
        statistics.quality.good,
        statistics.quality.fair,
        statistics.quality.poor,
        statistics.scores.mean
    );

    reports::write_matched_personas(
        &args.output_dir,
        &matches,
        &personas.items,
        &assignment.unmatched_personas,
        &assignment.unmatched_records,
        &config,
    )?;
    reports::write_quality_metrics(&args.output_dir, &matches)?;
    reports::write_statistics(
        &args.output_dir,
        &statistics,
        personas.items.len(),
        records.items.len(),
        &config,
    )?;

    if args.calibrate || config.anomaly_threshold.is_some() {
        let calibration_report =
            calibration::calibrate(matrix.all_scores(), &matrix.best_match_scores());
        reports::write_calibration_report(&args.output_dir, &calibration_report)?;

        // A threshold passed as configuration wins over the freshly
        // calibrated recommendation
        let threshold = config
            .anomaly_threshold
            .unwrap_or(calibration_report.recommended_threshold);
        let persona_ages: Vec<Option<u32>> = personas
            .items
            .iter()
            .map(|p| p.semantic_tree.as_ref().and_then(|t| t.demographics.age))
            .collect();
        let record_ages: Vec<Option<u32>> = records.items.iter().map(|r| r.age).collect();
        let validation_report =
            calibration::validate_threshold(&matrix, &persona_ages, &record_ages, threshold);
        reports::write_validation_report(&args.output_dir, &validation_report)?;

        if !validation_report.passed {
            info!("threshold validation failed; review the validation report");
        }
    }

    info!("Done");
    Ok(())
}
