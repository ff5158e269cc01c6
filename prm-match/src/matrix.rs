//! Compatibility matrix build
//!
//! Computes the full NxM blended score matrix over a persona pool and a
//! record pool, with a parallel per-cell breakdown store for reporting.
//! A bad cell never aborts the build: it is scored neutral and logged.

use crate::io::Persona;
use crate::scoring::{self, NEUTRAL_SCORE};
use prm_common::model::record::HealthRecordSemanticTree;
use prm_common::model::ScoreBreakdown;
use prm_common::MatchingConfig;
use tracing::{info, warn};

/// Row-major NxM score matrix (rows = personas, columns = records) with
/// per-cell breakdowns.
pub struct CompatibilityMatrix {
    rows: usize,
    cols: usize,
    scores: Vec<f64>,
    breakdowns: Vec<ScoreBreakdown>,
}

impl CompatibilityMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn score(&self, persona_idx: usize, record_idx: usize) -> f64 {
        self.scores[persona_idx * self.cols + record_idx]
    }

    pub fn breakdown(&self, persona_idx: usize, record_idx: usize) -> &ScoreBreakdown {
        &self.breakdowns[persona_idx * self.cols + record_idx]
    }

    /// All NxM pairwise scores in row-major order.
    pub fn all_scores(&self) -> &[f64] {
        &self.scores
    }

    /// Each persona's best pairwise score (row maximum).
    pub fn best_match_scores(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|i| {
                (0..self.cols)
                    .map(|j| self.score(i, j))
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect()
    }
}

/// Build the full compatibility matrix.
///
/// Personas without a semantic tree score neutral on both models; that
/// condition is warned once per run, not once per cell. Non-finite cell
/// results are replaced with neutral and warned per cell.
pub fn build_matrix(
    personas: &[Persona],
    records: &[HealthRecordSemanticTree],
    config: &MatchingConfig,
) -> CompatibilityMatrix {
    let rows = personas.len();
    let cols = records.len();
    let mut scores = Vec::with_capacity(rows * cols);
    let mut breakdowns = Vec::with_capacity(rows * cols);
    let mut warned_missing_tree = false;

    info!(
        "Building compatibility matrix: {} personas x {} records (semantic weight {:.2})",
        rows, cols, config.semantic_weight
    );

    for (i, persona) in personas.iter().enumerate() {
        if persona.semantic_tree.is_none() && !warned_missing_tree {
            warn!("one or more personas lack a semantic tree; scoring them as neutral");
            warned_missing_tree = true;
        }

        for (j, record) in records.iter().enumerate() {
            let mut breakdown =
                scoring::score_pair(persona.semantic_tree.as_ref(), record, config);
            if !breakdown.combined.is_finite() {
                warn!(
                    "non-finite score for persona {} / record {}; using neutral",
                    i, j
                );
                breakdown = ScoreBreakdown::default();
                breakdown.demographic.total = NEUTRAL_SCORE;
                breakdown.semantic.total = NEUTRAL_SCORE;
                breakdown.combined = NEUTRAL_SCORE;
            }
            scores.push(breakdown.combined);
            breakdowns.push(breakdown);
        }

        // Operator visibility on large pools
        if (i + 1) % 1000 == 0 {
            info!("matrix build progress: {}/{} personas scored", i + 1, rows);
        }
    }

    CompatibilityMatrix {
        rows,
        cols,
        scores,
        breakdowns,
    }
}
