//! Optimal bipartite assignment
//!
//! Solves the assignment problem over the compatibility matrix with the
//! Kuhn-Munkres (Hungarian) algorithm from the `pathfinding` crate. Scores
//! are scaled to integers for the solver; the solver requires rows <=
//! columns, so the matrix is transposed when personas outnumber records.
//! Rectangular semantics are preserved: exactly min(N, M) pairs, bijective
//! on the matched subset. Tie-breaking among equal-total assignments is
//! solver-defined.

use crate::matrix::CompatibilityMatrix;
use pathfinding::kuhn_munkres::{kuhn_munkres, Weights};
use tracing::{info, warn};

/// Integer scaling factor applied to [0,1] scores before solving.
const SCORE_SCALE: f64 = 1_000_000.0;

/// Result of the assignment: matched pairs plus the leftover side.
#[derive(Debug, Clone)]
pub struct Assignment {
    /// (persona_idx, record_idx, compatibility_score), sorted by persona_idx
    pub pairs: Vec<(usize, usize, f64)>,
    pub unmatched_personas: Vec<usize>,
    pub unmatched_records: Vec<usize>,
}

struct ScaledWeights {
    rows: usize,
    cols: usize,
    /// Row-major, already oriented so that rows <= cols
    weights: Vec<i64>,
}

impl Weights<i64> for ScaledWeights {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.cols
    }

    fn at(&self, row: usize, col: usize) -> i64 {
        self.weights[row * self.cols + col]
    }

    fn neg(&self) -> Self {
        ScaledWeights {
            rows: self.rows,
            cols: self.cols,
            weights: self.weights.iter().map(|&w| -w).collect(),
        }
    }
}

/// Solve for the globally optimal one-to-one assignment.
pub fn solve(matrix: &CompatibilityMatrix) -> Assignment {
    let n = matrix.rows();
    let m = matrix.cols();

    if n == 0 || m == 0 {
        warn!("empty pool: {} personas, {} records; nothing to assign", n, m);
        return Assignment {
            pairs: Vec::new(),
            unmatched_personas: (0..n).collect(),
            unmatched_records: (0..m).collect(),
        };
    }

    if n > m {
        info!(
            "large pool mode: {} personas for {} records; {} personas will be unmatched",
            n,
            m,
            n - m
        );
    } else if n < m {
        warn!(
            "incomplete coverage: {} personas for {} records; {} records will be unmatched",
            n,
            m,
            m - n
        );
    }

    // The solver maximizes total weight over rows <= columns.
    let transposed = n > m;
    let (rows, cols) = if transposed { (m, n) } else { (n, m) };
    let mut weights = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let (i, j) = if transposed { (c, r) } else { (r, c) };
            weights.push((matrix.score(i, j) * SCORE_SCALE).round() as i64);
        }
    }

    let (_total, row_assignments) = kuhn_munkres(&ScaledWeights { rows, cols, weights });

    let mut pairs: Vec<(usize, usize, f64)> = row_assignments
        .iter()
        .enumerate()
        .map(|(row, &col)| {
            let (i, j) = if transposed { (col, row) } else { (row, col) };
            (i, j, matrix.score(i, j))
        })
        .collect();
    pairs.sort_by_key(|&(i, _, _)| i);

    let matched_personas: Vec<bool> = {
        let mut seen = vec![false; n];
        for &(i, _, _) in &pairs {
            seen[i] = true;
        }
        seen
    };
    let matched_records: Vec<bool> = {
        let mut seen = vec![false; m];
        for &(_, j, _) in &pairs {
            seen[j] = true;
        }
        seen
    };

    Assignment {
        pairs,
        unmatched_personas: (0..n).filter(|&i| !matched_personas[i]).collect(),
        unmatched_records: (0..m).filter(|&j| !matched_records[j]).collect(),
    }
}
