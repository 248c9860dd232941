//! Empirical regime transition matrix.
//!
//! The matrix is a fixed 3x3 row-stochastic array over the canonical state
//! ordering `[Bull, Bear, Sideways]`. Estimation counts consecutive label
//! pairs and row-normalizes; a state never observed as a transition source
//! gets a uniform row. That fallback keeps sparse batches alive but biases
//! steady-state and entropy estimates when data is thin, so it is documented
//! rather than silent.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::regime::{Regime, STATE_COUNT};

/// Tolerance for the row-stochastic invariant.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Row-stochastic 3x3 regime transition matrix.
///
/// `rows[from][to]` is the estimated probability of moving from state
/// `from` to state `to` across one period. Every row sums to
/// `1.0 ± ROW_SUM_TOLERANCE`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TransitionMatrix {
    rows: [[f64; STATE_COUNT]; STATE_COUNT],
}

impl TransitionMatrix {
    /// Estimate the matrix from a chronological label sequence.
    ///
    /// Counts `labels[i] -> labels[i + 1]` transitions, then row-normalizes.
    /// A zero row sum (state never a source) becomes the uniform 1/3 row.
    /// Fewer than two labels yield the all-uniform matrix.
    pub fn estimate(labels: &[Regime]) -> Self {
        let mut counts = [[0u64; STATE_COUNT]; STATE_COUNT];
        for pair in labels.windows(2) {
            counts[pair[0].index()][pair[1].index()] += 1;
        }

        let mut rows = [[0.0; STATE_COUNT]; STATE_COUNT];
        for from in 0..STATE_COUNT {
            let row_total: u64 = counts[from].iter().sum();
            if row_total == 0 {
                rows[from] = [1.0 / STATE_COUNT as f64; STATE_COUNT];
            } else {
                for to in 0..STATE_COUNT {
                    rows[from][to] = counts[from][to] as f64 / row_total as f64;
                }
            }
        }

        let matrix = Self { rows };
        debug_assert!(matrix.is_row_stochastic());
        matrix
    }

    /// Build directly from rows. Intended for tests and deserialized inputs;
    /// the row-stochastic invariant is asserted in debug builds only.
    pub fn from_rows(rows: [[f64; STATE_COUNT]; STATE_COUNT]) -> Self {
        let matrix = Self { rows };
        debug_assert!(matrix.is_row_stochastic());
        matrix
    }

    /// Probability of transitioning from `from` to `to`.
    pub fn prob(&self, from: Regime, to: Regime) -> f64 {
        self.rows[from.index()][to.index()]
    }

    /// One outbound probability row.
    pub fn row(&self, from: Regime) -> [f64; STATE_COUNT] {
        self.rows[from.index()]
    }

    /// Self-transition probability of a state.
    pub fn self_transition(&self, state: Regime) -> f64 {
        let i = state.index();
        self.rows[i][i]
    }

    /// Raw row-major probabilities.
    pub fn as_rows(&self) -> &[[f64; STATE_COUNT]; STATE_COUNT] {
        &self.rows
    }

    /// Whether every row sums to 1 within [`ROW_SUM_TOLERANCE`].
    pub fn is_row_stochastic(&self) -> bool {
        self.rows
            .iter()
            .all(|row| (row.iter().sum::<f64>() - 1.0).abs() <= ROW_SUM_TOLERANCE)
    }

    /// Shannon entropy of the matrix in bits: `sum(-p * log2(p))` over all
    /// nonzero entries. Lower entropy means more deterministic dynamics.
    pub fn shannon_entropy(&self) -> f64 {
        self.rows
            .iter()
            .flatten()
            .filter(|&&p| p > 0.0)
            .map(|&p| -p * p.log2())
            .sum()
    }

    /// Mean self-transition probability across states ("persistence").
    pub fn mean_self_transition(&self) -> f64 {
        (0..STATE_COUNT).map(|i| self.rows[i][i]).sum::<f64>() / STATE_COUNT as f64
    }

    /// Approximate long-run state distribution via column averaging.
    ///
    /// This averages each column over the three rows and renormalizes. It is
    /// an approximation of the true stationary distribution (which solves
    /// `pi = pi * P`), kept for behavioral parity with existing consumers;
    /// the two differ for asymmetric matrices.
    pub fn steady_state_approximation(&self) -> [f64; STATE_COUNT] {
        let mut column_means = [0.0; STATE_COUNT];
        for to in 0..STATE_COUNT {
            for from in 0..STATE_COUNT {
                column_means[to] += self.rows[from][to];
            }
            column_means[to] /= STATE_COUNT as f64;
        }

        let total: f64 = column_means.iter().sum();
        if total > 0.0 {
            for p in column_means.iter_mut() {
                *p /= total;
            }
        }
        column_means
    }
}
