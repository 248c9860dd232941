//! Market regime labels and the threshold classifier.
//!
//! A regime is a discrete market-condition label inferred from the magnitude
//! of a single daily log return. Three states with a fixed ordering keep the
//! transition matrix a mechanically checkable 3x3 array rather than a keyed
//! map.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, RiskResult};

/// Number of regime states. Fixed; the transition matrix is `3x3`.
pub const STATE_COUNT: usize = 3;

/// Discrete market regime label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Regime {
    /// Daily log return above the high threshold.
    Bull,
    /// Daily log return below the low threshold.
    Bear,
    /// Everything in between.
    Sideways,
}

impl Regime {
    /// All states in canonical matrix order: `[Bull, Bear, Sideways]`.
    pub const ALL: [Regime; STATE_COUNT] = [Regime::Bull, Regime::Bear, Regime::Sideways];

    /// Row/column index of this state in the canonical ordering.
    pub fn index(self) -> usize {
        match self {
            Regime::Bull => 0,
            Regime::Bear => 1,
            Regime::Sideways => 2,
        }
    }

    /// State for a canonical index, if in range.
    pub fn from_index(index: usize) -> Option<Regime> {
        Regime::ALL.get(index).copied()
    }

    /// Uppercase wire label used by reporting consumers.
    pub fn label(self) -> &'static str {
        match self {
            Regime::Bull => "BULL",
            Regime::Bear => "BEAR",
            Regime::Sideways => "SIDEWAYS",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Return thresholds for regime assignment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassifierConfig {
    /// Returns strictly above this are Bull.
    pub high_threshold: f64,
    /// Returns strictly below this are Bear.
    pub low_threshold: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.02,
            low_threshold: -0.02,
        }
    }
}

impl ClassifierConfig {
    /// Validate that the thresholds are finite and ordered.
    pub fn validate(&self) -> RiskResult<()> {
        if !self.high_threshold.is_finite() {
            return Err(EngineError::InvalidParameter {
                parameter: "high_threshold".to_string(),
                value: self.high_threshold,
                constraint: "finite".to_string(),
            });
        }
        if !self.low_threshold.is_finite() {
            return Err(EngineError::InvalidParameter {
                parameter: "low_threshold".to_string(),
                value: self.low_threshold,
                constraint: "finite".to_string(),
            });
        }
        if self.low_threshold >= self.high_threshold {
            return Err(EngineError::InvalidParameter {
                parameter: "low_threshold".to_string(),
                value: self.low_threshold,
                constraint: format!("< high_threshold ({})", self.high_threshold),
            });
        }
        Ok(())
    }

    /// Classify one daily log return.
    pub fn classify(&self, log_return: f64) -> Regime {
        if log_return > self.high_threshold {
            Regime::Bull
        } else if log_return < self.low_threshold {
            Regime::Bear
        } else {
            Regime::Sideways
        }
    }

    /// Classify a full return series, preserving order.
    pub fn classify_series(&self, returns: &[f64]) -> Vec<Regime> {
        returns.iter().map(|&r| self.classify(r)).collect()
    }
}
