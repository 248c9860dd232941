//! Engine configuration.
//!
//! Plain data structs with sensible defaults; both engines take their config
//! by reference so one config can drive a whole batch of instruments.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::RiskResult;
use crate::regime::ClassifierConfig;

/// Configuration for regime analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegimeConfig {
    /// Return thresholds for regime assignment.
    pub classifier: ClassifierConfig,
    /// Minimum labeled returns required (default 50).
    pub min_history: usize,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            min_history: 50,
        }
    }
}

impl RegimeConfig {
    /// Validate thresholds.
    pub fn validate(&self) -> RiskResult<()> {
        self.classifier.validate()
    }
}

/// Configuration for Monte Carlo risk simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiskConfig {
    /// Simulation horizon in trading days (default 30).
    pub horizon_days: usize,
    /// Number of independent price paths (default 10 000).
    pub path_count: usize,
    /// Minimum returns required to parameterize the simulation (default 30).
    pub min_history: usize,
    /// Fixed RNG seed; `None` draws one from OS entropy. Identical seeds
    /// reproduce identical ensembles.
    pub rng_seed: Option<u64>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            path_count: 10_000,
            min_history: 30,
            rng_seed: None,
        }
    }
}
