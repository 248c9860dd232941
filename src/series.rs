//! Observation series and log-return derivation.
//!
//! An [`ObservationSeries`] is the single input both pipelines consume: an
//! ordered run of daily (date, close, volume) records with strictly
//! increasing dates. Returns are always recomputed from prices on demand and
//! never stored.

use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, RiskResult};

/// A single daily price/volume observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Observation {
    /// Trading date.
    pub date: NaiveDate,
    /// Closing price; must be finite and strictly positive.
    pub close: f64,
    /// Traded volume; must be finite and non-negative.
    pub volume: f64,
}

impl Observation {
    /// Construct an observation.
    pub fn new(date: NaiveDate, close: f64, volume: f64) -> Self {
        Self {
            date,
            close,
            volume,
        }
    }
}

/// Validated, chronologically ordered series of observations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationSeries {
    observations: Vec<Observation>,
}

impl ObservationSeries {
    /// Build a series, validating chronology and value sanity.
    ///
    /// Dates must strictly increase (duplicates rejected), closes must be
    /// finite and positive, volumes finite and non-negative.
    pub fn new(observations: Vec<Observation>) -> RiskResult<Self> {
        for (i, obs) in observations.iter().enumerate() {
            if !obs.close.is_finite() || obs.close <= 0.0 {
                return Err(EngineError::InvalidParameter {
                    parameter: format!("close[{}]", i),
                    value: obs.close,
                    constraint: "finite and > 0".to_string(),
                });
            }
            if !obs.volume.is_finite() || obs.volume < 0.0 {
                return Err(EngineError::InvalidParameter {
                    parameter: format!("volume[{}]", i),
                    value: obs.volume,
                    constraint: "finite and >= 0".to_string(),
                });
            }
            if i > 0 && obs.date <= observations[i - 1].date {
                return Err(EngineError::NonChronologicalSeries { index: i });
            }
        }
        Ok(Self { observations })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the series is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// The observations in chronological order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.close).collect()
    }

    /// Volumes in chronological order.
    pub fn volumes(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.volume).collect()
    }

    /// Most recent observation, if any.
    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Most recent closing price.
    pub fn last_close(&self) -> Option<f64> {
        self.observations.last().map(|o| o.close)
    }

    /// Daily log returns: `r_t = ln(P_t / P_{t-1})`.
    ///
    /// Output length is `len() - 1`; return `i` spans observations `i` and
    /// `i + 1`. Fails with [`EngineError::InsufficientData`] for fewer than
    /// two observations. Pure; recomputed on every call.
    pub fn log_returns(&self) -> RiskResult<Vec<f64>> {
        if self.observations.len() < 2 {
            return Err(EngineError::InsufficientData {
                required: 2,
                actual: self.observations.len(),
            });
        }
        Ok(self
            .observations
            .windows(2)
            .map(|w| (w[1].close / w[0].close).ln())
            .collect())
    }
}
