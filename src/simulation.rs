//! Monte Carlo terminal-price simulation under geometric Brownian motion.
//!
//! Each of N independent paths walks H daily GBM steps and keeps only its
//! terminal simple return; intra-path prices are discarded. Paths are
//! independent units of work: under the `parallel` feature they are
//! distributed over the rayon pool with a deterministic per-path seed
//! derived from the base seed, so a given seed reproduces the identical
//! ensemble whether execution is parallel or sequential. Cancellation is
//! cooperative and checked between path batches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::{validate_all_finite, EngineError, RiskResult};
use crate::math_utils::{mean, population_std};
use crate::rng::{derive_path_seed, PathRng};

/// Trading days per year; one simulation step is `1 / 252` of a year.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Paths simulated between cancellation checks.
const PATH_BATCH: usize = 1024;

/// Parameters for one simulation run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationParameters {
    /// Spot price at the start of every path; must be positive.
    pub current_price: f64,
    /// Annualized drift (mu).
    pub annual_drift: f64,
    /// Annualized volatility (sigma); must be non-negative.
    pub annual_volatility: f64,
    /// Horizon in trading days; at least 1.
    pub horizon_days: usize,
    /// Number of independent paths; at least 1.
    pub path_count: usize,
}

impl SimulationParameters {
    /// Validate all parameter constraints.
    pub fn validate(&self) -> RiskResult<()> {
        if !self.current_price.is_finite() || self.current_price <= 0.0 {
            return Err(EngineError::InvalidParameter {
                parameter: "current_price".to_string(),
                value: self.current_price,
                constraint: "finite and > 0".to_string(),
            });
        }
        if !self.annual_drift.is_finite() {
            return Err(EngineError::InvalidParameter {
                parameter: "annual_drift".to_string(),
                value: self.annual_drift,
                constraint: "finite".to_string(),
            });
        }
        if !self.annual_volatility.is_finite() || self.annual_volatility < 0.0 {
            return Err(EngineError::InvalidParameter {
                parameter: "annual_volatility".to_string(),
                value: self.annual_volatility,
                constraint: "finite and >= 0".to_string(),
            });
        }
        if self.horizon_days < 1 {
            return Err(EngineError::InvalidParameter {
                parameter: "horizon_days".to_string(),
                value: self.horizon_days as f64,
                constraint: ">= 1".to_string(),
            });
        }
        if self.path_count < 1 {
            return Err(EngineError::InvalidParameter {
                parameter: "path_count".to_string(),
                value: self.path_count as f64,
                constraint: ">= 1".to_string(),
            });
        }
        Ok(())
    }

    /// Derive parameters from a daily log-return series.
    ///
    /// Annualizes the sample mean (x252) and population standard deviation
    /// (x sqrt(252)). Requires at least `min_history` returns, else
    /// [`EngineError::InsufficientHistory`].
    pub fn from_returns(
        returns: &[f64],
        current_price: f64,
        horizon_days: usize,
        path_count: usize,
        min_history: usize,
    ) -> RiskResult<Self> {
        if returns.len() < min_history {
            return Err(EngineError::InsufficientHistory {
                stage: "simulation",
                required: min_history,
                actual: returns.len(),
            });
        }
        validate_all_finite(returns, "returns")?;

        let params = Self {
            current_price,
            annual_drift: mean(returns) * TRADING_DAYS_PER_YEAR,
            annual_volatility: population_std(returns) * TRADING_DAYS_PER_YEAR.sqrt(),
            horizon_days,
            path_count,
        };
        params.validate()?;
        Ok(params)
    }
}

/// Cooperative cancellation token checked between path batches.
///
/// Cloning shares the flag; any clone can cancel a running simulation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, uncancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Transient collection of per-path terminal simple returns.
///
/// Discarded once risk metrics have been derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedPathEnsemble {
    /// Terminal simple return of each path, in path-index order.
    pub terminal_returns: Vec<f64>,
    /// Horizon the paths were simulated over, in trading days.
    pub horizon_days: usize,
}

impl SimulatedPathEnsemble {
    /// Number of simulated paths.
    pub fn len(&self) -> usize {
        self.terminal_returns.len()
    }

    /// Whether the ensemble holds no paths.
    pub fn is_empty(&self) -> bool {
        self.terminal_returns.is_empty()
    }
}

/// GBM terminal-price Monte Carlo simulator.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    params: SimulationParameters,
}

impl MonteCarloSimulator {
    /// Create a simulator, validating the parameters up front.
    pub fn new(params: SimulationParameters) -> RiskResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The validated parameters.
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Simulate the full ensemble.
    ///
    /// `seed` fixes the base seed; `None` draws one from OS entropy.
    /// Identical seeds reproduce identical ensembles.
    pub fn simulate(&self, seed: Option<u64>) -> RiskResult<SimulatedPathEnsemble> {
        self.simulate_with_cancellation(seed, None)
    }

    /// Simulate with a cooperative cancellation token.
    ///
    /// The token is polled between fixed-size path batches; a
    /// triggered token aborts with [`EngineError::Cancelled`] and the count
    /// of paths completed so far.
    pub fn simulate_with_cancellation(
        &self,
        seed: Option<u64>,
        cancel: Option<&CancellationToken>,
    ) -> RiskResult<SimulatedPathEnsemble> {
        let base_seed = seed.unwrap_or_else(PathRng::random_seed);
        let p = &self.params;

        let dt = 1.0 / TRADING_DAYS_PER_YEAR;
        let drift_step = (p.annual_drift - 0.5 * p.annual_volatility * p.annual_volatility) * dt;
        let vol_step = p.annual_volatility * dt.sqrt();

        let mut terminal_returns = Vec::with_capacity(p.path_count);
        let mut start = 0usize;
        while start < p.path_count {
            if let Some(token) = cancel {
                if token.is_cancelled() {
                    return Err(EngineError::Cancelled {
                        completed_paths: start,
                        total_paths: p.path_count,
                    });
                }
            }
            let end = (start + PATH_BATCH).min(p.path_count);

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                terminal_returns.par_extend((start..end).into_par_iter().map(|i| {
                    simulate_terminal_return(p, drift_step, vol_step, derive_path_seed(base_seed, i as u64))
                }));
            }

            #[cfg(not(feature = "parallel"))]
            {
                for i in start..end {
                    terminal_returns.push(simulate_terminal_return(
                        p,
                        drift_step,
                        vol_step,
                        derive_path_seed(base_seed, i as u64),
                    ));
                }
            }

            start = end;
        }

        Ok(SimulatedPathEnsemble {
            terminal_returns,
            horizon_days: p.horizon_days,
        })
    }
}

/// Walk one path and return its terminal simple return.
fn simulate_terminal_return(
    params: &SimulationParameters,
    drift_step: f64,
    vol_step: f64,
    path_seed: u64,
) -> f64 {
    let mut rng = PathRng::with_seed(path_seed);
    let mut price = params.current_price;
    for _ in 0..params.horizon_days {
        let z = rng.standard_normal();
        price *= (drift_step + vol_step * z).exp();
    }
    (price - params.current_price) / params.current_price
}
