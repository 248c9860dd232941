//! Engine entry points and batch orchestration.
//!
//! The core exposes exactly two call contracts — [`run_regime_analysis`]
//! re-exported from the analytics module and [`run_monte_carlo_risk`]
//! defined here — plus a thin [`RiskEngine`] that drives both across a
//! batch of instruments. Errors are terminal per instrument: the batch
//! runner logs the failure, skips the symbol, and continues.

use std::collections::HashMap;

use crate::config::{RegimeConfig, RiskConfig};
use crate::errors::{EngineError, RiskResult};
use crate::risk::RiskReport;
use crate::series::ObservationSeries;
use crate::simulation::{CancellationToken, MonteCarloSimulator, SimulationParameters};

pub use crate::analytics::run_regime_analysis;
use crate::analytics::RegimeAnalysisResult;

/// Run the Monte Carlo risk pipeline over one instrument's series.
///
/// Derives GBM parameters (annualized drift and volatility) from the
/// series' log returns, simulates `config.path_count` terminal prices over
/// `config.horizon_days`, and reduces the ensemble to a [`RiskReport`].
/// With `config.rng_seed` fixed the report is fully reproducible.
pub fn run_monte_carlo_risk(
    series: &ObservationSeries,
    config: &RiskConfig,
) -> RiskResult<RiskReport> {
    run_monte_carlo_risk_cancellable(series, config, None)
}

/// [`run_monte_carlo_risk`] with a cooperative cancellation token for
/// embedding in time-boxed schedulers.
pub fn run_monte_carlo_risk_cancellable(
    series: &ObservationSeries,
    config: &RiskConfig,
    cancel: Option<&CancellationToken>,
) -> RiskResult<RiskReport> {
    let returns = series.log_returns()?;
    let current_price = series.last_close().ok_or(EngineError::InsufficientData {
        required: 2,
        actual: 0,
    })?;
    let params = SimulationParameters::from_returns(
        &returns,
        current_price,
        config.horizon_days,
        config.path_count,
        config.min_history,
    )?;
    run_monte_carlo_risk_with_params(params, config.rng_seed, cancel)
}

/// Run the risk pipeline from explicit, already-annualized parameters.
pub fn run_monte_carlo_risk_with_params(
    params: SimulationParameters,
    rng_seed: Option<u64>,
    cancel: Option<&CancellationToken>,
) -> RiskResult<RiskReport> {
    let simulator = MonteCarloSimulator::new(params)?;
    let ensemble = simulator.simulate_with_cancellation(rng_seed, cancel)?;
    RiskReport::from_ensemble(&ensemble)
}

/// Combined output of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchResults {
    /// Per-symbol regime analysis results.
    pub regime: HashMap<String, RegimeAnalysisResult>,
    /// Per-symbol risk reports.
    pub risk: HashMap<String, RiskReport>,
    /// Per-symbol terminal errors; a symbol may appear here and still have
    /// a result from the other pipeline.
    pub failures: Vec<(String, EngineError)>,
}

/// Batch driver holding one series per instrument.
///
/// Runs both pipelines per symbol with shared configuration; a failing
/// instrument is tallied and skipped rather than aborting the batch.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    series: HashMap<String, ObservationSeries>,
    regime_config: RegimeConfig,
    risk_config: RiskConfig,
}

impl RiskEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegimeConfig::default(), RiskConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(regime_config: RegimeConfig, risk_config: RiskConfig) -> Self {
        Self {
            series: HashMap::new(),
            regime_config,
            risk_config,
        }
    }

    /// Register an instrument's series, replacing any previous one.
    pub fn add_series(&mut self, symbol: impl Into<String>, series: ObservationSeries) {
        self.series.insert(symbol.into(), series);
    }

    /// Remove an instrument; returns whether it was present.
    pub fn remove_series(&mut self, symbol: &str) -> bool {
        self.series.remove(symbol).is_some()
    }

    /// Registered symbols in unspecified order.
    pub fn symbols(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    /// Run both pipelines over every registered instrument.
    ///
    /// Logs per-symbol failures and a final success/failure tally; never
    /// fails as a whole.
    pub fn analyze_all(&self) -> BatchResults {
        let mut results = BatchResults::default();
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for (symbol, series) in &self.series {
            let mut symbol_ok = true;

            match run_regime_analysis(series, &self.regime_config) {
                Ok(analysis) => {
                    results.regime.insert(symbol.clone(), analysis);
                }
                Err(err) => {
                    symbol_ok = false;
                    log::warn!("{}: regime analysis failed: {}", symbol, err);
                    results.failures.push((symbol.clone(), err));
                }
            }

            match run_monte_carlo_risk(series, &self.risk_config) {
                Ok(report) => {
                    results.risk.insert(symbol.clone(), report);
                }
                Err(err) => {
                    symbol_ok = false;
                    log::warn!("{}: risk simulation failed: {}", symbol, err);
                    results.failures.push((symbol.clone(), err));
                }
            }

            if symbol_ok {
                succeeded += 1;
            } else {
                failed += 1;
            }
        }

        log::info!(
            "batch analysis complete: {} succeeded, {} failed, {} total",
            succeeded,
            failed,
            self.series.len()
        );
        results
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}
