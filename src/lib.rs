//! # Regime Classification & Monte Carlo Risk Simulation
//!
//! Discrete-state market-regime inference via an empirical Markov model and
//! forward-looking risk estimation via stochastic price-path simulation.
//!
//! Two independent pipelines consume the same validated daily price/volume
//! series:
//!
//! - **Regime analysis**: log returns are labeled Bull/Bear/Sideways by
//!   fixed thresholds, a row-stochastic 3x3 transition matrix is estimated
//!   from consecutive labels, and aggregate analytics (marginal and
//!   approximate steady-state probabilities, expected sojourn durations,
//!   per-state return/volatility/trend/volume characteristics, model
//!   entropy and persistence) are collected into one immutable result.
//! - **Risk simulation**: annualized drift and volatility are estimated
//!   from the same returns, terminal prices are simulated under geometric
//!   Brownian motion with an injectable seedable generator, and the
//!   ensemble of terminal returns is reduced to VaR/expected-shortfall,
//!   stress and tail-shape metrics.
//!
//! Both pipelines are pure over their input; the only sources of
//! nondeterminism are RNG draws, which an explicit seed pins down.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use regime_risk::{
//!     run_monte_carlo_risk, run_regime_analysis, Observation, ObservationSeries,
//!     RegimeConfig, RiskConfig,
//! };
//!
//! fn main() -> Result<(), regime_risk::EngineError> {
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let observations: Vec<Observation> = (0..120)
//!         .map(|i| {
//!             let close = 100.0 * (1.0 + 0.001 * i as f64);
//!             Observation::new(start + chrono::Duration::days(i), close, 1_000_000.0)
//!         })
//!         .collect();
//!     let series = ObservationSeries::new(observations)?;
//!
//!     let analysis = run_regime_analysis(&series, &RegimeConfig::default())?;
//!     println!("current regime: {}", analysis.current_regime);
//!
//!     let config = RiskConfig {
//!         rng_seed: Some(42),
//!         ..RiskConfig::default()
//!     };
//!     let report = run_monte_carlo_risk(&series, &config)?;
//!     println!("VaR95 = {:.4}, ES95 = {:.4}", report.var_95, report.es_95);
//!     Ok(())
//! }
//! ```
//!
//! ## Batch runs
//!
//! [`RiskEngine`] drives both pipelines across many instruments; errors are
//! terminal per symbol and tallied rather than aborting the batch. The
//! engine performs no I/O: series arrive fully materialized and results are
//! plain values for an external persistence layer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analytics;
pub mod config;
pub mod engine;
pub mod errors;
pub mod math_utils;
pub mod regime;
pub mod risk;
pub mod rng;
pub mod series;
pub mod simulation;
pub mod transition;

pub use analytics::{
    ModelMetrics, RegimeAnalysisResult, RegimeCharacteristics, VolumeStats, HISTORY_WINDOW,
    VOLATILITY_WINDOW,
};
pub use config::{RegimeConfig, RiskConfig};
pub use engine::{
    run_monte_carlo_risk, run_monte_carlo_risk_cancellable, run_monte_carlo_risk_with_params,
    run_regime_analysis, BatchResults, RiskEngine,
};
pub use errors::{EngineError, RiskResult};
pub use regime::{ClassifierConfig, Regime, STATE_COUNT};
pub use risk::{
    RiskReport, StressMetrics, TailAsymmetry, TailDiagnostics, TailThickness,
    EXTREME_LOSS_THRESHOLD, HEAVY_TAIL_KURTOSIS, SKEW_LABEL_THRESHOLD,
};
pub use rng::PathRng;
pub use series::{Observation, ObservationSeries};
pub use simulation::{
    CancellationToken, MonteCarloSimulator, SimulatedPathEnsemble, SimulationParameters,
    TRADING_DAYS_PER_YEAR,
};
pub use transition::{TransitionMatrix, ROW_SUM_TOLERANCE};
