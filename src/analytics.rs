//! Aggregate regime analytics.
//!
//! Turns a price/volume series into an immutable [`RegimeAnalysisResult`]:
//! current regime, marginal state probabilities, the empirical transition
//! matrix with its approximate steady state, expected sojourn durations,
//! per-state return/volatility/trend/volume characteristics, model-quality
//! metrics, and a trailing label history. Degenerate per-state slices
//! (a regime never visited) resolve to zero defaults instead of failing, so
//! a batch run across thousands of instruments is not derailed by one quiet
//! ticker.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::RegimeConfig;
use crate::errors::{EngineError, RiskResult};
use crate::math_utils::{mean, ols_slope, population_std, rolling_volatility};
use crate::regime::{Regime, STATE_COUNT};
use crate::series::ObservationSeries;
use crate::transition::TransitionMatrix;

/// Window for the rolling per-state return volatility.
pub const VOLATILITY_WINDOW: usize = 5;

/// Trailing label history length attached to each result.
pub const HISTORY_WINDOW: usize = 20;

/// Return statistics for one regime state.
///
/// All fields are 0.0 / 0 when the state never occurs in the history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegimeCharacteristics {
    /// Mean daily log return while in this state.
    pub mean_return: f64,
    /// Population standard deviation of returns in this state.
    pub return_std: f64,
    /// Number of days labeled with this state.
    pub observations: usize,
    /// Fraction of the full history spent in this state (duration proxy).
    pub share: f64,
}

/// Volume statistics for one regime state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VolumeStats {
    /// Mean traded volume while in this state.
    pub mean: f64,
    /// Population standard deviation of volume in this state.
    pub std: f64,
}

/// Model-quality metrics for the fitted transition matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelMetrics {
    /// Shannon entropy of the transition matrix in bits.
    pub entropy: f64,
    /// Mean self-transition probability (regime persistence).
    pub persistence: f64,
    /// Number of distinct states actually observed.
    pub distinct_states: usize,
    /// Number of label transitions (= labeled observations - 1).
    pub transition_count: usize,
}

/// Immutable aggregate result of one regime analysis run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegimeAnalysisResult {
    /// Regime of the most recent observation.
    pub current_regime: Regime,
    /// Marginal frequency of each state over the full history, in canonical
    /// order; sums to 1.
    pub state_probabilities: [f64; STATE_COUNT],
    /// Empirical row-stochastic transition matrix.
    pub transition_matrix: TransitionMatrix,
    /// Approximate long-run distribution (column-average method).
    pub steady_state: [f64; STATE_COUNT],
    /// Expected sojourn duration per state: `1 / (1 - p_self)`, infinite
    /// when a state never exits.
    pub expected_duration: [f64; STATE_COUNT],
    /// Per-state return statistics.
    pub characteristics: [RegimeCharacteristics; STATE_COUNT],
    /// Mean rolling-window return volatility per state.
    pub volatility_regimes: [f64; STATE_COUNT],
    /// Linear price-trend slope per state (price units per day).
    pub trend_regimes: [f64; STATE_COUNT],
    /// Volume statistics per state.
    pub volume_regimes: [VolumeStats; STATE_COUNT],
    /// Model-quality metrics.
    pub model_metrics: ModelMetrics,
    /// Trailing window of the most recent labels (up to [`HISTORY_WINDOW`]).
    pub state_history: Vec<Regime>,
}

/// Run the full regime analysis pipeline over one instrument's series.
///
/// Fails with [`EngineError::InsufficientHistory`] when fewer than
/// `config.min_history` labeled returns are available. Deterministic: the
/// same input yields a bit-identical result.
pub fn run_regime_analysis(
    series: &ObservationSeries,
    config: &RegimeConfig,
) -> RiskResult<RegimeAnalysisResult> {
    config.validate()?;

    let returns = series.log_returns()?;
    let labels = config.classifier.classify_series(&returns);
    if labels.len() < config.min_history {
        return Err(EngineError::InsufficientHistory {
            stage: "regime analysis",
            required: config.min_history,
            actual: labels.len(),
        });
    }

    let closes = series.closes();
    let volumes = series.volumes();
    let n = labels.len();

    // Label i covers the move into observation i + 1, so state-conditional
    // price and volume lookups are offset by one.
    let mut state_indices: [Vec<usize>; STATE_COUNT] = Default::default();
    for (i, label) in labels.iter().enumerate() {
        state_indices[label.index()].push(i);
    }

    let mut state_probabilities = [0.0; STATE_COUNT];
    for (s, indices) in state_indices.iter().enumerate() {
        state_probabilities[s] = indices.len() as f64 / n as f64;
    }

    let transition_matrix = TransitionMatrix::estimate(&labels);
    let steady_state = transition_matrix.steady_state_approximation();

    let mut expected_duration = [0.0; STATE_COUNT];
    for (s, duration) in expected_duration.iter_mut().enumerate() {
        let p_self = transition_matrix.as_rows()[s][s];
        *duration = if p_self >= 1.0 {
            f64::INFINITY
        } else {
            1.0 / (1.0 - p_self)
        };
    }

    let rolling_vols = rolling_volatility(&returns, VOLATILITY_WINDOW);

    let mut characteristics = [RegimeCharacteristics::default(); STATE_COUNT];
    let mut volatility_regimes = [0.0; STATE_COUNT];
    let mut trend_regimes = [0.0; STATE_COUNT];
    let mut volume_regimes = [VolumeStats::default(); STATE_COUNT];

    for (s, indices) in state_indices.iter().enumerate() {
        if indices.is_empty() {
            log::debug!(
                "regime {} never observed; characteristics default to zero",
                Regime::from_index(s).map(|r| r.label()).unwrap_or("?")
            );
            continue;
        }

        let state_returns: Vec<f64> = indices.iter().map(|&i| returns[i]).collect();
        characteristics[s] = RegimeCharacteristics {
            mean_return: mean(&state_returns),
            return_std: population_std(&state_returns),
            observations: indices.len(),
            share: indices.len() as f64 / n as f64,
        };

        let state_vols: Vec<f64> = indices.iter().filter_map(|&i| rolling_vols[i]).collect();
        volatility_regimes[s] = mean(&state_vols);

        let xs: Vec<f64> = indices.iter().map(|&i| i as f64).collect();
        let ys: Vec<f64> = indices.iter().map(|&i| closes[i + 1]).collect();
        trend_regimes[s] = ols_slope(&xs, &ys);

        let state_volumes: Vec<f64> = indices.iter().map(|&i| volumes[i + 1]).collect();
        volume_regimes[s] = VolumeStats {
            mean: mean(&state_volumes),
            std: population_std(&state_volumes),
        };
    }

    let distinct_states = state_indices.iter().filter(|ix| !ix.is_empty()).count();
    let model_metrics = ModelMetrics {
        entropy: transition_matrix.shannon_entropy(),
        persistence: transition_matrix.mean_self_transition(),
        distinct_states,
        transition_count: n - 1,
    };

    let history_start = n.saturating_sub(HISTORY_WINDOW);
    let state_history = labels[history_start..].to_vec();

    Ok(RegimeAnalysisResult {
        current_regime: labels[n - 1],
        state_probabilities,
        transition_matrix,
        steady_state,
        expected_duration,
        characteristics,
        volatility_regimes,
        trend_regimes,
        volume_regimes,
        model_metrics,
        state_history,
    })
}
