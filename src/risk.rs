//! Risk metrics derived from a simulated path ensemble.
//!
//! VaR here is quoted as a return-space percentile (VaR95 is the 5th
//! percentile of terminal returns, typically negative) and expected
//! shortfall is the mean of the returns at or below that percentile. All
//! moment calculations guard the zero-deviation case so a degenerate
//! ensemble (sigma = 0 simulation) produces a clean all-zero report instead
//! of NaNs.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{EngineError, RiskResult};
use crate::math_utils::{float_total_cmp, mean, percentile, population_std};
use crate::simulation::SimulatedPathEnsemble;

/// Return threshold below which a path counts as an extreme loss.
pub const EXTREME_LOSS_THRESHOLD: f64 = -0.20;

/// Skewness magnitude above which a distribution is labeled asymmetric.
pub const SKEW_LABEL_THRESHOLD: f64 = 0.5;

/// Excess-kurtosis level above which tails are labeled heavy.
pub const HEAVY_TAIL_KURTOSIS: f64 = 3.0;

/// Qualitative tail-thickness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TailThickness {
    /// Excess kurtosis above [`HEAVY_TAIL_KURTOSIS`].
    Heavy,
    /// Tails consistent with a normal distribution.
    Normal,
}

impl fmt::Display for TailThickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TailThickness::Heavy => "heavy",
            TailThickness::Normal => "normal",
        })
    }
}

/// Qualitative tail-asymmetry label from the skewness sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TailAsymmetry {
    /// Skewness above `+0.5`.
    RightSkewed,
    /// Skewness below `-0.5`.
    LeftSkewed,
    /// Skewness within `±0.5`.
    Symmetric,
}

impl fmt::Display for TailAsymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TailAsymmetry::RightSkewed => "right_skewed",
            TailAsymmetry::LeftSkewed => "left_skewed",
            TailAsymmetry::Symmetric => "symmetric",
        })
    }
}

/// Stress-test block of the risk report.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StressMetrics {
    /// 1st percentile of terminal returns.
    pub percentile_1: f64,
    /// 5th percentile of terminal returns.
    pub percentile_5: f64,
    /// 10th percentile of terminal returns.
    pub percentile_10: f64,
    /// Probability of a terminal return below -20%.
    pub extreme_loss_probability: f64,
    /// Mean of returns below the 5th percentile. Numerically identical to
    /// ES95; both fields are kept for interface parity with consumers.
    pub tail_expectation: f64,
}

/// Tail-shape diagnostics of the ensemble distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TailDiagnostics {
    /// Excess kurtosis (`mean(z^4) - 3`); 0 when the deviation is 0.
    pub excess_kurtosis: f64,
    /// Skewness (`mean(z^3)`); 0 when the deviation is 0.
    pub skewness: f64,
    /// Qualitative thickness label.
    pub thickness: TailThickness,
    /// Qualitative asymmetry label.
    pub asymmetry: TailAsymmetry,
}

/// Immutable risk report for one (instrument, run, horizon).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiskReport {
    /// Value at Risk at 95% confidence (5th percentile of returns).
    pub var_95: f64,
    /// Value at Risk at 99% confidence (1st percentile of returns).
    pub var_99: f64,
    /// Expected shortfall beyond VaR95.
    pub es_95: f64,
    /// Expected shortfall beyond VaR99.
    pub es_99: f64,
    /// Mean terminal return.
    pub mean_return: f64,
    /// Population standard deviation of terminal returns.
    pub std_return: f64,
    /// Worst terminal return.
    pub min_return: f64,
    /// Best terminal return.
    pub max_return: f64,
    /// Probability of a strictly positive terminal return.
    pub prob_positive: f64,
    /// Stress-test metrics.
    pub stress: StressMetrics,
    /// Tail-shape diagnostics.
    pub tails: TailDiagnostics,
}

impl RiskReport {
    /// Derive the full report from an ensemble of terminal returns.
    ///
    /// Fails with [`EngineError::EmptyEnsemble`] when the ensemble holds no
    /// paths; every other input resolves to finite metrics.
    pub fn from_ensemble(ensemble: &SimulatedPathEnsemble) -> RiskResult<Self> {
        let returns = &ensemble.terminal_returns;
        if returns.is_empty() {
            return Err(EngineError::EmptyEnsemble);
        }

        let mut sorted = returns.clone();
        sorted.sort_by(float_total_cmp);
        let n = sorted.len() as f64;

        let var_95 = percentile(&sorted, 0.05);
        let var_99 = percentile(&sorted, 0.01);
        let es_95 = shortfall_below(&sorted, var_95);
        let es_99 = shortfall_below(&sorted, var_99);

        let mean_return = mean(returns);
        let std_return = population_std(returns);
        let min_return = sorted[0];
        let max_return = sorted[sorted.len() - 1];
        let prob_positive = returns.iter().filter(|&&r| r > 0.0).count() as f64 / n;

        let stress = StressMetrics {
            percentile_1: var_99,
            percentile_5: var_95,
            percentile_10: percentile(&sorted, 0.10),
            extreme_loss_probability: returns
                .iter()
                .filter(|&&r| r < EXTREME_LOSS_THRESHOLD)
                .count() as f64
                / n,
            tail_expectation: es_95,
        };

        let (excess_kurtosis, skewness) = standardized_moments(returns, mean_return, std_return);
        let tails = TailDiagnostics {
            excess_kurtosis,
            skewness,
            thickness: if excess_kurtosis > HEAVY_TAIL_KURTOSIS {
                TailThickness::Heavy
            } else {
                TailThickness::Normal
            },
            asymmetry: if skewness > SKEW_LABEL_THRESHOLD {
                TailAsymmetry::RightSkewed
            } else if skewness < -SKEW_LABEL_THRESHOLD {
                TailAsymmetry::LeftSkewed
            } else {
                TailAsymmetry::Symmetric
            },
        };

        Ok(Self {
            var_95,
            var_99,
            es_95,
            es_99,
            mean_return,
            std_return,
            min_return,
            max_return,
            prob_positive,
            stress,
            tails,
        })
    }
}

/// Mean of the sorted returns at or below `threshold`.
///
/// The threshold is itself a percentile of the same data, so at least the
/// minimum always qualifies; the fallback to the threshold is defensive.
fn shortfall_below(sorted: &[f64], threshold: f64) -> f64 {
    let cutoff = sorted.partition_point(|&r| r <= threshold);
    if cutoff == 0 {
        threshold
    } else {
        mean(&sorted[..cutoff])
    }
}

/// Excess kurtosis and skewness of standardized returns; (0, 0) when the
/// deviation is zero.
fn standardized_moments(returns: &[f64], mean_return: f64, std_return: f64) -> (f64, f64) {
    if std_return == 0.0 {
        return (0.0, 0.0);
    }
    let n = returns.len() as f64;
    let mut z3 = 0.0;
    let mut z4 = 0.0;
    for &r in returns {
        let z = (r - mean_return) / std_return;
        let zz = z * z;
        z3 += zz * z;
        z4 += zz * zz;
    }
    (z4 / n - 3.0, z3 / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn ensemble(returns: Vec<f64>) -> SimulatedPathEnsemble {
        SimulatedPathEnsemble {
            terminal_returns: returns,
            horizon_days: 30,
        }
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        match RiskReport::from_ensemble(&ensemble(vec![])) {
            Err(EngineError::EmptyEnsemble) => {}
            other => panic!("Expected EmptyEnsemble, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_ensemble_all_zero() {
        let report = RiskReport::from_ensemble(&ensemble(vec![0.0; 500])).unwrap();
        assert_eq!(report.mean_return, 0.0);
        assert_eq!(report.std_return, 0.0);
        assert_eq!(report.var_95, 0.0);
        assert_eq!(report.var_99, 0.0);
        assert_eq!(report.es_95, 0.0);
        assert_eq!(report.tails.excess_kurtosis, 0.0);
        assert_eq!(report.tails.skewness, 0.0);
        assert_eq!(report.tails.thickness, TailThickness::Normal);
        assert_eq!(report.tails.asymmetry, TailAsymmetry::Symmetric);
        assert_eq!(report.prob_positive, 0.0);
    }

    #[test]
    fn test_var_ordering() {
        // Linearly spread losses/gains: percentiles are strictly ordered.
        let returns: Vec<f64> = (0..1000).map(|i| -0.5 + i as f64 / 1000.0).collect();
        let report = RiskReport::from_ensemble(&ensemble(returns)).unwrap();
        assert!(report.var_99 <= report.var_95);
        assert!(report.var_95 <= report.stress.percentile_10);
        assert!(report.es_99 <= report.var_99);
        assert!(report.es_95 <= report.var_95);
    }

    #[test]
    fn test_percentile_semantics() {
        let returns: Vec<f64> = (0..101).map(|i| i as f64 / 100.0 - 0.5).collect();
        let report = RiskReport::from_ensemble(&ensemble(returns)).unwrap();
        // 101 evenly spaced points in [-0.5, 0.5]
        assert_approx_eq!(report.var_95, -0.45, 1e-12);
        assert_approx_eq!(report.var_99, -0.49, 1e-12);
        assert_approx_eq!(report.stress.percentile_10, -0.40, 1e-12);
        assert_approx_eq!(report.min_return, -0.5, 1e-12);
        assert_approx_eq!(report.max_return, 0.5, 1e-12);
    }

    #[test]
    fn test_expected_shortfall_is_tail_mean() {
        let returns: Vec<f64> = (0..100).map(|i| i as f64 / 100.0 - 0.5).collect();
        let report = RiskReport::from_ensemble(&ensemble(returns)).unwrap();
        // ES95 averages the returns at or below the 5th percentile.
        let expected: f64 = returns_below(&report);
        assert_approx_eq!(report.es_95, expected, 1e-12);
        // tail_expectation mirrors ES95 exactly.
        assert_eq!(report.stress.tail_expectation, report.es_95);
    }

    fn returns_below(report: &RiskReport) -> f64 {
        let returns: Vec<f64> = (0..100).map(|i| i as f64 / 100.0 - 0.5).collect();
        let tail: Vec<f64> = returns.iter().copied().filter(|&r| r <= report.var_95).collect();
        tail.iter().sum::<f64>() / tail.len() as f64
    }

    #[test]
    fn test_extreme_loss_probability() {
        let mut returns = vec![0.05; 90];
        returns.extend(vec![-0.30; 10]);
        let report = RiskReport::from_ensemble(&ensemble(returns)).unwrap();
        assert_approx_eq!(report.stress.extreme_loss_probability, 0.10, 1e-12);
    }

    #[test]
    fn test_prob_positive_strict() {
        let returns = vec![-0.1, 0.0, 0.0, 0.1];
        let report = RiskReport::from_ensemble(&ensemble(returns)).unwrap();
        assert_approx_eq!(report.prob_positive, 0.25, 1e-12);
    }

    #[test]
    fn test_left_skewed_label() {
        // Mostly small gains, a few deep losses: skewness well below -0.5.
        let mut returns = vec![0.01; 95];
        returns.extend(vec![-0.40; 5]);
        let report = RiskReport::from_ensemble(&ensemble(returns)).unwrap();
        assert!(report.tails.skewness < -SKEW_LABEL_THRESHOLD);
        assert_eq!(report.tails.asymmetry, TailAsymmetry::LeftSkewed);
        // A two-point mixture this lopsided also has heavy tails.
        assert!(report.tails.excess_kurtosis > HEAVY_TAIL_KURTOSIS);
        assert_eq!(report.tails.thickness, TailThickness::Heavy);
    }

    #[test]
    fn test_symmetric_uniform_is_platykurtic() {
        let returns: Vec<f64> = (0..1001).map(|i| i as f64 / 1000.0 - 0.5).collect();
        let report = RiskReport::from_ensemble(&ensemble(returns)).unwrap();
        assert_eq!(report.tails.asymmetry, TailAsymmetry::Symmetric);
        // Uniform distribution: excess kurtosis -1.2.
        assert_approx_eq!(report.tails.excess_kurtosis, -1.2, 0.01);
        assert_eq!(report.tails.thickness, TailThickness::Normal);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(TailThickness::Heavy.to_string(), "heavy");
        assert_eq!(TailThickness::Normal.to_string(), "normal");
        assert_eq!(TailAsymmetry::RightSkewed.to_string(), "right_skewed");
        assert_eq!(TailAsymmetry::LeftSkewed.to_string(), "left_skewed");
        assert_eq!(TailAsymmetry::Symmetric.to_string(), "symmetric");
    }
}
