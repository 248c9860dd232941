//! Statistical property tests for the Monte Carlo risk pipeline.
//!
//! These validate the simulator against closed-form GBM results: the
//! O(1/sqrt(N)) convergence of the sample mean, the analytic log-normal
//! VaR percentile, and the degenerate zero-volatility case.

use assert_approx_eq::assert_approx_eq;
use statrs::distribution::{ContinuousCDF, Normal};

use regime_risk::{
    run_monte_carlo_risk_with_params, MonteCarloSimulator, RiskReport, SimulationParameters,
    TailAsymmetry, TailThickness, TRADING_DAYS_PER_YEAR,
};

fn sample_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    let m = sample_mean(values);
    (values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64).sqrt()
}

/// Mean terminal return over one seeded run.
fn one_run_mean(path_count: usize, seed: u64) -> f64 {
    let params = SimulationParameters {
        current_price: 100.0,
        annual_drift: 0.0,
        annual_volatility: 0.30,
        horizon_days: 5,
        path_count,
    };
    let sim = MonteCarloSimulator::new(params).unwrap();
    sample_mean(&sim.simulate(Some(seed)).unwrap().terminal_returns)
}

#[test]
fn test_standard_error_halves_when_paths_quadruple() {
    // The standard error of the sample mean scales as 1/sqrt(N): quadrupling
    // the path count should halve the spread of run means across seeds.
    let replicas = 32;
    let means_small: Vec<f64> = (0..replicas).map(|i| one_run_mean(500, 1_000 + i)).collect();
    let means_large: Vec<f64> = (0..replicas).map(|i| one_run_mean(2_000, 5_000 + i)).collect();

    let se_small = sample_std(&means_small);
    let se_large = sample_std(&means_large);
    assert!(se_large < se_small, "se {} should shrink to {}", se_small, se_large);

    // Expected ratio is 2; the 32-replica estimate is noisy, so accept a
    // generous band around it.
    let ratio = se_small / se_large;
    assert!(
        (1.2..=3.4).contains(&ratio),
        "se ratio {} outside plausible band for 1/sqrt(N) scaling",
        ratio
    );
}

#[test]
fn test_sample_mean_converges_to_analytic_growth() {
    let drift = 0.05;
    let horizon = 30;
    let params = SimulationParameters {
        current_price: 100.0,
        annual_drift: drift,
        annual_volatility: 0.20,
        horizon_days: horizon,
        path_count: 40_000,
    };
    let sim = MonteCarloSimulator::new(params).unwrap();
    let ensemble = sim.simulate(Some(77)).unwrap();

    let analytic = (drift * horizon as f64 / TRADING_DAYS_PER_YEAR).exp() - 1.0;
    let observed = sample_mean(&ensemble.terminal_returns);
    // Standard error ~ sigma * sqrt(tau) / sqrt(N) ~ 3.5e-4.
    assert!(
        (observed - analytic).abs() < 1.5e-3,
        "sample mean {} vs analytic {}",
        observed,
        analytic
    );
}

#[test]
fn test_var95_matches_analytic_lognormal_percentile() {
    // current_price = 100, sigma = 0.30, mu = 0.05, horizon = 30 days,
    // 20 000 paths: the simulated VaR95 should sit within +/- 5% relative
    // of the closed-form log-normal 5th percentile.
    let mu = 0.05;
    let sigma = 0.30;
    let horizon = 30;
    let params = SimulationParameters {
        current_price: 100.0,
        annual_drift: mu,
        annual_volatility: sigma,
        horizon_days: horizon,
        path_count: 20_000,
    };
    let report = run_monte_carlo_risk_with_params(params, Some(42), None).unwrap();

    let tau = horizon as f64 / TRADING_DAYS_PER_YEAR;
    let z_05 = Normal::new(0.0, 1.0).unwrap().inverse_cdf(0.05);
    let analytic_var =
        ((mu - 0.5 * sigma * sigma) * tau + sigma * tau.sqrt() * z_05).exp() - 1.0;

    let relative_error = (report.var_95 - analytic_var).abs() / analytic_var.abs();
    assert!(
        relative_error < 0.05,
        "VaR95 {} vs analytic {} (relative error {})",
        report.var_95,
        analytic_var,
        relative_error
    );

    // The same percentile feeds the stress block.
    assert_eq!(report.stress.percentile_5, report.var_95);
    assert!(report.var_99 <= report.var_95);
    assert!(report.es_95 <= report.var_95);
}

#[test]
fn test_zero_volatility_scenario_is_fully_degenerate() {
    // sigma = 0, mu = 0: every path ends exactly at the start price.
    let params = SimulationParameters {
        current_price: 100.0,
        annual_drift: 0.0,
        annual_volatility: 0.0,
        horizon_days: 10,
        path_count: 500,
    };
    let report = run_monte_carlo_risk_with_params(params, Some(1), None).unwrap();

    assert_eq!(report.mean_return, 0.0);
    assert_eq!(report.std_return, 0.0);
    assert_eq!(report.var_95, 0.0);
    assert_eq!(report.var_99, 0.0);
    assert_eq!(report.es_95, 0.0);
    assert_eq!(report.es_99, 0.0);
    assert_eq!(report.min_return, 0.0);
    assert_eq!(report.max_return, 0.0);
    assert_eq!(report.tails.excess_kurtosis, 0.0);
    assert_eq!(report.tails.skewness, 0.0);
    assert_eq!(report.tails.thickness, TailThickness::Normal);
    assert_eq!(report.tails.asymmetry, TailAsymmetry::Symmetric);
    assert_eq!(report.stress.extreme_loss_probability, 0.0);
}

#[test]
fn test_seeded_reports_are_reproducible() {
    let params = SimulationParameters {
        current_price: 250.0,
        annual_drift: 0.08,
        annual_volatility: 0.25,
        horizon_days: 21,
        path_count: 4_000,
    };
    let a = run_monte_carlo_risk_with_params(params, Some(2024), None).unwrap();
    let b = run_monte_carlo_risk_with_params(params, Some(2024), None).unwrap();
    assert_eq!(a, b);

    let c = run_monte_carlo_risk_with_params(params, Some(2025), None).unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_gbm_terminal_distribution_shape() {
    // Log-normal terminal returns: right tail longer than the left, and
    // probability of gain below but near one half for a small positive drift.
    let params = SimulationParameters {
        current_price: 100.0,
        annual_drift: 0.05,
        annual_volatility: 0.40,
        horizon_days: 60,
        path_count: 30_000,
    };
    let sim = MonteCarloSimulator::new(params).unwrap();
    let ensemble = sim.simulate(Some(13)).unwrap();
    let report = RiskReport::from_ensemble(&ensemble).unwrap();

    assert!(report.tails.skewness > 0.0);
    assert!(report.max_return.abs() > report.min_return.abs());
    // A positive-drift GBM still has median log growth mu - sigma^2/2,
    // which is negative here, so P(gain) sits just below one half.
    assert!(report.prob_positive > 0.40 && report.prob_positive < 0.55);
    // Returns are bounded below by -100%.
    assert!(report.min_return > -1.0);
}

#[test]
fn test_percentile_monotonicity_across_confidence() {
    let params = SimulationParameters {
        current_price: 100.0,
        annual_drift: 0.0,
        annual_volatility: 0.35,
        horizon_days: 30,
        path_count: 10_000,
    };
    let report = run_monte_carlo_risk_with_params(params, Some(8), None).unwrap();
    assert!(report.stress.percentile_1 <= report.stress.percentile_5);
    assert!(report.stress.percentile_5 <= report.stress.percentile_10);
    assert_approx_eq!(report.stress.tail_expectation, report.es_95, 1e-15);
}
