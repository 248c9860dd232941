//! Mathematical utility functions shared by the regime and risk pipelines.
//!
//! Descriptive statistics here use the population convention (divide by n)
//! to match the semantics of the risk report; regression is plain OLS over
//! integer time indices.

/// Safe comparison for floating point values (pushes NaN to the end).
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap(),
    }
}

/// Calculate percentile from sorted data using linear interpolation.
///
/// `p` is a fraction in `[0, 1]`. This is the standard interpolated
/// percentile used by statistical packages; out-of-range `p` clamps to the
/// extremes, and an empty input yields NaN.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return f64::NAN;
    }

    if p <= 0.0 {
        return sorted_data[0];
    }
    if p >= 1.0 {
        return sorted_data[sorted_data.len() - 1];
    }

    let n = sorted_data.len();
    let index = p * (n - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f64;
        sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight
    }
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (divide by n); 0.0 for an empty slice.
pub fn population_variance(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / data.len() as f64
}

/// Population standard deviation (divide by n).
pub fn population_std(data: &[f64]) -> f64 {
    population_variance(data).sqrt()
}

/// Safe division that substitutes a default when the denominator is zero
/// or the quotient would not be finite.
pub fn safe_div(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        return default;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        default
    }
}

/// Rolling-window population volatility of a return series.
///
/// Entry `i` of the output is the standard deviation over
/// `returns[i + 1 - window ..= i]`, so it is only defined for
/// `i >= window - 1`; earlier indices are `None`. Window must be >= 2 for a
/// meaningful deviation; a window larger than the series yields all `None`.
pub fn rolling_volatility(returns: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = returns.len();
    let mut out = vec![None; n];
    if window < 2 || n < window {
        return out;
    }
    for i in (window - 1)..n {
        let segment = &returns[i + 1 - window..=i];
        out[i] = Some(population_std(segment));
    }
    out
}

/// OLS slope of `y` regressed on `x`.
///
/// Returns 0.0 for fewer than two points or a degenerate (constant) `x`;
/// regime trend slopes fall back to "no trend" rather than failing.
pub fn ols_slope(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }

    let x_mean = mean(&x[..n]);
    let y_mean = mean(&y[..n]);

    let mut ss_xx = 0.0;
    let mut ss_xy = 0.0;
    for i in 0..n {
        let dx = x[i] - x_mean;
        ss_xx += dx * dx;
        ss_xy += dx * (y[i] - y_mean);
    }

    safe_div(ss_xy, ss_xx, 0.0)
}
