//! Error types and validation functions for the regime/risk engine.
//!
//! All errors are terminal for a single invocation: the engine performs no
//! internal retries, and a batch caller decides whether to skip the
//! instrument and continue. Degenerate-but-valid inputs (e.g. a regime state
//! that never occurs) are not errors; they resolve to documented
//! zero/uniform defaults.

use thiserror::Error;

/// Error types for regime analysis and risk simulation operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EngineError {
    /// Too few raw observations to derive anything at all.
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Minimum required observations
        required: usize,
        /// Actual number of observations provided
        actual: usize,
    },

    /// The derived return series is shorter than a stage's configured minimum.
    #[error("Insufficient history for {stage}: need at least {required} returns, got {actual}")]
    InsufficientHistory {
        /// Pipeline stage that rejected the series
        stage: &'static str,
        /// Minimum required labeled returns
        required: usize,
        /// Actual number of labeled returns
        actual: usize,
    },

    /// Invalid parameter value for an engine configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Risk metrics were requested for an ensemble with no simulated paths.
    ///
    /// Defensive: cannot occur when parameters passed validation.
    #[error("Empty ensemble: no simulated paths to derive risk metrics from")]
    EmptyEnsemble,

    /// Observation dates are not strictly increasing.
    #[error("Non-chronological series: observation at index {index} does not advance the date")]
    NonChronologicalSeries {
        /// Index of the offending observation
        index: usize,
    },

    /// Numerical computation error due to non-finite inputs or instability.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for the numerical failure
        reason: String,
    },

    /// A cooperative cancellation token was triggered mid-simulation.
    #[error("Simulation cancelled after {completed_paths} of {total_paths} paths")]
    Cancelled {
        /// Paths fully simulated before cancellation was observed
        completed_paths: usize,
        /// Paths requested
        total_paths: usize,
    },
}

/// Result type for engine operations.
pub type RiskResult<T> = Result<T, EngineError>;

/// Validates that a series has sufficient length for an operation.
///
/// # Example
/// ```rust
/// use regime_risk::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2).is_ok());
/// assert!(validate_data_length(&data, 5).is_err());
/// ```
pub fn validate_data_length(data: &[f64], min_required: usize) -> RiskResult<()> {
    if data.len() < min_required {
        Err(EngineError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is finite and within inclusive bounds.
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> RiskResult<()> {
    if value.is_nan() {
        return Err(EngineError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if value < min || value > max {
        Err(EngineError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value; corrupt price feeds surface here
/// before any statistics are derived from them.
pub fn validate_all_finite(data: &[f64], name: &str) -> RiskResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| !v.is_finite()) {
        return Err(EngineError::NumericalError {
            reason: format!("{} contains non-finite value at index {}: {}", name, i, value),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_data_length_sufficient() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(validate_data_length(&data, 3).is_ok());
    }

    #[test]
    fn test_validate_data_length_insufficient() {
        let data = vec![1.0, 2.0];
        match validate_data_length(&data, 5) {
            Err(EngineError::InsufficientData { required, actual }) => {
                assert_eq!(required, 5);
                assert_eq!(actual, 2);
            }
            _ => panic!("Expected InsufficientData error"),
        }
    }

    #[test]
    fn test_validate_data_length_exact_minimum() {
        let data = vec![1.0, 2.0, 3.0];
        assert!(validate_data_length(&data, 3).is_ok());
    }

    #[test]
    fn test_validate_parameter_bounds() {
        assert!(validate_parameter(0.5, 0.0, 1.0, "threshold").is_ok());
        assert!(validate_parameter(0.0, 0.0, 1.0, "threshold").is_ok());
        assert!(validate_parameter(1.0, 0.0, 1.0, "threshold").is_ok());

        match validate_parameter(1.5, 0.0, 1.0, "threshold") {
            Err(EngineError::InvalidParameter {
                parameter,
                value,
                constraint,
            }) => {
                assert_eq!(parameter, "threshold");
                assert_eq!(value, 1.5);
                assert_eq!(constraint, "[0, 1]");
            }
            _ => panic!("Expected InvalidParameter error"),
        }
    }

    #[test]
    fn test_validate_parameter_nan() {
        let result = validate_parameter(f64::NAN, 0.0, 1.0, "threshold");
        assert!(matches!(result, Err(EngineError::InvalidParameter { .. })));
    }

    #[test]
    fn test_validate_all_finite() {
        let good = vec![1.0, -2.0, 0.0, 1e10];
        assert!(validate_all_finite(&good, "prices").is_ok());

        let bad = vec![1.0, f64::NAN, 3.0];
        match validate_all_finite(&bad, "prices") {
            Err(EngineError::NumericalError { reason }) => {
                assert!(reason.contains("prices"));
                assert!(reason.contains("index 1"));
            }
            _ => panic!("Expected NumericalError"),
        }

        let inf = vec![1.0, 2.0, f64::INFINITY];
        assert!(validate_all_finite(&inf, "prices").is_err());
    }

    #[test]
    fn test_error_display_formatting() {
        let err = EngineError::InsufficientHistory {
            stage: "regime analysis",
            required: 50,
            actual: 49,
        };
        let text = format!("{}", err);
        assert!(text.contains("regime analysis"));
        assert!(text.contains("50"));
        assert!(text.contains("49"));

        let err = EngineError::EmptyEnsemble;
        assert!(format!("{}", err).contains("no simulated paths"));
    }
}
