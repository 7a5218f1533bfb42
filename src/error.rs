//! Error types for rate solving and loan input loading
//!
//! The compatibility adapters (`calculate_irr`, `calculate_apr`) collapse every
//! variant into the `0` sentinel. The explicit API keeps them apart.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, RateError>;

/// Errors raised while solving for a rate or loading loan inputs
#[derive(Debug, Error)]
pub enum RateError {
    /// Search configuration is unusable (zero iterations, non-positive precision, ...)
    #[error("invalid search config: {0}")]
    InvalidConfig(String),

    /// Search bracket is empty, inverted, or reaches into `rate <= -1`
    #[error("invalid search bracket [{lower}, {upper}]: {reason}")]
    InvalidBracket {
        lower: f64,
        upper: f64,
        reason: &'static str,
    },

    /// Residual has the same sign at both ends of the bracket
    #[error("{equation}: no sign change in [{lower}, {upper}] (residuals {lower_residual}, {upper_residual})")]
    NoBracketedRoot {
        equation: &'static str,
        lower: f64,
        upper: f64,
        lower_residual: f64,
        upper_residual: f64,
    },

    /// Iteration budget exhausted before the residual met the precision
    #[error("{equation} did not converge after {iterations} iterations (last rate {last_rate}, residual {last_residual})")]
    NotConverged {
        equation: &'static str,
        iterations: u32,
        last_rate: f64,
        last_residual: f64,
    },

    /// Residual evaluated to NaN or infinity
    #[error("{equation}: residual is not finite at rate {rate}")]
    NonFiniteResidual { equation: &'static str, rate: f64 },

    /// Loan input failed validation
    #[error("invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RateError {
    /// True for failures of the search itself, as opposed to bad inputs or I/O
    pub fn is_search_failure(&self) -> bool {
        matches!(
            self,
            RateError::NoBracketedRoot { .. }
                | RateError::NotConverged { .. }
                | RateError::NonFiniteResidual { .. }
        )
    }

    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        RateError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_converged_message() {
        let err = RateError::NotConverged {
            equation: "npv",
            iterations: 1000,
            last_rate: 0.9,
            last_residual: 12.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("npv"));
        assert!(msg.contains("1000 iterations"));
        assert!(err.is_search_failure());
    }

    #[test]
    fn test_input_errors_are_not_search_failures() {
        let err = RateError::invalid_input("principal", "must be positive");
        assert_eq!(err.to_string(), "invalid input: principal - must be positive");
        assert!(!err.is_search_failure());

        let err = RateError::InvalidConfig("iterations must be positive".into());
        assert!(!err.is_search_failure());
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<f64, _> = serde_json::from_str("not json");
        let err: RateError = parse.unwrap_err().into();
        assert!(matches!(err, RateError::Json(_)));
    }
}
