//! Search parameters for the bisection root finder

use crate::error::{RateError, Result};
use std::env;

/// Default iteration cap
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Default absolute residual tolerance, in currency units
pub const DEFAULT_PRECISION: f64 = 0.1;

/// Default lower edge of the rate bracket
pub const DEFAULT_LOWER_BOUND: f64 = 0.001;

/// Default upper edge of the rate bracket
pub const DEFAULT_UPPER_BOUND: f64 = 0.9;

/// Bisection settings for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Hard cap on loop count
    pub iterations: u32,

    /// A rate is accepted once `|residual| < precision`
    pub precision: f64,

    /// Initial bracket
    pub lower_bound: f64,
    pub upper_bound: f64,

    /// Reject brackets whose end residuals share a sign instead of
    /// running the full iteration budget
    pub require_sign_change: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            precision: DEFAULT_PRECISION,
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            require_sign_change: false,
        }
    }
}

impl SearchConfig {
    /// Search used for the internal rate of return
    pub fn irr() -> Self {
        Self::default()
    }

    /// Search used for the annual percentage rate
    pub fn apr() -> Self {
        Self::default()
    }

    pub fn with_bracket(mut self, lower_bound: f64, upper_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_sign_check(mut self, require_sign_change: bool) -> Self {
        self.require_sign_change = require_sign_change;
        self
    }

    /// Defaults overridden by environment variables:
    ///   RATE_SEARCH_ITERATIONS, RATE_SEARCH_PRECISION,
    ///   RATE_SEARCH_LOWER_BOUND, RATE_SEARCH_UPPER_BOUND,
    ///   RATE_SEARCH_REQUIRE_SIGN_CHANGE
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SearchConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            iterations: lookup("RATE_SEARCH_ITERATIONS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.iterations),
            precision: lookup("RATE_SEARCH_PRECISION")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.precision),
            lower_bound: lookup("RATE_SEARCH_LOWER_BOUND")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.lower_bound),
            upper_bound: lookup("RATE_SEARCH_UPPER_BOUND")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.upper_bound),
            require_sign_change: lookup("RATE_SEARCH_REQUIRE_SIGN_CHANGE")
                .map(|s| parse_flag(&s))
                .unwrap_or(defaults.require_sign_change),
        }
    }

    /// Check the invariants the search relies on
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(RateError::InvalidConfig("iterations must be positive".into()));
        }
        if !(self.precision.is_finite() && self.precision > 0.0) {
            return Err(RateError::InvalidConfig(format!(
                "precision must be a positive number, got {}",
                self.precision
            )));
        }

        let (lower, upper) = (self.lower_bound, self.upper_bound);
        if !(lower.is_finite() && upper.is_finite()) {
            return Err(RateError::InvalidBracket { lower, upper, reason: "bounds must be finite" });
        }
        if lower >= upper {
            return Err(RateError::InvalidBracket { lower, upper, reason: "lower bound must be below upper bound" });
        }
        // (1 + rate) is raised to fractional powers
        if lower <= -1.0 {
            return Err(RateError::InvalidBracket { lower, upper, reason: "rates must stay above -1" });
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.iterations, 1000);
        assert_eq!(config.precision, 0.1);
        assert_eq!(config.lower_bound, 0.001);
        assert_eq!(config.upper_bound, 0.9);
        assert!(!config.require_sign_change);
        assert_eq!(SearchConfig::irr(), SearchConfig::apr());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("RATE_SEARCH_ITERATIONS", "250"),
            ("RATE_SEARCH_PRECISION", "0.001"),
            ("RATE_SEARCH_UPPER_BOUND", "not-a-number"),
            ("RATE_SEARCH_REQUIRE_SIGN_CHANGE", "true"),
        ]
        .into_iter()
        .collect();

        let config = SearchConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.iterations, 250);
        assert_eq!(config.precision, 0.001);
        assert_eq!(config.lower_bound, DEFAULT_LOWER_BOUND);
        assert_eq!(config.upper_bound, DEFAULT_UPPER_BOUND);
        assert!(config.require_sign_change);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let base = SearchConfig::default();

        assert!(matches!(base.with_iterations(0).validate(), Err(RateError::InvalidConfig(_))));
        assert!(matches!(base.with_precision(0.0).validate(), Err(RateError::InvalidConfig(_))));
        assert!(matches!(base.with_precision(f64::NAN).validate(), Err(RateError::InvalidConfig(_))));
        assert!(matches!(base.with_bracket(0.5, 0.5).validate(), Err(RateError::InvalidBracket { .. })));
        assert!(matches!(base.with_bracket(0.9, 0.1).validate(), Err(RateError::InvalidBracket { .. })));
        assert!(matches!(base.with_bracket(-1.0, 0.5).validate(), Err(RateError::InvalidBracket { .. })));
        assert!(matches!(
            base.with_bracket(0.0, f64::INFINITY).validate(),
            Err(RateError::InvalidBracket { .. })
        ));
        assert!(base.with_bracket(-0.5, 2.0).validate().is_ok());
    }
}
