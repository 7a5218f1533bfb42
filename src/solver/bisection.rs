//! Bounded bisection search
//!
//! The search checks the current midpoint against the precision first, then
//! halves the bracket, keeping the half in which the residual changes sign
//! relative to the lower bound. When the residual never gets within the
//! precision the search fails after the configured number of iterations.

use super::config::SearchConfig;
use crate::equations::RateEquation;
use crate::error::{RateError, Result};
use crate::params::CalculationParameters;
use log::{debug, trace};

/// A converged search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// Rate at which the residual met the precision
    pub rate: f64,

    /// Residual at `rate`
    pub residual: f64,

    /// Bisection steps taken before convergence
    pub iterations: u32,
}

/// Bisection root finder with a fixed [`SearchConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    config: SearchConfig,
}

impl Default for Bisection {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Bisection {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Solve `equation` for the rate at which its residual vanishes
    pub fn solve<E>(&self, equation: &E, params: &CalculationParameters<'_>) -> Result<SearchOutcome>
    where
        E: RateEquation + ?Sized,
    {
        self.find_root(equation.name(), |rate| equation.residual(rate, params))
    }

    /// Bisection over an arbitrary residual function.
    ///
    /// `label` identifies the function in logs and errors.
    pub fn find_root<F>(&self, label: &'static str, residual: F) -> Result<SearchOutcome>
    where
        F: Fn(f64) -> f64,
    {
        self.config.validate()?;

        let eval = |rate: f64| -> Result<f64> {
            let value = residual(rate);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(RateError::NonFiniteResidual { equation: label, rate })
            }
        };

        let SearchConfig { iterations, precision, .. } = self.config;
        let mut lower = self.config.lower_bound;
        let mut upper = self.config.upper_bound;
        let mut lower_residual = eval(lower)?;

        if self.config.require_sign_change {
            let upper_residual = eval(upper)?;
            if lower_residual * upper_residual > 0.0 {
                return Err(RateError::NoBracketedRoot {
                    equation: label,
                    lower,
                    upper,
                    lower_residual,
                    upper_residual,
                });
            }
        }

        let mut mid = midpoint(lower, upper);
        let mut mid_residual = eval(mid)?;

        for iteration in 0..iterations {
            if mid_residual.abs() < precision {
                debug!("{} converged at rate {} after {} iterations", label, mid, iteration);
                return Ok(SearchOutcome {
                    rate: mid,
                    residual: mid_residual,
                    iterations: iteration,
                });
            }

            mid = midpoint(lower, upper);
            mid_residual = eval(mid)?;
            trace!("{} step {}: [{}, {}] mid {} residual {}", label, iteration, lower, upper, mid, mid_residual);

            if lower_residual * mid_residual < 0.0 {
                upper = mid;
            } else {
                lower = mid;
                lower_residual = mid_residual;
            }
        }

        debug!("{} did not converge after {} iterations", label, iterations);
        Err(RateError::NotConverged {
            equation: label,
            iterations,
            last_rate: mid,
            last_residual: mid_residual,
        })
    }
}

fn midpoint(lower: f64, upper: f64) -> f64 {
    (lower + upper) / 2.0
}
