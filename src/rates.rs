//! IRR and APR adapters
//!
//! Each metric pairs a rate equation with its search settings and a reporting
//! convention:
//! - IRR: periodic decimal rate rounded to 10 places (e.g. 0.0334010925)
//! - APR: annual rate as a percentage rounded to 1 place (e.g. 48.3)
//!
//! `calculate_irr` / `calculate_apr` report any failure as `0`, which cannot be
//! told apart from a true zero rate. `solve_irr` / `solve_apr` return the error
//! instead.

use crate::equations::{MonthlyApr, NetPresentValue, RateEquation};
use crate::error::Result;
use crate::params::CalculationParameters;
use crate::solver::{Bisection, SearchConfig};
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Value reported in place of a rate that could not be found
pub const FAILURE_SENTINEL: f64 = 0.0;

/// The two rates this crate solves for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Irr,
    Apr,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::Irr => "irr",
            Metric::Apr => "apr",
        }
    }

    /// Equation whose root is this metric
    pub fn equation(self) -> &'static dyn RateEquation {
        match self {
            Metric::Irr => &NetPresentValue,
            Metric::Apr => &MonthlyApr,
        }
    }

    /// Convert a raw root into the reported figure
    pub fn report(self, rate: f64) -> f64 {
        match self {
            Metric::Irr => (rate * 1e10).round() / 1e10,
            // fraction -> percentage with one decimal
            Metric::Apr => (rate * 1000.0).round() / 10.0,
        }
    }
}

/// How a failed search is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Failed rates are reported as `0`
    #[default]
    Sentinel,
    /// Failed rates are reported as missing, with the error message
    Explicit,
}

impl FromStr for FailureMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sentinel" | "compat" => Ok(FailureMode::Sentinel),
            "explicit" | "strict" => Ok(FailureMode::Explicit),
            other => Err(format!("Unknown failure mode: {}", other)),
        }
    }
}

/// Both rates for one set of parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSummary {
    pub irr: Option<f64>,
    pub apr: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// IRR/APR adapters with their search settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateCalculator {
    irr_search: Bisection,
    apr_search: Bisection,
    failure_mode: FailureMode,
}

impl Default for RateCalculator {
    fn default() -> Self {
        Self::new(SearchConfig::irr(), SearchConfig::apr())
    }
}

impl RateCalculator {
    pub fn new(irr_config: SearchConfig, apr_config: SearchConfig) -> Self {
        Self {
            irr_search: Bisection::new(irr_config),
            apr_search: Bisection::new(apr_config),
            failure_mode: FailureMode::default(),
        }
    }

    /// Search settings from `RATE_SEARCH_*` variables (shared by both metrics)
    /// and the failure mode from `RATE_FAILURE_MODE`
    pub fn from_env() -> Self {
        let config = SearchConfig::from_env();
        let failure_mode = env::var("RATE_FAILURE_MODE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self::new(config, config).with_failure_mode(failure_mode)
    }

    pub fn with_failure_mode(mut self, failure_mode: FailureMode) -> Self {
        self.failure_mode = failure_mode;
        self
    }

    pub fn failure_mode(&self) -> FailureMode {
        self.failure_mode
    }

    pub fn search(&self, metric: Metric) -> &Bisection {
        match metric {
            Metric::Irr => &self.irr_search,
            Metric::Apr => &self.apr_search,
        }
    }

    /// Solve for `metric` and apply its reporting convention
    pub fn solve(&self, metric: Metric, params: &CalculationParameters<'_>) -> Result<f64> {
        let outcome = self.search(metric).solve(metric.equation(), params)?;
        Ok(metric.report(outcome.rate))
    }

    pub fn irr(&self, params: &CalculationParameters<'_>) -> Result<f64> {
        self.solve(Metric::Irr, params)
    }

    pub fn apr(&self, params: &CalculationParameters<'_>) -> Result<f64> {
        self.solve(Metric::Apr, params)
    }

    /// Solve for `metric`, reporting failure as [`FAILURE_SENTINEL`]
    pub fn solve_or_sentinel(&self, metric: Metric, params: &CalculationParameters<'_>) -> f64 {
        self.solve(metric, params).unwrap_or_else(|e| {
            debug!("{} not found, reporting {}: {}", metric.name(), FAILURE_SENTINEL, e);
            FAILURE_SENTINEL
        })
    }

    /// Both metrics, failures reported according to the failure mode
    pub fn summarize(&self, params: &CalculationParameters<'_>) -> RateSummary {
        let mut errors = Vec::new();
        let mut rate = |metric: Metric| match self.solve(metric, params) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("{} not found: {}", metric.name(), e);
                match self.failure_mode {
                    FailureMode::Sentinel => Some(FAILURE_SENTINEL),
                    FailureMode::Explicit => {
                        errors.push(format!("{}: {}", metric.name(), e));
                        None
                    }
                }
            }
        };

        let irr = rate(Metric::Irr);
        let apr = rate(Metric::Apr);
        RateSummary { irr, apr, errors }
    }
}

/// IRR as a periodic decimal rate, or the error that prevented it
pub fn solve_irr(investment: f64, cash_flows: &[f64], upfront_fee: f64) -> Result<f64> {
    let params = CalculationParameters::new(investment, cash_flows).with_upfront_fee(upfront_fee);
    RateCalculator::default().irr(&params)
}

/// APR as a percentage, or the error that prevented it
pub fn solve_apr(investment: f64, cash_flows: &[f64], upfront_fee: f64) -> Result<f64> {
    let params = CalculationParameters::new(investment, cash_flows).with_upfront_fee(upfront_fee);
    RateCalculator::default().apr(&params)
}

/// IRR as a periodic decimal rate (nominally in (0, 1)); `0` if none was found
pub fn calculate_irr(investment: f64, cash_flows: &[f64], upfront_fee: f64) -> f64 {
    let params = CalculationParameters::new(investment, cash_flows).with_upfront_fee(upfront_fee);
    RateCalculator::default().solve_or_sentinel(Metric::Irr, &params)
}

/// APR as a percentage (nominally in (0, 100)); `0` if none was found
pub fn calculate_apr(investment: f64, cash_flows: &[f64], upfront_fee: f64) -> f64 {
    let params = CalculationParameters::new(investment, cash_flows).with_upfront_fee(upfront_fee);
    RateCalculator::default().solve_or_sentinel(Metric::Apr, &params)
}
