//! Loan Rates - IRR and APR solver for fixed payment loan schedules
//!
//! This library provides:
//! - Residual equations for discounted cash flows (NPV) and fee-adjusted monthly APR
//! - A bounded bisection root finder generic over the equation
//! - IRR/APR adapters with rounding and a `0` failure sentinel
//! - Loan request parsing, schedule/fixture loaders and parallel batch runs

pub mod error;
pub mod params;
pub mod equations;
pub mod solver;
pub mod rates;
pub mod loan;
pub mod batch;

// Re-export commonly used types
pub use error::{RateError, Result};
pub use params::CalculationParameters;
pub use equations::{RateEquation, NetPresentValue, MonthlyApr, npv_residual, apr_residual};
pub use solver::{Bisection, SearchConfig, SearchOutcome};
pub use rates::{
    calculate_apr, calculate_irr, solve_apr, solve_irr, FailureMode, Metric, RateCalculator,
    RateSummary,
};
pub use loan::{LoanRequest, ScheduledPayment};
pub use batch::BatchRunner;
