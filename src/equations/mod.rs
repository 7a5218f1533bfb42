//! Rate equations: map a candidate rate to a signed residual
//!
//! A residual of zero means the candidate rate is consistent with the
//! investment, fee and cash flows. Two variants are provided:
//! - [`NetPresentValue`]: per-period discounting, solved for IRR
//! - [`MonthlyApr`]: monthly payments discounted at an annual rate, solved for APR

mod apr;
mod npv;

pub use apr::{apr_residual, MonthlyApr};
pub use npv::{npv_residual, NetPresentValue};

use crate::params::CalculationParameters;

/// An equation the root finder can solve for a rate
pub trait RateEquation {
    /// Short label used in logs and errors
    fn name(&self) -> &'static str;

    /// Signed residual at `rate`
    fn residual(&self, rate: f64, params: &CalculationParameters<'_>) -> f64;
}

/// Shared shape of both equations: `-investment + fee + Σ cf / discount(period)`
///
/// `period` is 1-based: the first cash flow is discounted over one period.
pub(crate) fn discounted_residual<D>(
    investment: f64,
    cash_flows: &[f64],
    upfront_fee: f64,
    discount: D,
) -> f64
where
    D: Fn(usize) -> f64,
{
    let present_value: f64 = cash_flows
        .iter()
        .enumerate()
        .map(|(i, &cf)| cf / discount(i + 1))
        .sum();

    -investment + upfront_fee + present_value
}
