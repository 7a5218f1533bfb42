//! Net present value residual, solved for the internal rate of return

use super::{discounted_residual, RateEquation};
use crate::params::CalculationParameters;

/// NPV of the loan at a periodic `rate`:
/// `-investment + upfront_fee + Σ cash_flows[i-1] / (1 + rate)^i`
///
/// Undefined for `rate <= -1`; the result is then non-finite.
pub fn npv_residual(rate: f64, investment: f64, cash_flows: &[f64], upfront_fee: f64) -> f64 {
    let base = 1.0 + rate;
    discounted_residual(investment, cash_flows, upfront_fee, |period| {
        base.powi(period as i32)
    })
}

/// Discounted cash flow equation with one compounding per period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetPresentValue;

impl RateEquation for NetPresentValue {
    fn name(&self) -> &'static str {
        "npv"
    }

    fn residual(&self, rate: f64, params: &CalculationParameters<'_>) -> f64 {
        npv_residual(rate, params.investment, params.cash_flows, params.upfront_fee)
    }
}
