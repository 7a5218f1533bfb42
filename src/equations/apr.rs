//! Fee-adjusted APR residual for monthly payment schedules

use super::{discounted_residual, RateEquation};
use crate::params::CalculationParameters;

/// Payments per year; cash flow `i` (1-based) is discounted over `i / 12` years
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Residual of the APR equation at an annual `rate`:
/// `-investment + upfront_fee + Σ cash_flows[i-1] / (1 + rate)^(i/12)`
///
/// Undefined for `rate <= -1`; the result is then non-finite.
pub fn apr_residual(rate: f64, investment: f64, cash_flows: &[f64], upfront_fee: f64) -> f64 {
    let base = 1.0 + rate;
    discounted_residual(investment, cash_flows, upfront_fee, |period| {
        base.powf(period as f64 / PERIODS_PER_YEAR)
    })
}

/// Monthly payments discounted at a nominal annual rate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyApr;

impl RateEquation for MonthlyApr {
    fn name(&self) -> &'static str {
        "apr"
    }

    fn residual(&self, rate: f64, params: &CalculationParameters<'_>) -> f64 {
        apr_residual(rate, params.investment, params.cash_flows, params.upfront_fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_twelfth_payment_discounted_one_year() {
        let mut flows = vec![0.0; 11];
        flows.push(120.0);
        assert_abs_diff_eq!(apr_residual(0.20, 100.0, &flows, 0.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_first_payment_discounted_one_month() {
        let rate: f64 = 0.12;
        let expected = -90.0 + 100.0 / (1.0 + rate).powf(1.0 / 12.0);
        assert_abs_diff_eq!(apr_residual(rate, 90.0, &[100.0], 0.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_npv_at_equivalent_monthly_rate() {
        // (1 + apr) = (1 + monthly)^12 makes both equations agree
        let monthly: f64 = 0.015;
        let annual = (1.0 + monthly).powi(12) - 1.0;
        let flows = [95.0; 18];
        let params = CalculationParameters::new(1500.0, &flows).with_upfront_fee(20.0);

        let apr = MonthlyApr.residual(annual, &params);
        let npv = crate::equations::NetPresentValue.residual(monthly, &params);
        assert_abs_diff_eq!(apr, npv, epsilon = 1e-8);
    }

    #[test]
    fn test_rate_below_minus_one_is_not_finite() {
        assert!(!apr_residual(-1.5, 100.0, &[50.0, 60.0], 0.0).is_finite());
    }
}
