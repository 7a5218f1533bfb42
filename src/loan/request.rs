//! Loan request body: principal, upfront fee and payment schedule

use crate::error::{RateError, Result};
use crate::params::CalculationParameters;
use crate::rates::{RateCalculator, RateSummary};
use serde::{Deserialize, Serialize};

/// One scheduled repayment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledPayment {
    /// Principal repaid this period
    pub principal: f64,
    /// Interest and fees charged this period
    pub interest_fee: f64,
}

impl ScheduledPayment {
    /// Cash flow for the period
    pub fn total(&self) -> f64 {
        self.principal + self.interest_fee
    }
}

/// Fee charged at disbursement
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UpfrontFee {
    #[serde(default)]
    pub value: f64,
}

/// A loan to price
///
/// ```json
/// { "principal": 1000, "upfrontFee": { "value": 0 },
///   "schedule": [{ "principal": 69.11, "interestFee": 33.4 }, ...] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub principal: f64,
    #[serde(default)]
    pub upfront_fee: UpfrontFee,
    #[serde(default)]
    pub schedule: Vec<ScheduledPayment>,
}

impl LoanRequest {
    pub fn new(principal: f64, upfront_fee: f64, schedule: Vec<ScheduledPayment>) -> Self {
        Self {
            principal,
            upfront_fee: UpfrontFee { value: upfront_fee },
            schedule,
        }
    }

    /// Per-period cash flows, principal plus interest
    pub fn cash_flows(&self) -> Vec<f64> {
        self.schedule.iter().map(ScheduledPayment::total).collect()
    }

    /// Reject inputs the rate equations are not meant for
    pub fn validate(&self) -> Result<()> {
        if !(self.principal.is_finite() && self.principal > 0.0) {
            return Err(RateError::invalid_input(
                "principal",
                format!("must be a positive number, got {}", self.principal),
            ));
        }
        if !self.upfront_fee.value.is_finite() {
            return Err(RateError::invalid_input("upfrontFee.value", "must be finite"));
        }
        if let Some(i) = self.schedule.iter().position(|p| !p.total().is_finite()) {
            return Err(RateError::invalid_input(
                &format!("schedule[{}]", i),
                "principal and interestFee must be finite",
            ));
        }
        Ok(())
    }

    /// IRR and APR of this loan
    pub fn evaluate(&self, calculator: &RateCalculator) -> RateSummary {
        let cash_flows = self.cash_flows();
        let params = CalculationParameters::new(self.principal, &cash_flows)
            .with_upfront_fee(self.upfront_fee.value);
        calculator.summarize(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::FailureMode;

    const BODY: &str = r#"{
        "principal": 300,
        "upfrontFee": { "value": 5 },
        "schedule": [
            { "principal": 100, "interestFee": 6 },
            { "principal": 100, "interestFee": 4 },
            { "principal": 100, "interestFee": 2 }
        ]
    }"#;

    #[test]
    fn test_parse_request_body() {
        let request: LoanRequest = serde_json::from_str(BODY).unwrap();
        assert_eq!(request.principal, 300.0);
        assert_eq!(request.upfront_fee.value, 5.0);
        assert_eq!(request.cash_flows(), vec![106.0, 104.0, 102.0]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_fee_and_schedule_default() {
        let request: LoanRequest = serde_json::from_str(r#"{ "principal": 50 }"#).unwrap();
        assert_eq!(request.upfront_fee.value, 0.0);
        assert!(request.schedule.is_empty());

        let summary = request.evaluate(&RateCalculator::default());
        assert_eq!(summary.irr, Some(0.0));
        assert_eq!(summary.apr, Some(0.0));
    }

    #[test]
    fn test_validate() {
        let mut request = LoanRequest::new(0.0, 0.0, vec![]);
        assert!(matches!(request.validate(), Err(RateError::InvalidInput { ref field, .. }) if field == "principal"));

        request.principal = 100.0;
        request.schedule.push(ScheduledPayment { principal: f64::NAN, interest_fee: 1.0 });
        assert!(matches!(request.validate(), Err(RateError::InvalidInput { ref field, .. }) if field == "schedule[0]"));
    }

    #[test]
    fn test_evaluate() {
        let request: LoanRequest = serde_json::from_str(BODY).unwrap();
        let summary = request.evaluate(&RateCalculator::default().with_failure_mode(FailureMode::Explicit));

        let irr = summary.irr.unwrap();
        let apr = summary.apr.unwrap();
        assert!(irr > 0.0 && irr < 0.9);
        assert!(apr > 0.0 && apr < 90.0);
        assert!(summary.errors.is_empty());
    }
}
