//! Batch runner for many independent loans
//!
//! Every calculation is self-contained, so batches are spread across threads
//! with rayon without any shared state.

use crate::loan::{ExpectedRates, LoanFixture, LoanRequest};
use crate::rates::{RateCalculator, RateSummary};
use rayon::prelude::*;
use serde::Serialize;

/// Absolute IRR tolerance used when checking fixtures
pub const IRR_TOLERANCE: f64 = 0.001;

/// Absolute APR tolerance (percentage points) used when checking fixtures
pub const APR_TOLERANCE: f64 = 0.2;

/// Result of comparing one fixture against its reference rates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureCheck {
    /// Position of the fixture in its file
    pub index: usize,
    pub expected: ExpectedRates,
    pub actual: RateSummary,
    pub irr_ok: bool,
    pub apr_ok: bool,
}

impl FixtureCheck {
    pub fn passed(&self) -> bool {
        self.irr_ok && self.apr_ok
    }
}

/// Runs loans through one shared calculator
///
/// # Example
/// ```ignore
/// let runner = BatchRunner::new();
/// let summaries = runner.run_batch(&requests);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    calculator: RateCalculator,
}

impl BatchRunner {
    /// Runner with the default search settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calculator(calculator: RateCalculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &RateCalculator {
        &self.calculator
    }

    /// Rates for a single loan
    pub fn run(&self, request: &LoanRequest) -> RateSummary {
        request.evaluate(&self.calculator)
    }

    /// Rates for many loans, in input order
    pub fn run_batch(&self, requests: &[LoanRequest]) -> Vec<RateSummary> {
        requests.par_iter().map(|request| self.run(request)).collect()
    }

    /// Compare each fixture with its reference rates
    pub fn check_fixtures(&self, fixtures: &[LoanFixture]) -> Vec<FixtureCheck> {
        fixtures
            .par_iter()
            .enumerate()
            .map(|(index, fixture)| {
                let actual = self.run(&fixture.input);
                let irr_ok = within(actual.irr, fixture.output.irr, IRR_TOLERANCE);
                let apr_ok = within(actual.apr, fixture.output.apr, APR_TOLERANCE);

                FixtureCheck {
                    index,
                    expected: fixture.output,
                    actual,
                    irr_ok,
                    apr_ok,
                }
            })
            .collect()
    }
}

fn within(actual: Option<f64>, expected: f64, tolerance: f64) -> bool {
    actual.is_some_and(|value| (value - expected).abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{parse_fixtures, ScheduledPayment};
    use crate::rates::FailureMode;
    use approx::assert_abs_diff_eq;

    const REFERENCE: &str = include_str!("../data/fixtures/reference_loans.json");

    #[test]
    fn test_reference_fixtures_pass() {
        let fixtures = parse_fixtures(REFERENCE).unwrap();
        let checks = BatchRunner::new().check_fixtures(&fixtures);

        assert_eq!(checks.len(), fixtures.len());
        for check in &checks {
            assert!(check.passed(), "fixture {} failed: {:?}", check.index, check);
        }
    }

    #[test]
    fn test_golden_fixture() {
        let fixtures = parse_fixtures(REFERENCE).unwrap();
        let summary = BatchRunner::new().run(&fixtures[0].input);

        assert_eq!(summary.apr, Some(48.3));
        assert_abs_diff_eq!(summary.irr.unwrap(), 0.033, epsilon = IRR_TOLERANCE);
    }

    #[test]
    fn test_batch_preserves_order() {
        let fixtures = parse_fixtures(REFERENCE).unwrap();
        let requests: Vec<LoanRequest> = fixtures.iter().map(|f| f.input.clone()).collect();
        let runner = BatchRunner::new();

        let batch = runner.run_batch(&requests);
        let sequential: Vec<RateSummary> = requests.iter().map(|r| runner.run(r)).collect();
        assert_eq!(batch, sequential);
    }

    #[test]
    fn test_mismatch_is_reported() {
        let mut fixtures = parse_fixtures(REFERENCE).unwrap();
        fixtures[1].output.apr += 1.0;

        let checks = BatchRunner::new().check_fixtures(&fixtures);
        assert!(checks[0].passed());
        assert!(checks[1].irr_ok);
        assert!(!checks[1].apr_ok);
    }

    #[test]
    fn test_explicit_failure_never_passes() {
        let fixture = LoanFixture {
            input: LoanRequest::new(1000.0, 0.0, vec![ScheduledPayment { principal: 0.0, interest_fee: 0.0 }]),
            output: ExpectedRates { apr: 0.0, irr: 0.0 },
        };

        // the sentinel matches a zero expectation, a missing rate does not
        let sentinel = BatchRunner::new().check_fixtures(std::slice::from_ref(&fixture));
        assert!(sentinel[0].passed());

        let runner = BatchRunner::with_calculator(RateCalculator::default().with_failure_mode(FailureMode::Explicit));
        let explicit = runner.check_fixtures(&[fixture]);
        assert!(!explicit[0].passed());
    }
}
