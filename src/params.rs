//! Calculation inputs shared by every rate equation

/// Fixed arguments of a rate equation, everything except the rate itself.
///
/// Borrowed for the length of one calculation; the cash flows are never
/// mutated. `cash_flows[0]` is the payment at the end of the first period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationParameters<'a> {
    /// Amount disbursed at period zero
    pub investment: f64,

    /// Per-period total payment (principal + interest), in chronological order
    pub cash_flows: &'a [f64],

    /// One-off fee charged at period zero
    pub upfront_fee: f64,
}

impl<'a> CalculationParameters<'a> {
    /// Parameters with no upfront fee
    pub fn new(investment: f64, cash_flows: &'a [f64]) -> Self {
        Self {
            investment,
            cash_flows,
            upfront_fee: 0.0,
        }
    }

    pub fn with_upfront_fee(mut self, upfront_fee: f64) -> Self {
        self.upfront_fee = upfront_fee;
        self
    }

    /// Number of payment periods
    pub fn periods(&self) -> usize {
        self.cash_flows.len()
    }

    /// Undiscounted sum of all payments
    pub fn total_payments(&self) -> f64 {
        self.cash_flows.iter().sum()
    }
}
