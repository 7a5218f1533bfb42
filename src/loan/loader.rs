//! Load payment schedules, loan requests and reference fixtures from disk

use super::request::{LoanRequest, ScheduledPayment};
use crate::error::Result;
use csv::Reader;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default location of the reference fixtures
pub const DEFAULT_FIXTURES_PATH: &str = "data/fixtures/reference_loans.json";

/// Raw CSV row matching schedule files (`principal,interestFee`)
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "principal")]
    principal: f64,
    #[serde(rename = "interestFee")]
    interest_fee: f64,
}

impl From<CsvRow> for ScheduledPayment {
    fn from(row: CsvRow) -> Self {
        ScheduledPayment {
            principal: row.principal,
            interest_fee: row.interest_fee,
        }
    }
}

/// Rates a fixture is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedRates {
    /// APR percentage
    pub apr: f64,
    /// Periodic IRR as a decimal
    pub irr: f64,
}

/// A loan together with its reference rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanFixture {
    pub input: LoanRequest,
    pub output: ExpectedRates,
}

/// Load a payment schedule from a CSV file
pub fn load_schedule_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ScheduledPayment>> {
    let file = File::open(path)?;
    load_schedule_from_reader(file)
}

/// Load a payment schedule from any reader (e.g., string buffer, stdin)
pub fn load_schedule_from_reader<R: Read>(reader: R) -> Result<Vec<ScheduledPayment>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut schedule = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        schedule.push(row.into());
    }

    Ok(schedule)
}

/// Load a single loan request body from a JSON file
pub fn load_request_json<P: AsRef<Path>>(path: P) -> Result<LoanRequest> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Load reference fixtures from a JSON file
pub fn load_fixtures<P: AsRef<Path>>(path: P) -> Result<Vec<LoanFixture>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Parse reference fixtures from a JSON string
pub fn parse_fixtures(json: &str) -> Result<Vec<LoanFixture>> {
    Ok(serde_json::from_str(json)?)
}

/// Load the fixtures shipped in `data/fixtures/`
pub fn load_default_fixtures() -> Result<Vec<LoanFixture>> {
    load_fixtures(DEFAULT_FIXTURES_PATH)
}
