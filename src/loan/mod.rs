//! Loan requests and their on-disk formats

mod request;
pub mod loader;

pub use loader::{
    load_default_fixtures, load_fixtures, load_request_json, load_schedule_csv,
    load_schedule_from_reader, parse_fixtures, ExpectedRates, LoanFixture, DEFAULT_FIXTURES_PATH,
};
pub use request::{LoanRequest, ScheduledPayment, UpfrontFee};
