//! Root finding for rate equations

mod bisection;
mod config;

pub use bisection::{Bisection, SearchOutcome};
pub use config::{
    SearchConfig, DEFAULT_ITERATIONS, DEFAULT_LOWER_BOUND, DEFAULT_PRECISION, DEFAULT_UPPER_BOUND,
};
