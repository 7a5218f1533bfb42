//! Loan Rates CLI
//!
//! Command-line interface for computing IRR and APR of loan schedules
//!
//! Search settings come from RATE_SEARCH_* environment variables and the
//! failure mode from RATE_FAILURE_MODE (see `SearchConfig::from_env`).

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use loan_rates::batch::{BatchRunner, FixtureCheck};
use loan_rates::loan::{self, LoanRequest, ScheduledPayment, DEFAULT_FIXTURES_PATH};
use loan_rates::{FailureMode, RateCalculator, RateSummary};
use log::info;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "loan_rates", version, about = "IRR and APR for loan payment schedules")]
struct Cli {
    /// Report failed searches as errors instead of 0
    #[arg(long, global = true)]
    strict: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute IRR and APR for one loan
    Calculate(CalculateArgs),
    /// Check reference fixtures against their expected rates
    Check {
        /// Fixture file (array of { input, output })
        #[arg(default_value = DEFAULT_FIXTURES_PATH)]
        fixtures: PathBuf,
    },
}

#[derive(Debug, Args)]
struct CalculateArgs {
    /// Loan request body as JSON ({ principal, upfrontFee, schedule })
    #[arg(long, conflicts_with_all = ["principal", "payments", "schedule"])]
    request: Option<PathBuf>,

    /// Amount disbursed
    #[arg(long, required_unless_present = "request")]
    principal: Option<f64>,

    /// Fee charged at disbursement
    #[arg(long, default_value_t = 0.0)]
    upfront_fee: f64,

    /// Per-period payments, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with = "schedule")]
    payments: Vec<f64>,

    /// Payment schedule CSV with principal,interestFee columns
    #[arg(long)]
    schedule: Option<PathBuf>,
}

impl CalculateArgs {
    fn into_request(self) -> Result<LoanRequest> {
        if let Some(path) = &self.request {
            return loan::load_request_json(path)
                .with_context(|| format!("Failed to load request {}", path.display()));
        }

        let schedule = match &self.schedule {
            Some(path) => loan::load_schedule_csv(path)
                .with_context(|| format!("Failed to load schedule {}", path.display()))?,
            None => self
                .payments
                .iter()
                .map(|&amount| ScheduledPayment { principal: amount, interest_fee: 0.0 })
                .collect(),
        };

        let principal = self.principal.context("--principal is required")?;
        Ok(LoanRequest::new(principal, self.upfront_fee, schedule))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut calculator = RateCalculator::from_env();
    if cli.strict {
        calculator = calculator.with_failure_mode(FailureMode::Explicit);
    }

    match cli.command {
        Command::Calculate(args) => {
            let request = args.into_request()?;
            if cli.strict {
                request.validate()?;
            }
            let summary = request.evaluate(&calculator);

            if cli.json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                print_summary(&request, &summary);
            }

            if cli.strict && !summary.errors.is_empty() {
                bail!("{}", summary.errors.join("; "));
            }
        }
        Command::Check { fixtures } => {
            let start = Instant::now();
            let fixtures = loan::load_fixtures(&fixtures)
                .with_context(|| format!("Failed to load fixtures {}", fixtures.display()))?;
            info!("Loaded {} fixtures", fixtures.len());

            let checks = BatchRunner::with_calculator(calculator).check_fixtures(&fixtures);
            info!("Checked {} fixtures in {:?}", checks.len(), start.elapsed());

            if cli.json {
                println!("{}", serde_json::to_string(&checks)?);
            } else {
                print_checks(&checks);
            }

            let failed = checks.iter().filter(|c| !c.passed()).count();
            if failed > 0 {
                bail!("{} of {} fixtures outside tolerance", failed, checks.len());
            }
        }
    }

    Ok(())
}

fn format_rate(rate: Option<f64>, suffix: &str) -> String {
    match rate {
        Some(value) => format!("{}{}", value, suffix),
        None => "not found".to_string(),
    }
}

fn print_summary(request: &LoanRequest, summary: &RateSummary) {
    println!("Principal:   {:.2}", request.principal);
    println!("Upfront fee: {:.2}", request.upfront_fee.value);
    println!("Periods:     {}", request.schedule.len());
    println!();
    println!("  IRR: {}", format_rate(summary.irr, ""));
    println!("  APR: {}", format_rate(summary.apr, "%"));

    for error in &summary.errors {
        println!("  ! {}", error);
    }
}

fn print_checks(checks: &[FixtureCheck]) {
    println!("{:>5} {:>14} {:>14} {:>10} {:>10} {:>6}",
        "#", "IRR", "Expected", "APR", "Expected", "OK");
    println!("{}", "-".repeat(64));

    for check in checks {
        println!("{:>5} {:>14} {:>14} {:>10} {:>10} {:>6}",
            check.index,
            format_rate(check.actual.irr, ""),
            check.expected.irr,
            format_rate(check.actual.apr, ""),
            check.expected.apr,
            if check.passed() { "yes" } else { "NO" },
        );
    }
}
