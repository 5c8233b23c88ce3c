use crate::demo::run_demo;
use crate::infra::{load_repository, parse_date, print_json};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use credit_desk::config::AppConfig;
use credit_desk::error::AppError;
use credit_desk::lending::{CreditPolicy, CustomerId, LendingService, LoanApplication, LoanId};
use credit_desk::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "credit-desk",
    about = "Score customers, price loans and decide on credit requests",
    version
)]
struct Cli {
    /// JSON credit policy overriding the built-in rule table (or CREDIT_POLICY_PATH)
    #[arg(long, global = true)]
    policy: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide on a loan request without recording it
    Check(DecisionArgs),
    /// Decide on a loan request and record it in the snapshot when approved
    Create(CreateArgs),
    /// List the loans held by a customer
    Loans(LoansArgs),
    /// Show a single loan with its owner
    Loan(LoanArgs),
    /// Print the credit score and the rules behind it
    Score(ScoreArgs),
    /// Walk through reference decisions against an in-memory ledger
    Demo,
}

#[derive(Args, Debug)]
pub(crate) struct SnapshotArgs {
    /// JSON ledger with `customers` and `loans` arrays
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DecisionArgs {
    #[command(flatten)]
    pub(crate) ledger: SnapshotArgs,
    #[arg(long)]
    pub(crate) customer_id: u64,
    /// Requested principal
    #[arg(long)]
    pub(crate) amount: f64,
    /// Requested annual interest rate, in percent
    #[arg(long)]
    pub(crate) rate: f64,
    /// Tenure in months
    #[arg(long)]
    pub(crate) tenure: u32,
}

impl DecisionArgs {
    fn application(&self) -> LoanApplication {
        LoanApplication {
            customer_id: CustomerId(self.customer_id),
            loan_amount: self.amount,
            interest_rate: self.rate,
            tenure: self.tenure,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct CreateArgs {
    #[command(flatten)]
    pub(crate) decision: DecisionArgs,
    /// Loan start date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start_date: Option<NaiveDate>,
    /// Write the updated ledger back to the snapshot file
    #[arg(long)]
    pub(crate) save: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LoansArgs {
    #[command(flatten)]
    pub(crate) ledger: SnapshotArgs,
    #[arg(long)]
    pub(crate) customer_id: u64,
}

#[derive(Args, Debug)]
pub(crate) struct LoanArgs {
    #[command(flatten)]
    pub(crate) ledger: SnapshotArgs,
    #[arg(long)]
    pub(crate) loan_id: u64,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    #[command(flatten)]
    pub(crate) ledger: SnapshotArgs,
    #[arg(long)]
    pub(crate) customer_id: u64,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(path) = cli.policy {
        config.credit.policy_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;
    let policy = config.credit.load_policy()?;
    info!(environment = ?config.environment, policy_path = ?config.credit.policy_path, "credit desk ready");

    match cli.command {
        Command::Check(args) => run_check(args, policy),
        Command::Create(args) => run_create(args, policy),
        Command::Loans(args) => {
            let service = service_for(&args.ledger, policy)?;
            print_json(&service.view_loans(CustomerId(args.customer_id))?)
        }
        Command::Loan(args) => {
            let service = service_for(&args.ledger, policy)?;
            print_json(&service.view_loan(LoanId(args.loan_id))?)
        }
        Command::Score(args) => run_score(args, policy),
        Command::Demo => run_demo(policy),
    }
}

fn service_for(
    ledger: &SnapshotArgs,
    policy: CreditPolicy,
) -> Result<LendingService<credit_desk::lending::InMemoryLendingRepository>, AppError> {
    let repository = load_repository(&ledger.snapshot)?;
    Ok(LendingService::new(Arc::new(repository), policy))
}

fn run_check(args: DecisionArgs, policy: CreditPolicy) -> Result<(), AppError> {
    let service = service_for(&args.ledger, policy)?;
    let response = service.check_eligibility(&args.application())?;
    print_json(&response)
}

fn run_create(args: CreateArgs, policy: CreditPolicy) -> Result<(), AppError> {
    let CreateArgs {
        decision,
        start_date,
        save,
    } = args;

    let repository = Arc::new(load_repository(&decision.ledger.snapshot)?);
    let service = LendingService::new(repository.clone(), policy);

    let start_date = start_date.unwrap_or_else(|| Local::now().date_naive());
    let response = service.create_loan_on(&decision.application(), start_date)?;
    print_json(&response)?;

    if save && response.loan_approved {
        let snapshot = repository.snapshot()?;
        std::fs::write(
            &decision.ledger.snapshot,
            serde_json::to_string_pretty(&snapshot)?,
        )?;
        info!(path = %decision.ledger.snapshot.display(), "ledger saved");
    }

    Ok(())
}

fn run_score(args: ScoreArgs, policy: CreditPolicy) -> Result<(), AppError> {
    let service = service_for(&args.ledger, policy)?;
    let score = service.score_customer(CustomerId(args.customer_id))?;
    print_json(&score)
}
