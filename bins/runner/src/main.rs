//! Day-end run.
//!
//! Posts the day-end entries for every rental installment due on or before
//! the cutoff date, inside one database transaction. The transaction is
//! committed only if every installment succeeds.
//!
//! Usage:
//!   dayend                              - All contracts, due up to today
//!   dayend --date 2024-01-31            - All contracts, due up to a date
//!   dayend --manual --contract 42       - One contract
//!   dayend --dry-run                    - Run, print the report, roll back

use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use sea_orm::TransactionTrait;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dayend_core::dayend::{DayEndRunner, RunReport, RunScope, UpdatedContractRecord};
use dayend_db::{DayEndRepository, connect};
use dayend_shared::types::ContractId;
use dayend_shared::{AppConfig, AppError};

#[derive(Parser, Debug)]
#[command(name = "dayend", version, about = "Day-end arrears and provisioning run")]
struct Cli {
    /// Process installments due on or before this date (defaults to today, local time)
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Restrict the run to one contract
    #[arg(long, value_name = "ID")]
    contract: Option<ContractId>,

    /// Manually triggered run; requires --contract
    #[arg(long)]
    manual: bool,

    /// Roll back instead of committing
    #[arg(long)]
    dry_run: bool,
}

/// JSON report printed on success.
#[derive(Debug, Serialize)]
struct ReportOutput<'a> {
    cutoff: NaiveDate,
    scope: RunScope,
    processed: usize,
    status_changes: usize,
    elapsed_ms: u128,
    committed: bool,
    updated_contracts: &'a [UpdatedContractRecord],
}

impl<'a> ReportOutput<'a> {
    fn new(report: &'a RunReport, committed: bool) -> Self {
        Self {
            cutoff: report.cutoff,
            scope: report.scope,
            processed: report.processed(),
            status_changes: report.status_changes().count(),
            elapsed_ms: report.elapsed.as_millis(),
            committed,
            updated_contracts: &report.updated_contracts,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dayend=info,dayend_core=info,dayend_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<AppError>()
                .map_or(1, AppError::exit_code);
            error!(error = %format!("{err:#}"), "Day-end run failed");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let scope = RunScope::from_request(cli.manual, cli.contract).map_err(AppError::from)?;
    let cutoff = cli.date.unwrap_or_else(|| Local::now().date_naive());

    let config = AppConfig::load().map_err(AppError::from)?;

    let db = connect(&config.database)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let runner = DayEndRunner::from_config(&config.dayend);
    let txn = db
        .begin()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let outcome = runner.run(&DayEndRepository::new(&txn), cutoff, scope).await;

    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            warn!(
                error_code = err.error_code(),
                data_integrity = err.is_data_integrity(),
                "Rolling back day-end transaction"
            );
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::from(err).into());
        }
    };

    let committed = !cli.dry_run;
    if committed {
        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!(processed = report.processed(), "Day-end transaction committed");
    } else {
        txn.rollback()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        info!(processed = report.processed(), "Dry run, transaction rolled back");
    }

    let output = serde_json::to_string_pretty(&ReportOutput::new(&report, committed))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    println!("{output}");

    Ok(())
}
