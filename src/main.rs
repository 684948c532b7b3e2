use clap::Parser;
use miette::{IntoDiagnostic, Result};
use splitledger::application::ledger::GroupLedger;
use splitledger::domain::expense::Expense;
use splitledger::infrastructure::in_memory::InMemoryLedgerStore;
use splitledger::interfaces::csv::expense_reader::ExpenseReader;
use splitledger::interfaces::csv::settlement_writer::{SettlementWriter, summary_json};
use splitledger::settings::{OutputFormat, Settings};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input expenses CSV file
    input: PathBuf,

    /// Group member (repeatable). Defaults to everyone named in the input file.
    #[arg(long = "member", short = 'm')]
    members: Vec<String>,

    /// Output format, overrides the configured one
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Path to a settings file. Defaults to `splitledger.toml` when present.
    #[arg(long, env = "SPLITLEDGER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).into_diagnostic()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("splitledger={}", settings.log_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let file = File::open(&cli.input).into_diagnostic()?;
    let mut expenses = Vec::new();
    for (row, result) in ExpenseReader::new(file).expenses().enumerate() {
        match result {
            Ok(expense) => expenses.push(expense),
            Err(e) => tracing::warn!(row = row + 1, "Error reading expense: {e}"),
        }
    }

    let ledger = GroupLedger::new(Box::new(InMemoryLedgerStore::new()));
    let members = if cli.members.is_empty() {
        roster_from(&expenses)
    } else {
        cli.members
    };
    for member in &members {
        if let Err(e) = ledger.add_member(member).await {
            tracing::warn!("Skipping member {member:?}: {e}");
        }
    }

    for expense in expenses {
        let id = expense.id.clone();
        if let Err(e) = ledger.import_expense(expense).await {
            tracing::warn!(expense = %id, "Error importing expense: {e}");
        }
    }

    let summary = ledger.summary().await.into_diagnostic()?;
    tracing::info!(
        members = summary.balances.len(),
        transfers = summary.settlements.len(),
        all_settled = summary.all_settled,
        "ledger summarized"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format.unwrap_or(settings.format) {
        OutputFormat::Csv => SettlementWriter::new(&mut out)
            .write_summary(&summary)
            .into_diagnostic()?,
        OutputFormat::Json => {
            let json = summary_json(&summary).into_diagnostic()?;
            writeln!(out, "{json}").into_diagnostic()?;
        }
    }

    Ok(())
}

/// Everyone who pays or participates, in order of first appearance.
fn roster_from(expenses: &[Expense]) -> Vec<String> {
    let mut roster: Vec<String> = Vec::new();
    for expense in expenses {
        for member in std::iter::once(&expense.paid_by).chain(&expense.split_among) {
            if !roster.iter().any(|name| name == member.as_str()) {
                roster.push(member.to_string());
            }
        }
    }
    roster
}
