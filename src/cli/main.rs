mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::Args;
use serde::Deserialize;
use serde_json::json;

use ledger_bridge::adapters::{
    BankAdapter, CreditAdapter, DebitAdapter, ResultStatus, TransferContext, TransferEntry,
};
use ledger_bridge::gateway::Gateway;
use ledger_bridge::ledger::Ledger;
use rust_decimal::Decimal;

/// One orchestrator call to replay.
#[derive(Debug, Deserialize)]
struct Instruction {
    op: Op,
    flow: Flow,
    #[serde(default)]
    previous: Option<ResultStatus>,
    entry: TransferEntry,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum Op {
    Prepare,
    Commit,
    Abort,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum Flow {
    Credit,
    Debit,
}

/// Demo ledger matching the bank's staging fixture:
/// "1" empty, "2" available 70, "3" available 0, "4" inactive.
fn seed_demo_ledger() -> Result<Ledger> {
    let mut ledger = Ledger::new();

    ledger.open_account("1");

    ledger.open_account("2");
    ledger.credit("2", Decimal::from(100), None);
    ledger.debit("2", Decimal::from(10), None);
    ledger.hold("2", Decimal::from(20), None);

    ledger.open_account("3");
    ledger.credit("3", Decimal::from(300), None);
    ledger.debit("3", Decimal::from(200), None);
    ledger.hold("3", Decimal::from(100), None);

    ledger.open_account("4");
    ledger.credit("4", Decimal::from(200), None);
    ledger.debit("4", Decimal::from(20), None);
    ledger.inactivate("4")?;

    Ok(ledger)
}

fn main() -> Result<()> {
    // Parse the CLI arguments
    let args = Args::parse();

    // Initialize logger with default level of info (can be overridden with RUST_LOG)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Seed the demo ledger and construct the adapters
    let mut ledger = seed_demo_ledger().context("Failed to seed the demo ledger")?;
    let credit_adapter = CreditAdapter::new(Gateway::default());
    let debit_adapter = DebitAdapter::new(Gateway::default());

    // 2. Read and parse the instruction file
    log::info!("Replaying instructions from {}", args.input_file.display());
    let input = std::fs::read_to_string(&args.input_file)
        .with_context(|| format!("Failed to open input file: {}", args.input_file.display()))?;
    let instructions: Vec<Instruction> =
        serde_json::from_str(&input).context("Failed to parse instruction file")?;

    // 3. Route each instruction to its adapter, one JSON result per line
    for instruction in &instructions {
        let context = TransferContext {
            entry: instruction.entry.clone(),
            previous: instruction.previous,
        };
        let adapter: &dyn BankAdapter = match instruction.flow {
            Flow::Credit => &credit_adapter,
            Flow::Debit => &debit_adapter,
        };
        let result = match instruction.op {
            Op::Prepare => adapter.prepare(&mut ledger, &context),
            Op::Commit => adapter.commit(&mut ledger, &context),
            Op::Abort => adapter.abort(&mut ledger, &context),
        };
        println!(
            "{}",
            serde_json::to_string(&result).context("Failed to serialize result")?
        );
    }

    log::info!("Replay complete: {} instructions", instructions.len());

    // 4. Dump per-account diagnostics
    for id in ["1", "2", "3", "4"] {
        let account = ledger
            .get_account(id)
            .context("Demo account disappeared")?;
        let dump = json!({
            "account": account,
            "availableBalance": format!("{:.2}", account.available_balance()),
            "transactions": ledger.account_transactions(id),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&dump).context("Failed to serialize diagnostics")?
        );
    }

    Ok(())
}
