//! `recap status` command - classify transcripts without calling the model

use serde::Serialize;

use recap_core::batch::{plan_inputs, BatchPlan};
use recap_core::error::Result;
use recap_core::ledger::ProcessingLedger;

use crate::cli::{Cli, OutputFormat};
use crate::commands::load_config;

#[derive(Serialize)]
struct StatusOutput<'a> {
    input: String,
    ledger: String,
    #[serde(flatten)]
    plan: &'a BatchPlan,
}

/// Execute the status command
pub fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ledger = ProcessingLedger::load(&config.ledger_file())?;
    let plan = plan_inputs(&config, &ledger)?;

    match cli.format {
        OutputFormat::Json => {
            let output = StatusOutput {
                input: config.input_path().display().to_string(),
                ledger: ledger.path().display().to_string(),
                plan: &plan,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Input: {}", config.input_path().display());
                println!("Ledger: {}", ledger.path().display());
                println!();
            }
            print_section("Pending", &plan.pending);
            print_section("Done", &plan.done);
            print_section("Excluded", &plan.excluded);
        }
    }

    Ok(())
}

fn print_section(label: &str, names: &[String]) {
    println!("{} ({}):", label, names.len());
    for name in names {
        println!("  {}", name);
    }
}
