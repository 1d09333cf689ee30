//! `recap run` command - summarize every pending transcript

use std::time::Instant;

use recap_core::batch::{BatchDriver, BatchReport, ProcessedDocument};
use recap_core::error::Result;
use recap_core::interrupt::Interrupt;
use recap_core::ledger::ProcessingLedger;
use recap_core::llm::openai::OpenAiClient;
use recap_core::tokens::BpeTokenCounter;
use recap_core::trace_time;

use crate::cli::{Cli, OutputFormat};
use crate::commands::load_config;

/// Exit status used when a second Ctrl-C forces termination
const FORCED_EXIT_STATUS: i32 = 130;

/// Execute the run command
pub fn execute(cli: &Cli, limit: Option<usize>, start: Instant) -> Result<()> {
    let config = load_config(cli)?;
    let api_key = config.require_api_key()?.clone();

    let counter = BpeTokenCounter::cl100k()?;
    trace_time!(start, "load_tokenizer");

    let client = OpenAiClient::new(&config.llm, api_key);
    let ledger = ProcessingLedger::open(&config.ledger_file())?;
    tracing::debug!(
        endpoint = client.endpoint(),
        ledger = %ledger.path().display(),
        done = ledger.len(),
        "run_setup"
    );

    let interrupt = install_interrupt_handler(cli.quiet);
    let mut driver =
        BatchDriver::new(&config, ledger, &client, &counter, interrupt).with_limit(limit);

    let print_titles = cli.format == OutputFormat::Human && !cli.quiet;
    let mut on_done = |doc: &ProcessedDocument| println!("Title: {}", doc.title);
    let progress: Option<&mut dyn FnMut(&ProcessedDocument)> = if print_titles {
        Some(&mut on_done)
    } else {
        None
    };

    let report = driver.run(progress)?;
    trace_time!(start, "run");

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Human if !cli.quiet => print_report(&report),
        OutputFormat::Human => {}
    }

    Ok(())
}

/// First Ctrl-C asks the batch to stop; a second one exits immediately
fn install_interrupt_handler(quiet: bool) -> Interrupt {
    let interrupt = Interrupt::new();
    let handler_side = interrupt.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        if handler_side.trigger() > 1 {
            std::process::exit(FORCED_EXIT_STATUS);
        }
        if !quiet {
            eprintln!("Interrupt received, stopping after the current call (Ctrl-C again to force)");
        }
    }) {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    interrupt
}

fn print_report(report: &BatchReport) {
    println!();
    println!(
        "Processed {}, failed {}, already done {}, excluded {}",
        report.processed.len(),
        report.failed.len(),
        report.skipped_done,
        report.skipped_excluded
    );
    if report.deferred > 0 {
        println!("{} left for a later run (--limit)", report.deferred);
    }

    if !report.failed.is_empty() {
        println!();
        println!("Failed (will be retried next run):");
        for failed in &report.failed {
            println!("  {}: {}", failed.source, failed.error);
        }
    }
}
