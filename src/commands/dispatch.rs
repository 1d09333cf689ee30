//! Command dispatch logic for recap

use std::time::Instant;

use recap_core::error::Result;

use crate::cli::{Cli, Commands};
use crate::commands;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    match &cli.command {
        None => handle_no_command(),

        Some(Commands::Run { limit }) => commands::run::execute(cli, *limit, start),

        Some(Commands::Status) => commands::status::execute(cli),

        Some(Commands::Vocab) => commands::vocab::execute(cli),

        Some(Commands::Init { vault, force }) => {
            commands::init::execute(cli, vault.as_deref(), *force)
        }
    }
}

fn handle_no_command() -> Result<()> {
    println!("recap {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Distill conversation transcripts into linked vault notes.");
    println!();
    println!("Run `recap --help` for usage information.");
    Ok(())
}
