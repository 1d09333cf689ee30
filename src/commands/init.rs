//! `recap init` command - write a starter config and an empty ledger

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use recap_core::bail_usage;
use recap_core::config::{RecapConfig, DEFAULT_CONFIG_FILE, DEFAULT_LEDGER_FILE};
use recap_core::error::{RecapError, Result};
use recap_core::ledger::ProcessingLedger;

use crate::cli::{Cli, OutputFormat};

#[derive(Serialize)]
struct InitOutput {
    status: &'static str,
    config: String,
    vault: String,
    ledger: String,
}

/// Execute the init command
pub fn execute(cli: &Cli, vault: Option<&Path>, force: bool) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    if config_path.exists() && !force {
        bail_usage!(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        ));
    }

    let vault_dir = match vault {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };
    let vault_dir = fs::canonicalize(&vault_dir).unwrap_or_else(|_| {
        tracing::warn!(vault = %vault_dir.display(), "Vault directory does not exist yet");
        vault_dir
    });

    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&config_dir)
        .map_err(|e| RecapError::io_operation("create directory", config_dir.display(), e))?;

    fs::write(&config_path, RecapConfig::starter_toml(&vault_dir))
        .map_err(|e| RecapError::io_operation("write", config_path.display(), e))?;
    let ledger = ProcessingLedger::open(&config_dir.join(DEFAULT_LEDGER_FILE))?;

    tracing::info!(config = %config_path.display(), "Wrote starter config");

    match cli.format {
        OutputFormat::Json => {
            let output = InitOutput {
                status: "ok",
                config: config_path.display().to_string(),
                vault: vault_dir.display().to_string(),
                ledger: ledger.path().display().to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Wrote {}", config_path.display());
                println!("Ledger at {}", ledger.path().display());
                println!();
                println!("Set api_key (or RECAP_API_KEY), then run `recap run`.");
            }
        }
    }

    Ok(())
}
