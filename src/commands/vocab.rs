//! `recap vocab` command - print the keyword vocabulary

use recap_core::error::Result;
use recap_core::vault::keyword_vocabulary;

use crate::cli::{Cli, OutputFormat};
use crate::commands::load_config;

/// Execute the vocab command
pub fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let vocabulary = keyword_vocabulary(&config.vault_dir)?;

    match cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "vault": config.vault_dir.display().to_string(),
                "count": vocabulary.len(),
                "vocabulary": vocabulary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for title in &vocabulary {
                println!("{}", title);
            }
        }
    }

    Ok(())
}
