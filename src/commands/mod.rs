//! CLI commands for recap

pub mod dispatch;
pub mod init;
pub mod run;
pub mod status;
pub mod vocab;

use recap_core::config::RecapConfig;
use recap_core::error::Result;

use crate::cli::Cli;

/// Resolve and load the config named by `--config` (or the default locations)
pub fn load_config(cli: &Cli) -> Result<RecapConfig> {
    let path = RecapConfig::resolve_path(cli.config.as_deref());
    RecapConfig::load(&path)
}
