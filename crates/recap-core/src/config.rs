//! Configuration for recap
//!
//! Configuration is read once at process start from `recap.toml` (or a legacy
//! `config.json`) and handed down as an explicit [`RecapConfig`] value.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::bail_invalid;
use crate::error::{RecapError, Result};
use crate::keywords::KeywordCanonicalizer;

#[allow(unused_imports)]
pub use types::{
    ApiKey, LlmConfig, RecapConfig, SummaryConfig, DEFAULT_CONFIG_FILE, DEFAULT_INPUT_DIR,
    DEFAULT_LEDGER_FILE, DEFAULT_OUTPUT_DIR, LEGACY_LEDGER_FILE,
};

/// Environment variables consulted, in order, when the file carries no API key
pub const API_KEY_ENV_VARS: [&str; 2] = ["RECAP_API_KEY", "OPENAI_API_KEY"];

const CONFIG_DIR: &str = "recap";

impl RecapConfig {
    /// Locate the config file.
    ///
    /// An explicit path always wins. Otherwise `recap.toml` in the working
    /// directory, then `~/.config/recap/recap.toml`.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR).join(DEFAULT_CONFIG_FILE))
            .filter(|path| path.exists())
            .unwrap_or(local)
    }

    /// Load configuration from a file, reading the API key fallback from the
    /// process environment
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, |name| std::env::var(name).ok())
    }

    /// Load configuration with an explicit environment lookup
    pub fn load_with_env(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if !path.exists() {
            return Err(RecapError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self::parse(&content, path)?;

        config.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        if config.api_key.as_ref().is_none_or(ApiKey::is_blank) {
            config.api_key = API_KEY_ENV_VARS
                .iter()
                .filter_map(|name| env(name))
                .map(ApiKey::new)
                .find(|key| !key.is_blank());
        }

        config.llm.timeout_seconds = config.llm.timeout_seconds.clamp(5, 600);
        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            vault = %config.vault_dir.display(),
            exclusions = config.exclusions.len(),
            "config_loaded"
        );

        Ok(config)
    }

    /// Parse config text; `.json` files use the legacy JSON layout
    fn parse(content: &str, path: &Path) -> Result<Self> {
        let is_json = path.extension().is_some_and(|ext| ext == "json");

        let parsed = if is_json {
            serde_json::from_str::<serde_json::Value>(content)
                .and_then(|mut value| {
                    // Legacy installs kept their ledger in log_file.txt beside config.json
                    if let Some(table) = value.as_object_mut() {
                        table
                            .entry("ledger_path")
                            .or_insert_with(|| LEGACY_LEDGER_FILE.into());
                    }
                    serde_json::from_value(value)
                })
                .map_err(|e| e.to_string())
        } else {
            toml::from_str(content).map_err(|e| e.to_string())
        };

        parsed.map_err(|reason| RecapError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.vault_dir.as_os_str().is_empty() {
            bail_invalid!("vault_dir", "(empty)");
        }
        if self.summary.fragment_budget == 0 {
            bail_invalid!("summary.fragment_budget", 0);
        }
        if self.summary.reduce_threshold == 0 {
            bail_invalid!("summary.reduce_threshold", 0);
        }
        if self.summary.keyword_count == 0 {
            bail_invalid!("summary.keyword_count", 0);
        }
        if self.llm.max_tokens == 0 {
            bail_invalid!("llm.max_tokens", 0);
        }
        if self.llm.model.trim().is_empty() {
            bail_invalid!("llm.model", "(empty)");
        }
        Ok(())
    }

    /// API key, required by commands that call the language model
    pub fn require_api_key(&self) -> Result<&ApiKey> {
        self.api_key.as_ref().ok_or_else(|| RecapError::Config {
            path: self.base_dir.clone(),
            reason: format!(
                "no api_key configured (set it in the config file or via {})",
                API_KEY_ENV_VARS.join(" / ")
            ),
        })
    }

    /// Directory of transcripts to summarize
    pub fn input_path(&self) -> PathBuf {
        self.vault_dir.join(&self.input_dir)
    }

    /// Directory summary notes are written to
    pub fn output_path(&self) -> PathBuf {
        self.vault_dir.join(&self.output_dir)
    }

    /// Ledger file location, independent of the vault
    pub fn ledger_file(&self) -> PathBuf {
        self.base_dir.join(&self.ledger_path)
    }

    /// Whether a filename is excluded regardless of ledger state
    pub fn is_excluded(&self, filename: &str) -> bool {
        self.exclusions.iter().any(|excluded| excluded == filename)
    }

    /// Keyword canonicalization table for this run
    pub fn canonicalizer(&self) -> KeywordCanonicalizer {
        match &self.keyword_replacements {
            Some(table) => KeywordCanonicalizer::new(table.clone()),
            None => KeywordCanonicalizer::default(),
        }
    }

    /// Starter config written by `recap init`
    pub fn starter_toml(vault_dir: &Path) -> String {
        format!(
            r#"# recap configuration

# Root of the markdown vault
vault_dir = {vault:?}

# API key for the language model service.
# Leave unset to read RECAP_API_KEY or OPENAI_API_KEY from the environment.
# api_key = ""

# Transcript filenames that are never summarized
exclusions = []

# Relative to vault_dir
input_dir = {input:?}
output_dir = {output:?}

# Relative to this file
ledger_path = {ledger:?}

[llm]
model = "{model}"
max_tokens = {max_tokens}

[summary]
fragment_budget = {budget}
reduce_threshold = {threshold}
keyword_count = {keywords}
"#,
            vault = vault_dir.display().to_string(),
            input = DEFAULT_INPUT_DIR,
            output = DEFAULT_OUTPUT_DIR,
            ledger = DEFAULT_LEDGER_FILE,
            model = types::DEFAULT_MODEL,
            max_tokens = types::DEFAULT_MAX_TOKENS,
            budget = types::DEFAULT_FRAGMENT_BUDGET,
            threshold = types::DEFAULT_REDUCE_THRESHOLD,
            keywords = types::DEFAULT_KEYWORD_COUNT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(&path, "vault_dir = \"/vault\"\n").unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        assert_eq!(config.vault_dir, PathBuf::from("/vault"));
        assert!(config.api_key.is_none());
        assert!(config.exclusions.is_empty());
        assert_eq!(config.summary, SummaryConfig::default());
        assert_eq!(config.llm, LlmConfig::default());
        assert_eq!(
            config.input_path(),
            PathBuf::from("/vault/ChatGPT conversations/ChatGPT")
        );
        assert_eq!(config.output_path(), PathBuf::from("/vault/ChatGPT summaries"));
        assert_eq!(config.ledger_file(), dir.path().join("processed.log"));
    }

    #[test]
    fn test_legacy_json_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "obsidian-dir": "/vault/",
                "api-key": "sk-test",
                "conversation-exclusions": ["Skip me.md"]
            }"#,
        )
        .unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        assert_eq!(config.vault_dir, PathBuf::from("/vault/"));
        assert_eq!(config.api_key.as_ref().unwrap().expose(), "sk-test");
        assert!(config.is_excluded("Skip me.md"));
        assert!(!config.is_excluded("Skip me"));
        assert_eq!(config.ledger_file(), dir.path().join("log_file.txt"));
    }

    #[test]
    fn test_legacy_json_ledger_gates_processing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"obsidian-dir": "/vault/"}"#).unwrap();
        fs::write(dir.path().join("log_file.txt"), "already.md\n").unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        let ledger = crate::ledger::ProcessingLedger::open(&config.ledger_file()).unwrap();
        assert!(ledger.is_done("already.md"));
    }

    #[test]
    fn test_legacy_json_explicit_ledger_path_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"obsidian-dir": "/vault/", "ledger_path": "state/done.log"}"#,
        )
        .unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        assert_eq!(config.ledger_file(), dir.path().join("state/done.log"));
    }

    #[test]
    fn test_toml_ledger_default_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(&path, "vault_dir = \"/vault\"\n").unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        assert_eq!(config.ledger_file(), dir.path().join(DEFAULT_LEDGER_FILE));
    }

    #[test]
    fn test_api_key_env_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(&path, "vault_dir = \"/vault\"\napi_key = \"  \"\n").unwrap();

        let config = RecapConfig::load_with_env(&path, |name| {
            (name == "OPENAI_API_KEY").then(|| "sk-env".to_string())
        })
        .unwrap();
        assert_eq!(config.require_api_key().unwrap().expose(), "sk-env");
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(&path, "vault_dir = \"/vault\"\n").unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, RecapError::Config { .. }));
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let key = ApiKey::new("sk-secret");
        assert!(!format!("{key:?}").contains("sk-secret"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = RecapConfig::load_with_env(&dir.path().join("nope.toml"), no_env).unwrap_err();
        assert!(matches!(err, RecapError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(
            &path,
            "vault_dir = \"/vault\"\n[summary]\nfragment_budget = 0\n",
        )
        .unwrap();

        let err = RecapConfig::load_with_env(&path, no_env).unwrap_err();
        assert!(matches!(err, RecapError::InvalidValue { .. }));
    }

    #[test]
    fn test_timeout_is_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(&path, "vault_dir = \"/vault\"\n[llm]\ntimeout_seconds = 1\n").unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        assert_eq!(config.llm.timeout_seconds, 5);
    }

    #[test]
    fn test_custom_keyword_replacements() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(
            &path,
            "vault_dir = \"/vault\"\n[keyword_replacements]\n\"Machine Learning\" = \"ML\"\n",
        )
        .unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        let canon = config.canonicalizer();
        assert_eq!(canon.canonical("Machine Learning"), "ML");
        // The built-in table is replaced, not merged
        assert_eq!(
            canon.canonical("Artificial Intelligence"),
            "Artificial Intelligence"
        );
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(&path, "vault_dir = [").unwrap();

        let err = RecapConfig::load_with_env(&path, no_env).unwrap_err();
        match err {
            RecapError::Config { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_starter_toml_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("recap.toml");
        fs::write(&path, RecapConfig::starter_toml(Path::new("/my vault"))).unwrap();

        let config = RecapConfig::load_with_env(&path, no_env).unwrap();
        assert_eq!(config.vault_dir, PathBuf::from("/my vault"));
        assert_eq!(config.summary, SummaryConfig::default());
    }
}
