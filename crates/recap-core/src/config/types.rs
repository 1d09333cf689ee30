//! Configuration type definitions

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "recap.toml";

/// Transcript directory, relative to the vault root
pub const DEFAULT_INPUT_DIR: &str = "ChatGPT conversations/ChatGPT";

/// Summary note directory, relative to the vault root
pub const DEFAULT_OUTPUT_DIR: &str = "ChatGPT summaries";

/// Ledger file, relative to the directory holding the config file
pub const DEFAULT_LEDGER_FILE: &str = "processed.log";

/// Ledger location assumed for legacy `config.json` installs
pub const LEGACY_LEDGER_FILE: &str = "log_file.txt";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 120;

pub const DEFAULT_FRAGMENT_BUDGET: usize = 1500;
pub const DEFAULT_REDUCE_THRESHOLD: usize = 2800;
pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// API credential; never printed by `Debug`
#[derive(Clone, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Process-wide configuration, loaded once at startup
#[derive(Debug, Clone, Deserialize)]
pub struct RecapConfig {
    /// Root of the markdown vault
    #[serde(alias = "obsidian-dir")]
    pub vault_dir: PathBuf,

    /// Language model credential (falls back to the environment)
    #[serde(default, alias = "api-key")]
    pub api_key: Option<ApiKey>,

    /// Input filenames that are never processed
    #[serde(default, alias = "conversation-exclusions")]
    pub exclusions: Vec<String>,

    /// Transcript directory (vault-relative unless absolute)
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Summary note directory (vault-relative unless absolute)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Ledger file (relative to the config file unless absolute)
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Language model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Chunking and reduction settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Keyword canonicalization table; replaces the built-in table when set
    #[serde(default)]
    pub keyword_replacements: Option<BTreeMap<String, String>>,

    /// Directory of the file this config was loaded from
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Language model service settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Cap on tokens generated per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Chunking, reduction and keyword settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SummaryConfig {
    /// Maximum token cost of one fragment
    #[serde(default = "default_fragment_budget")]
    pub fragment_budget: usize,

    /// Bullet aggregates costing less than this are rewritten as an essay
    #[serde(default = "default_reduce_threshold")]
    pub reduce_threshold: usize,

    /// Number of keywords requested per summary
    #[serde(default = "default_keyword_count")]
    pub keyword_count: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            fragment_budget: default_fragment_budget(),
            reduce_threshold: default_reduce_threshold(),
            keyword_count: default_keyword_count(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from(DEFAULT_LEDGER_FILE)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_fragment_budget() -> usize {
    DEFAULT_FRAGMENT_BUDGET
}

fn default_reduce_threshold() -> usize {
    DEFAULT_REDUCE_THRESHOLD
}

fn default_keyword_count() -> usize {
    DEFAULT_KEYWORD_COUNT
}
