//! Error types and exit codes for recap
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (service, parse, filesystem, interrupted)
//! - 2: Usage error (bad flags/args, invalid values)
//! - 3: Configuration/data error (missing or unreadable config)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the recap binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Configuration or data error (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while distilling transcripts
#[derive(Error, Debug)]
pub enum RecapError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Configuration errors (exit code 3)
    #[error("config not found: {path:?}")]
    ConfigNotFound { path: PathBuf },

    #[error("invalid config in {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Pipeline failures (exit code 1)
    #[error("token counter unavailable: {0}")]
    Tokenizer(String),

    #[error("language model call failed: {0}")]
    ServiceCall(String),

    #[error("could not parse {what} from model response: {response:?}")]
    Parse { what: String, response: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),

    #[error("Run interrupted. Run `recap run` again to resume.")]
    Interrupted,
}

impl RecapError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        RecapError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        RecapError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        RecapError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed language model call
    pub fn service(reason: impl std::fmt::Display) -> Self {
        RecapError::ServiceCall(reason.to_string())
    }

    /// Create an error for a model response that did not have the expected shape
    pub fn parse(what: &str, response: impl Into<String>) -> Self {
        RecapError::Parse {
            what: what.to_string(),
            response: response.into(),
        }
    }

    /// Whether this failure only affects the document being processed.
    ///
    /// Per-item failures are logged by the batch driver and leave the
    /// document pending for the next run. Everything else ends the batch.
    pub fn is_per_item(&self) -> bool {
        matches!(
            self,
            RecapError::ServiceCall(_)
                | RecapError::Parse { .. }
                | RecapError::Io(_)
                | RecapError::FailedOperationWithTarget { .. }
                | RecapError::Json(_)
                | RecapError::Other(_)
        )
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RecapError::UsageError(_) | RecapError::InvalidValue { .. } => ExitCode::Usage,

            RecapError::ConfigNotFound { .. }
            | RecapError::Config { .. }
            | RecapError::NotFound { .. }
            | RecapError::Toml(_) => ExitCode::Data,

            RecapError::Tokenizer(_)
            | RecapError::ServiceCall(_)
            | RecapError::Parse { .. }
            | RecapError::Io(_)
            | RecapError::Json(_)
            | RecapError::FailedOperationWithTarget { .. }
            | RecapError::Other(_)
            | RecapError::Interrupted => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            RecapError::UsageError(_) => "usage_error",
            RecapError::InvalidValue { .. } => "invalid_value",
            RecapError::ConfigNotFound { .. } => "config_not_found",
            RecapError::Config { .. } => "invalid_config",
            RecapError::NotFound { .. } => "not_found",
            RecapError::Tokenizer(_) => "tokenizer_error",
            RecapError::ServiceCall(_) => "service_error",
            RecapError::Parse { .. } => "parse_error",
            RecapError::Io(_) => "io_error",
            RecapError::Json(_) => "json_error",
            RecapError::Toml(_) => "toml_error",
            RecapError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            RecapError::Other(_) => "other",
            RecapError::Interrupted => "interrupted",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for recap operations
pub type Result<T> = std::result::Result<T, RecapError>;
