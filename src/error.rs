//! Error types for the task executor
//!
//! Hard failures (the request could not be made, or the caller asked for
//! something unsupported) surface as [`ExecutorError`]. A response that
//! arrived in an unexpected shape is recovered inside the executor and never
//! reaches the caller as an error.

use crate::llm::provider::{ExtractionError, LlmError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for task executor operations
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Credential error: environment variable {env_var} is not set")]
    Credential { env_var: String },

    #[error("Inference error: {0}")]
    Inference(#[from] LlmError),

    #[error("Failed to parse response: {0}")]
    ResponseParse(#[from] ExtractionError),

    #[error("Unsupported operation: {tool_name}")]
    UnsupportedOperation { tool_name: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

/// Stable error codes for machine consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ConfigError,
    CredentialError,
    InferenceError,
    ResponseParseError,
    UnsupportedOperation,
    InvalidInput,
}

/// Serializable error summary with sensitive content removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl ExecutorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExecutorError::Config(_) => ErrorCode::ConfigError,
            ExecutorError::Credential { .. } => ErrorCode::CredentialError,
            ExecutorError::Inference(_) => ErrorCode::InferenceError,
            ExecutorError::ResponseParse(_) => ErrorCode::ResponseParseError,
            ExecutorError::UnsupportedOperation { .. } => ErrorCode::UnsupportedOperation,
            ExecutorError::InvalidInput { .. } => ErrorCode::InvalidInput,
        }
    }

    /// Convert to a report suitable for printing or publishing
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: sanitize_error_message(&self.to_string()),
        }
    }

    /// Create credential error
    pub fn credential<S: Into<String>>(env_var: S) -> Self {
        Self::Credential {
            env_var: env_var.into(),
        }
    }

    /// Create unsupported operation error
    pub fn unsupported_operation<S: Into<String>>(tool_name: S) -> Self {
        Self::UnsupportedOperation {
            tool_name: tool_name.into(),
        }
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutorError::Inference(LlmError::Cancelled))
    }
}

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+").expect("secret pattern is valid")
});

static API_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{6,}").expect("api key pattern is valid"));

static PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("path pattern is valid")
});

/// Redact credentials and sensitive paths, cap length at 500 bytes
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = SECRET_PATTERN
        .replace_all(message, "${1}=***")
        .to_string();

    sanitized = API_KEY_PATTERN
        .replace_all(&sanitized, "sk-***")
        .to_string();

    sanitized = PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > 500 {
        let truncate_suffix = "...[truncated]";
        let mut cut = 500 - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
