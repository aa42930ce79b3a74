//! Deployment configuration for the task executor agent
//!
//! A deployment file bundles three things: the agent identity, the backend
//! used to reach the completion service, and the executor configuration
//! (system prompt, user message template and model parameters).
//!
//! Files are TOML by default; a `.json` extension selects JSON. Untyped
//! mappings handed over by a host process go through
//! [`TaskExecutorConfig::from_value`], which runs the same validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Full deployment bundle loaded from disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deployment {
    pub agent: AgentSection,
    #[serde(default)]
    pub backend: BackendSection,
    pub config: TaskExecutorConfig,
}

/// Agent identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSection {
    /// Agent name (must match [a-zA-Z0-9._-]+)
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Which adapter reaches the completion service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted OpenAI-compatible API
    #[default]
    OpenAi,
    /// OpenAI-compatible server on the local machine (Ollama, vLLM, ...)
    Local,
    /// Remote node exposing a run-inference endpoint
    Node,
}

/// Backend section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSection {
    #[serde(default)]
    pub kind: BackendKind,
    /// Base URL or node URL; adapter default when absent
    pub url: Option<String>,
    /// Request timeout in seconds (default: 60)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

/// Executor configuration: prompts plus model parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskExecutorConfig {
    /// System prompt; a plain string or any structured value
    pub system_prompt: serde_json::Value,
    /// User message template with `{{task}}` and `{{objective}}` placeholders
    pub user_message_template: String,
    pub llm: ModelParams,
}

/// Model parameters sent with every completion request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelParams {
    /// Model identifier
    pub model: String,
    /// Sampling temperature (0.0 to 2.0, default 0.7)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum completion tokens (default 1000)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Per-request API base override
    pub api_base: Option<String>,
    #[serde(default)]
    pub api_key_policy: ApiKeyPolicy,
    /// Environment variable holding the key when policy is `environment`
    pub api_key_env: Option<String>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

/// How the API credential is obtained
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyPolicy {
    /// No credential attached
    #[default]
    None,
    /// A fixed non-secret token for backends that only check presence
    Placeholder,
    /// Read from the variable named by `api_key_env`
    Environment,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Invalid agent name: {0}")]
    InvalidAgentName(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Deployment {
    /// Load a deployment file; `.json` files are parsed as JSON, anything else as TOML
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let deployment: Deployment = toml::from_str(content)?;
        deployment.validate()?;
        Ok(deployment)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let deployment: Deployment = serde_json::from_str(content)?;
        deployment.validate()?;
        Ok(deployment)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_agent_name(&self.agent.name)?;

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "backend.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if let Some(url) = &self.backend.url {
            validate_url("backend.url", url)?;
        }

        self.config.validate()
    }
}

impl TaskExecutorConfig {
    /// Validate an untyped mapping into a typed configuration.
    ///
    /// Required fields are checked up front so a missing one is reported by
    /// name rather than as a generic deserialization failure.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let map = value.as_object().ok_or_else(|| {
            ConfigError::InvalidConfig("configuration must be a mapping".to_string())
        })?;

        for field in ["system_prompt", "user_message_template", "llm"] {
            if !map.contains_key(field) {
                return Err(ConfigError::MissingField(field.to_string()));
            }
        }
        let has_model = map
            .get("llm")
            .and_then(|llm| llm.as_object())
            .is_some_and(|llm| llm.contains_key("model"));
        if !has_model {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }

        let config: TaskExecutorConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.system_prompt.is_null() {
            return Err(ConfigError::MissingField("system_prompt".to_string()));
        }
        self.llm.validate()
    }
}

impl ModelParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingField("llm.model".to_string()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidConfig(format!(
                "llm.temperature {} must be between 0.0 and 2.0",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidConfig(
                "llm.max_tokens must be greater than zero".to_string(),
            ));
        }
        if let Some(api_base) = &self.api_base {
            validate_url("llm.api_base", api_base)?;
        }
        if self.api_key_policy == ApiKeyPolicy::Environment
            && self.api_key_env.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::MissingField("llm.api_key_env".to_string()));
        }
        Ok(())
    }
}

/// Validate agent name format
fn validate_agent_name(name: &str) -> Result<(), ConfigError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if name.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidAgentName(format!(
            "Agent name '{name}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidConfig(format!("{field} '{value}' is not a URL: {e}")))
}
