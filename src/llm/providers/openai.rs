//! OpenAI-compatible provider implementation
//!
//! Serves both the hosted OpenAI API and local servers that expose the same
//! `/chat/completions` route (Ollama, vLLM, llama.cpp server).

use super::{build_client, join_url, post_chat, probe};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const LOCAL_BASE_URL: &str = "http://localhost:11434/v1";

/// OpenAI provider configuration
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Backend name reported in logs (`openai` or `local`)
    pub name: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            name: "openai".to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAiConfig {
    /// Defaults for an OpenAI-compatible server on localhost
    pub fn local() -> Self {
        Self {
            name: "local".to_string(),
            base_url: LOCAL_BASE_URL.to_string(),
            ..Default::default()
        }
    }
}

/// OpenAI provider implementation
pub struct OpenAiProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        if config.base_url.trim().is_empty() {
            return Err(LlmError::NotConfigured(
                "OpenAI base URL is required".to_string(),
            ));
        }

        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    /// Per-request `api_base` wins over the configured base URL
    fn completions_url(&self, request: &CompletionRequest) -> String {
        let base = request
            .api_base
            .as_deref()
            .unwrap_or(self.config.base_url.as_str());
        join_url(base, "chat/completions")
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = self.completions_url(&request);
        post_chat(&self.client, self.name(), &url, &request).await
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        probe(
            &self.client,
            self.name(),
            &join_url(&self.config.base_url, "models"),
        )
        .await
    }
}
