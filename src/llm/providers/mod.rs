//! LLM provider implementations
//!
//! Concrete implementations of the LlmProvider trait. Both adapters speak
//! JSON over HTTP and return the raw response body untouched.

pub mod node;
pub mod openai;

pub use node::*;
pub use openai::*;

use crate::config::{BackendKind, BackendSection};
use crate::llm::provider::{
    ChatRequestBody, CompletionRequest, CompletionResponse, LlmError, LlmProvider,
};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Build the adapter selected by `backend.kind`.
///
/// `node_url` overrides `backend.url` for node backends only; OpenAI and
/// local backends always use their own URL.
pub fn create_provider(
    backend: &BackendSection,
    node_url: Option<String>,
) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let timeout = Duration::from_secs(backend.timeout_secs);

    let provider: Arc<dyn LlmProvider> = match backend.kind {
        BackendKind::OpenAi | BackendKind::Local => {
            let defaults = if backend.kind == BackendKind::Local {
                OpenAiConfig::local()
            } else {
                OpenAiConfig::default()
            };
            let config = OpenAiConfig {
                base_url: backend.url.clone().unwrap_or(defaults.base_url),
                timeout,
                name: defaults.name,
            };
            Arc::new(OpenAiProvider::new(config)?)
        }
        BackendKind::Node => {
            let node_url = node_url
                .or_else(|| backend.url.clone())
                .unwrap_or_default();
            Arc::new(NodeProvider::new(NodeConfig { node_url, timeout })?)
        }
    };

    Ok(provider)
}

/// POST a chat body to `url` and return the decoded JSON response.
///
/// Single attempt; callers own any retry policy.
pub(crate) async fn post_chat(
    client: &Client,
    backend: &str,
    url: &str,
    request: &CompletionRequest,
) -> Result<CompletionResponse, LlmError> {
    debug!(
        backend,
        url,
        model = %request.model,
        messages = request.messages.len(),
        authenticated = request.api_key.is_some(),
        "Sending completion request"
    );

    let mut builder = client.post(url).json(&ChatRequestBody::from(request));
    if let Some(api_key) = &request.api_key {
        builder = builder.bearer_auth(api_key);
    }

    let response = builder.send().await.map_err(|e| {
        warn!(backend, "Completion request failed: {}", e);
        LlmError::from_transport(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        warn!(backend, %status, "Completion backend returned an error");
        return Err(LlmError::from_status(backend, status, &error_text));
    }

    let raw: Value = response
        .json()
        .await
        .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    Ok(CompletionResponse::new(raw))
}

/// GET `url` and succeed on any 2xx status
pub(crate) async fn probe(client: &Client, backend: &str, url: &str) -> Result<(), LlmError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(LlmError::from_transport)?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(LlmError::from_status(backend, status, &error_text))
    }
}

pub(crate) fn build_client(timeout: std::time::Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::NetworkError(e.to_string()))
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
