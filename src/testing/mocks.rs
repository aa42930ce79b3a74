//! Mock implementations for testing
//!
//! Provides a mock LlmProvider that records every request it receives and
//! answers from a script, so executor behaviour can be checked without a
//! live backend.

use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Mock LLM provider for testing
#[derive(Debug)]
pub struct MockLlmProvider {
    pub responses: Vec<Value>,
    pub current_response: Arc<Mutex<usize>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
    pub failure: Option<LlmError>,
    pub delay: Option<Duration>,
}

impl MockLlmProvider {
    /// Answer with OpenAI-shaped completions carrying `contents` in turn
    pub fn new(contents: Vec<String>) -> Self {
        Self::with_raw_responses(contents.iter().map(|c| completion_body(c)).collect())
    }

    pub fn single_response(content: impl Into<String>) -> Self {
        Self::new(vec![content.into()])
    }

    /// Answer with an arbitrary JSON body
    pub fn with_raw_response(raw: Value) -> Self {
        Self::with_raw_responses(vec![raw])
    }

    pub fn with_raw_responses(responses: Vec<Value>) -> Self {
        Self {
            responses,
            current_response: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            delay: None,
        }
    }

    pub fn with_failure() -> Self {
        Self::with_error(LlmError::RequestFailed("Mock LLM failure".to_string()))
    }

    pub fn with_error(error: LlmError) -> Self {
        Self {
            failure: Some(error),
            ..Self::with_raw_responses(vec![])
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn get_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

/// Minimal chat-completion body with one choice
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "mock-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().await.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let mut current = self.current_response.lock().await;
        let response_idx = *current % self.responses.len().max(1);
        *current += 1;

        let raw = self
            .responses
            .get(response_idx)
            .cloned()
            .unwrap_or_else(|| completion_body("Mock response"));

        Ok(CompletionResponse::new(raw))
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
