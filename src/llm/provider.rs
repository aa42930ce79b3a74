//! LLM provider abstraction and trait definitions
//!
//! The executor only needs one capability from a backend: turn a
//! [`CompletionRequest`] into a [`CompletionResponse`]. Everything
//! transport-specific lives behind [`LlmProvider`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Message roles in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// LLM completion request parameters
#[derive(Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Overrides the provider's configured base URL when set
    pub api_base: Option<String>,
    pub api_key: Option<String>,
}

// Hand-written so the credential never reaches a log line.
impl std::fmt::Debug for CompletionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionRequest")
            .field("messages", &self.messages)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Wire body shared by the HTTP adapters
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequestBody<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub temperature: f32,
    pub max_tokens: u32,
}

impl<'a> From<&'a CompletionRequest> for ChatRequestBody<'a> {
    fn from(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Raw completion response.
///
/// Backends differ in what else they return, so the body is kept as JSON
/// and only `choices[0].message.content` is ever read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionResponse {
    pub raw: Value,
}

/// Why `choices[0].message.content` could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("response has no `choices` array")]
    MissingChoices,
    #[error("`choices` is empty")]
    EmptyChoices,
    #[error("first choice has no `message` object")]
    MissingMessage,
    #[error("first choice message has no string `content`")]
    MissingContent,
}

impl CompletionResponse {
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    /// Extract the first choice's message content
    pub fn first_choice_content(&self) -> Result<&str, ExtractionError> {
        let object = self.raw.as_object().ok_or(ExtractionError::NotAnObject)?;
        let choices = object
            .get("choices")
            .and_then(Value::as_array)
            .ok_or(ExtractionError::MissingChoices)?;
        let first = choices.first().ok_or(ExtractionError::EmptyChoices)?;
        let message = first
            .get("message")
            .filter(|m| m.is_object())
            .ok_or(ExtractionError::MissingMessage)?;
        message
            .get("content")
            .and_then(Value::as_str)
            .ok_or(ExtractionError::MissingContent)
    }
}

/// LLM provider trait for dependency injection and testing
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "node")
    fn name(&self) -> &str;

    /// Generate a completion from the given request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<(), LlmError>;
}

/// LLM provider errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LlmError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Request cancelled")]
    Cancelled,
}

impl LlmError {
    /// Map a reqwest transport failure
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout(e.to_string())
        } else if e.is_connect() || e.is_request() {
            LlmError::NetworkError(e.to_string())
        } else {
            LlmError::RequestFailed(e.to_string())
        }
    }

    /// Map a non-success HTTP status
    pub(crate) fn from_status(backend: &str, status: reqwest::StatusCode, body: &str) -> Self {
        let message = format!("{backend} returned {status}: {body}");
        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed(message),
            429 => LlmError::RateLimitExceeded(message),
            _ => LlmError::ApiError(message),
        }
    }
}
