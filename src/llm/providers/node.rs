//! Remote node provider
//!
//! Sends the chat body to a node's run-inference endpoint
//! (`{node_url}/inference/chat`). The node picks the backing model server;
//! the response is an OpenAI-shaped completion.

use super::{build_client, join_url, post_chat, probe};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Node provider configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub node_url: String,
    pub timeout: Duration,
}

impl NodeConfig {
    pub fn new(node_url: impl Into<String>) -> Self {
        Self {
            node_url: node_url.into(),
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct NodeProvider {
    config: NodeConfig,
    client: Client,
}

impl NodeProvider {
    pub fn new(config: NodeConfig) -> Result<Self, LlmError> {
        if config.node_url.trim().is_empty() {
            return Err(LlmError::NotConfigured("Node URL is required".to_string()));
        }

        let client = build_client(config.timeout)?;
        Ok(Self { config, client })
    }

    pub fn node_url(&self) -> &str {
        &self.config.node_url
    }
}

#[async_trait]
impl LlmProvider for NodeProvider {
    fn name(&self) -> &str {
        "node"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = join_url(&self.config.node_url, "inference/chat");
        post_chat(&self.client, self.name(), &url, &request).await
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        probe(
            &self.client,
            self.name(),
            &join_url(&self.config.node_url, "health"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_requires_url() {
        assert!(matches!(
            NodeProvider::new(NodeConfig::new("")),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_node_provider_keeps_url() {
        let provider = NodeProvider::new(NodeConfig::new("http://localhost:7001")).unwrap();
        assert_eq!(provider.node_url(), "http://localhost:7001");
        assert_eq!(provider.name(), "node");
    }
}
