//! Integration tests for the remote node provider


use babyagi_task_executor::agent::{dispatch, TaskExecutor};
use babyagi_task_executor::error::ExecutorError;
use babyagi_task_executor::llm::provider::{LlmError, LlmProvider};
use babyagi_task_executor::llm::providers::node::{NodeConfig, NodeProvider};
use babyagi_task_executor::testing::completion_body;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_node_posts_to_inference_chat() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/inference/chat"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.7,
            "max_tokens": 1000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("node says hi")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = Arc::new(NodeProvider::new(NodeConfig::new(mock_server.uri())).unwrap());
    let executor = TaskExecutor::new(test_helpers::test_config("{{task}}"), provider);

    let report = dispatch::run(
        &executor,
        json!({
            "tool_name": "execute_task",
            "tool_input_data": {"task": "t", "objective": "o"}
        }),
    )
    .await
    .unwrap();

    assert_eq!(report.output.as_deref(), Some("node says hi"));
}

#[tokio::test]
async fn test_node_error_status_surfaces_as_inference_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/inference/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model server crashed"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = Arc::new(NodeProvider::new(NodeConfig::new(mock_server.uri())).unwrap());
    let executor = TaskExecutor::new(test_helpers::test_config("{{task}}"), provider);

    let result = executor.execute_task("t", "o").await;

    match result {
        Err(ExecutorError::Inference(LlmError::ApiError(msg))) => {
            assert!(msg.contains("model server crashed"));
        }
        other => panic!("Expected inference error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_node_health_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let provider = NodeProvider::new(NodeConfig::new(mock_server.uri())).unwrap();
    assert!(matches!(
        provider.health_check().await,
        Err(LlmError::ApiError(_))
    ));
}
