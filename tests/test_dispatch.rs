//! Tests for the tool_name dispatch entry point


use babyagi_task_executor::agent::{dispatch, InputSchema, TaskExecutor};
use babyagi_task_executor::error::{ErrorCode, ExecutorError};
use babyagi_task_executor::testing::MockLlmProvider;
use serde_json::json;
use std::sync::Arc;
use test_helpers::test_config;

fn executor_with(provider: Arc<MockLlmProvider>) -> TaskExecutor {
    TaskExecutor::new(
        test_config("Task: {{task}}. Objective: {{objective}}."),
        provider,
    )
}

#[tokio::test]
async fn test_execute_task_dispatch_returns_report() {
    let provider = Arc::new(MockLlmProvider::single_response("Weather summary"));
    let executor = executor_with(provider.clone());

    let report = dispatch::run(
        &executor,
        json!({
            "tool_name": "execute_task",
            "tool_input_data": {
                "objective": "Write a blog post about the weather in London.",
                "task": "Weather pattern between year 1900 and 2000?"
            }
        }),
    )
    .await
    .unwrap();

    assert_eq!(report.tool_name, "execute_task");
    assert_eq!(report.output.as_deref(), Some("Weather summary"));

    let requests = provider.get_requests().await;
    assert_eq!(
        requests[0].messages[1].content,
        "Task: Weather pattern between year 1900 and 2000?. \
Objective: Write a blog post about the weather in London.."
    );
}

#[tokio::test]
async fn test_unknown_tool_name_rejected_without_network_call() {
    let provider = Arc::new(MockLlmProvider::single_response("unreachable"));
    let executor = executor_with(provider.clone());

    let result = dispatch::run(
        &executor,
        json!({
            "tool_name": "unknown_tool",
            "tool_input_data": {"task": "t", "objective": "o"}
        }),
    )
    .await;

    let error = result.unwrap_err();
    assert!(matches!(error, ExecutorError::UnsupportedOperation { .. }));
    assert_eq!(error.code(), ErrorCode::UnsupportedOperation);
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn test_unknown_tool_name_wins_over_bad_input() {
    let provider = Arc::new(MockLlmProvider::single_response("unreachable"));
    let executor = executor_with(provider.clone());

    let result = dispatch::run(
        &executor,
        json!({"tool_name": "delete_everything", "tool_input_data": 42}),
    )
    .await;

    assert!(matches!(result, Err(ExecutorError::UnsupportedOperation { .. })));
}

#[tokio::test]
async fn test_malformed_input_is_invalid_input_without_network_call() {
    let provider = Arc::new(MockLlmProvider::single_response("unreachable"));
    let executor = executor_with(provider.clone());

    let payloads = vec![
        json!({"tool_name": "execute_task", "tool_input_data": {"task": "only task"}}),
        json!({"tool_name": "execute_task", "tool_input_data": "not a mapping"}),
        json!({"tool_input_data": {"task": "t", "objective": "o"}}),
        json!([]),
    ];

    for payload in payloads {
        let result = dispatch::run(&executor, payload.clone()).await;
        assert!(
            matches!(result, Err(ExecutorError::InvalidInput { .. })),
            "expected InvalidInput for {payload}"
        );
    }
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn test_empty_result_is_reported_not_raised() {
    let provider = Arc::new(MockLlmProvider::with_raw_response(json!({"choices": []})));
    let executor = executor_with(provider);

    let report = dispatch::run_input_until(
        &executor,
        &InputSchema::execute_task("t", "o"),
        std::future::pending::<()>(),
    )
    .await
    .unwrap();

    assert!(report.output.is_none());
    let encoded = serde_json::to_value(&report).unwrap();
    assert!(encoded["output"].is_null());
    assert!(encoded["run_id"].is_string());
}
