//! Invocation entry point
//!
//! Callers send `{tool_name, tool_input_data}`. The tool name is parsed into
//! a closed [`Operation`] before anything else happens, so an unknown name
//! never reaches the network.

use crate::agent::executor::TaskExecutor;
use crate::error::{ExecutorError, ExecutorResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Arguments of `execute_task`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub task: String,
    pub objective: String,
}

/// Raw invocation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    pub tool_name: String,
    pub tool_input_data: Value,
}

/// Supported operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ExecuteTask,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::ExecuteTask => "execute_task",
        }
    }
}

impl FromStr for Operation {
    type Err = ExecutorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "execute_task" => Ok(Operation::ExecuteTask),
            other => Err(ExecutorError::unsupported_operation(other)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub tool_name: String,
    /// `None` when the backend answered without readable content
    pub output: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl InputSchema {
    /// Parse an untyped payload
    pub fn from_value(value: Value) -> ExecutorResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ExecutorError::invalid_input(format!("malformed invocation: {e}")))
    }

    pub fn execute_task(task: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            tool_name: Operation::ExecuteTask.as_str().to_string(),
            tool_input_data: serde_json::json!({
                "task": task.into(),
                "objective": objective.into(),
            }),
        }
    }

    pub fn operation(&self) -> ExecutorResult<Operation> {
        self.tool_name.parse()
    }

    pub fn task_input(&self) -> ExecutorResult<TaskInput> {
        serde_json::from_value(self.tool_input_data.clone())
            .map_err(|e| ExecutorError::invalid_input(format!("tool_input_data: {e}")))
    }
}

/// Dispatch an untyped payload to the executor
pub async fn run(executor: &TaskExecutor, input: Value) -> ExecutorResult<RunReport> {
    run_until(executor, input, std::future::pending::<()>()).await
}

/// Dispatch with cancellation
pub async fn run_until<C>(executor: &TaskExecutor, input: Value, cancel: C) -> ExecutorResult<RunReport>
where
    C: Future<Output = ()>,
{
    let input = InputSchema::from_value(input)?;
    run_input_until(executor, &input, cancel).await
}

/// Dispatch an already-parsed payload
pub async fn run_input_until<C>(
    executor: &TaskExecutor,
    input: &InputSchema,
    cancel: C,
) -> ExecutorResult<RunReport>
where
    C: Future<Output = ()>,
{
    let operation = input.operation()?;
    let run_id = Uuid::new_v4();

    let output = match operation {
        Operation::ExecuteTask => {
            let args = input.task_input()?;
            info!(
                run_id = %run_id,
                tool_name = %operation,
                task = %args.task,
                objective = %args.objective,
                "Running with inputs"
            );
            executor
                .execute_task_until(&args.task, &args.objective, cancel)
                .await?
        }
    };

    info!(run_id = %run_id, has_output = output.is_some(), "Final response ready");

    Ok(RunReport {
        run_id,
        tool_name: operation.to_string(),
        output,
        completed_at: Utc::now(),
    })
}
