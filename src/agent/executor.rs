//! Task executor
//!
//! Turns a (task, objective) pair into model output: render the user
//! prompt, assemble the two-message request, call the injected provider and
//! read `choices[0].message.content` from whatever comes back.

use crate::agent::credentials::resolve_api_key;
use crate::agent::prompt::{build_messages, render_user_prompt};
use crate::config::TaskExecutorConfig;
use crate::error::{ExecutorError, ExecutorResult};
use crate::llm::provider::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use crate::task_span;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

/// Executes BabyAGI tasks against a completion backend.
///
/// The configuration is read-only after construction, so one executor can
/// serve concurrent calls through a shared reference.
pub struct TaskExecutor {
    config: TaskExecutorConfig,
    llm_provider: Arc<dyn LlmProvider>,
}

impl TaskExecutor {
    pub fn new(config: TaskExecutorConfig, llm_provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            config,
            llm_provider,
        }
    }

    /// Validate an untyped mapping and build an executor from it
    pub fn from_value(
        config: serde_json::Value,
        llm_provider: Arc<dyn LlmProvider>,
    ) -> ExecutorResult<Self> {
        let config = TaskExecutorConfig::from_value(config)?;
        Ok(Self::new(config, llm_provider))
    }

    pub fn config(&self) -> &TaskExecutorConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.llm_provider.name()
    }

    /// Build the completion request for one invocation
    pub fn build_request(&self, task: &str, objective: &str) -> ExecutorResult<CompletionRequest> {
        let user_prompt = render_user_prompt(&self.config.user_message_template, task, objective);
        let messages = build_messages(&self.config.system_prompt, user_prompt);
        let params = &self.config.llm;

        Ok(CompletionRequest {
            messages,
            model: params.model.clone(),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            api_base: params.api_base.clone(),
            api_key: resolve_api_key(params)?,
        })
    }

    /// Run one task.
    ///
    /// Returns `Ok(None)` when the backend answered but the answer had no
    /// readable content; the failure is logged instead of propagated.
    pub async fn execute_task(&self, task: &str, objective: &str) -> ExecutorResult<Option<String>> {
        self.execute_task_until(task, objective, std::future::pending::<()>())
            .await
    }

    /// Run one task, abandoning the backend call if `cancel` resolves first.
    ///
    /// The in-flight request is dropped on cancellation, which releases its
    /// connection, and the call returns `LlmError::Cancelled`.
    pub async fn execute_task_until<C>(
        &self,
        task: &str,
        objective: &str,
        cancel: C,
    ) -> ExecutorResult<Option<String>>
    where
        C: Future<Output = ()>,
    {
        let span = task_span!(
            run_id = %Uuid::new_v4(),
            provider = %self.llm_provider.name(),
            model = %self.config.llm.model
        );

        async move {
            info!(task = %task, objective = %objective, "Executing task");

            let request = self.build_request(task, objective)?;
            debug!(
                messages = request.messages.len(),
                model = %request.model,
                temperature = request.temperature,
                max_tokens = request.max_tokens,
                "Completion request assembled"
            );

            let response = tokio::select! {
                result = self.llm_provider.complete(request) => result?,
                _ = cancel => {
                    info!("Task execution cancelled");
                    return Err(LlmError::Cancelled.into());
                }
            };

            let output = extract_content(&response);
            if let Some(text) = &output {
                info!(response_length = text.len(), "Task executed");
            }
            Ok(output)
        }
        .instrument(span)
        .await
    }
}

/// Read the first choice's content, logging and discarding parse failures
fn extract_content(response: &CompletionResponse) -> Option<String> {
    match response.first_choice_content() {
        Ok(text) => Some(text.to_string()),
        Err(e) => {
            error!(
                error = %ExecutorError::from(e),
                response = %response.raw,
                "Failed to parse completion response"
            );
            None
        }
    }
}
