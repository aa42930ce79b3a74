//! BabyAGI Task Executor
//!
//! A minimal task executor agent: given a task and an objective, it renders
//! a prompt from a template, sends it to a completion backend and returns
//! the text of the first choice.
//!
//! # Overview
//!
//! - Deployment configuration with explicit validation
//! - Literal `{{task}}` / `{{objective}}` substitution
//! - A single injected [`LlmProvider`] capability with OpenAI-compatible and
//!   remote-node adapters
//! - A closed `tool_name` dispatch entry point
//!
//! # Quick Start
//!
//! ```rust
//! use babyagi_task_executor::agent::render_user_prompt;
//!
//! let prompt = render_user_prompt(
//!     "Task: {{task}}. Objective: {{objective}}.",
//!     "Summarize X",
//!     "Brevity",
//! );
//! assert_eq!(prompt, "Task: Summarize X. Objective: Brevity.");
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod observability;
pub mod testing;

pub use agent::{InputSchema, Operation, RunReport, TaskExecutor, TaskInput};
pub use config::*;
pub use error::{ErrorCode, ErrorReport, ExecutorError, ExecutorResult};
pub use llm::provider::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
