//! Prompt construction
//!
//! Placeholder substitution is literal string replacement of `{{task}}` and
//! `{{objective}}`. There is no escaping and no other syntax.

use crate::llm::provider::Message;
use serde_json::Value;

pub const TASK_PLACEHOLDER: &str = "{{task}}";
pub const OBJECTIVE_PLACEHOLDER: &str = "{{objective}}";

/// Template used by the stock BabyAGI deployment
pub const DEFAULT_USER_MESSAGE_TEMPLATE: &str = "You are given the following task: {{task}}. \
The task is to accomplish the following objective: {{objective}}.";

/// Substitute every placeholder occurrence in a single left-to-right pass.
///
/// Inserted values are never rescanned, so an input that itself contains
/// `{{task}}` or `{{objective}}` lands in the output verbatim.
pub fn render_user_prompt(template: &str, task: &str, objective: &str) -> String {
    let mut rendered = String::with_capacity(template.len() + task.len() + objective.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let (before, candidate) = rest.split_at(start);
        rendered.push_str(before);

        if let Some(after) = candidate.strip_prefix(TASK_PLACEHOLDER) {
            rendered.push_str(task);
            rest = after;
        } else if let Some(after) = candidate.strip_prefix(OBJECTIVE_PLACEHOLDER) {
            rendered.push_str(objective);
            rest = after;
        } else {
            rendered.push('{');
            rest = &candidate[1..];
        }
    }

    rendered.push_str(rest);
    rendered
}

/// Strings pass through verbatim; any other value is encoded as JSON text
pub fn system_prompt_text(system_prompt: &Value) -> String {
    match system_prompt {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Assemble the fixed two-message conversation: system first, then user
pub fn build_messages(system_prompt: &Value, user_prompt: String) -> Vec<Message> {
    vec![
        Message::system(system_prompt_text(system_prompt)),
        Message::user(user_prompt),
    ]
}
