//! Deployment loading and validation tests
//!
//! Tests focus on observable outcomes of loading TOML and JSON deployment
//! files and of validating untyped configuration mappings.

use babyagi_task_executor::config::{
    ApiKeyPolicy, BackendKind, ConfigError, Deployment, TaskExecutorConfig,
};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    write!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_deployment_loads_from_toml() {
    let temp_file = write_temp(
        ".toml",
        r#"
[agent]
name = "babyagi_task_executor"
description = "BabyAGI task executor"

[backend]
kind = "local"

[config]
system_prompt = "You are a task executor."
user_message_template = "You are given the following task: {{task}}."

[config.llm]
model = "llama3.1:8b"
temperature = 0.5
max_tokens = 800
api_base = "http://localhost:11434/v1"
"#,
    );

    let deployment = Deployment::load_from_file(temp_file.path()).unwrap();

    assert_eq!(deployment.agent.name, "babyagi_task_executor");
    assert_eq!(deployment.backend.kind, BackendKind::Local);
    assert_eq!(deployment.backend.timeout_secs, 60);
    assert_eq!(deployment.config.llm.model, "llama3.1:8b");
    assert_eq!(deployment.config.llm.max_tokens, 800);
    assert_eq!(
        deployment.config.llm.api_base.as_deref(),
        Some("http://localhost:11434/v1")
    );
}

#[test]
fn test_deployment_loads_from_json() {
    let temp_file = write_temp(
        ".json",
        r#"{
  "agent": {"name": "babyagi_task_executor"},
  "backend": {"kind": "node", "url": "http://localhost:7001"},
  "config": {
    "system_prompt": {"role": "You execute tasks.", "constraints": ["be concise"]},
    "user_message_template": "{{task}} -> {{objective}}",
    "llm": {
      "model": "gpt-4o-mini",
      "api_key_policy": "environment",
      "api_key_env": "OPENAI_API_KEY"
    }
  }
}"#,
    );

    let deployment = Deployment::load_from_file(temp_file.path()).unwrap();

    assert_eq!(deployment.backend.kind, BackendKind::Node);
    assert_eq!(deployment.backend.url.as_deref(), Some("http://localhost:7001"));
    assert_eq!(deployment.config.llm.api_key_policy, ApiKeyPolicy::Environment);
    assert!(deployment.config.system_prompt.is_object());
}

#[test]
fn test_missing_file_is_read_error() {
    let result = Deployment::load_from_file(std::path::Path::new("/nonexistent/deployment.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let temp_file = write_temp(".toml", "this is [not valid toml");
    let result = Deployment::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_missing_model_is_rejected() {
    let temp_file = write_temp(
        ".toml",
        r#"
[agent]
name = "no-model"

[config]
system_prompt = "x"
user_message_template = "{{task}}"

[config.llm]
temperature = 0.1
"#,
    );
    assert!(Deployment::load_from_file(temp_file.path()).is_err());
}

#[test]
fn test_environment_policy_without_variable_name_is_rejected() {
    let temp_file = write_temp(
        ".toml",
        r#"
[agent]
name = "env-policy"

[config]
system_prompt = "x"
user_message_template = "{{task}}"

[config.llm]
model = "gpt-4"
api_key_policy = "environment"
"#,
    );
    let result = Deployment::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::MissingField(ref f)) if f == "llm.api_key_env"));
}

#[test]
fn test_invalid_agent_name_is_rejected() {
    let temp_file = write_temp(
        ".toml",
        r#"
[agent]
name = "bad name!"

[config]
system_prompt = "x"
user_message_template = "{{task}}"

[config.llm]
model = "gpt-4"
"#,
    );
    let result = Deployment::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidAgentName(_))));
}

#[test]
fn test_invalid_backend_url_is_rejected() {
    let temp_file = write_temp(
        ".toml",
        r#"
[agent]
name = "bad-url"

[backend]
kind = "node"
url = "localhost without scheme"

[config]
system_prompt = "x"
user_message_template = "{{task}}"

[config.llm]
model = "gpt-4"
"#,
    );
    let result = Deployment::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_untyped_mapping_validated_once_into_typed_config() {
    let config = TaskExecutorConfig::from_value(json!({
        "system_prompt": "You are helpful.",
        "user_message_template": "{{task}}",
        "llm": {"model": "gpt-4", "temperature": 1.5, "max_tokens": 64}
    }))
    .unwrap();

    assert_eq!(config.llm.temperature, 1.5);
    assert_eq!(config.llm.max_tokens, 64);
    assert_eq!(config.llm.api_key_policy, ApiKeyPolicy::None);
}

#[test]
fn test_untyped_mapping_missing_system_prompt() {
    let result = TaskExecutorConfig::from_value(json!({
        "user_message_template": "{{task}}",
        "llm": {"model": "gpt-4"}
    }));
    assert!(matches!(result, Err(ConfigError::MissingField(ref f)) if f == "system_prompt"));
}

#[test]
fn test_deployment_round_trips_through_json() {
    let deployment = Deployment::from_toml_str(
        r#"
[agent]
name = "round-trip"

[config]
system_prompt = "x"
user_message_template = "{{task}}"

[config.llm]
model = "gpt-4"
"#,
    )
    .unwrap();

    let json = serde_json::to_string(&deployment).unwrap();
    assert_eq!(Deployment::from_json_str(&json).unwrap(), deployment);
}
