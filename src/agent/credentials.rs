//! API credential resolution

use crate::config::{ApiKeyPolicy, ModelParams};
use crate::error::{ExecutorError, ExecutorResult};

/// Sent to backends that require a bearer token but never check it
pub const PLACEHOLDER_API_KEY: &str = "sk-placeholder";

/// Resolve the credential for one request.
///
/// The environment is read here, at call time, so a key rotated after the
/// deployment was loaded is picked up.
pub fn resolve_api_key(params: &ModelParams) -> ExecutorResult<Option<String>> {
    match params.api_key_policy {
        ApiKeyPolicy::None => Ok(None),
        ApiKeyPolicy::Placeholder => Ok(Some(PLACEHOLDER_API_KEY.to_string())),
        ApiKeyPolicy::Environment => {
            let env_var = params
                .api_key_env
                .as_deref()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ExecutorError::credential("<unset api_key_env>"))?;

            match std::env::var(env_var) {
                Ok(value) if !value.is_empty() => Ok(Some(value)),
                _ => Err(ExecutorError::credential(env_var)),
            }
        }
    }
}
