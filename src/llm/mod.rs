//! LLM provider abstraction layer
//!
//! This module provides a backend-agnostic completion interface with
//! adapters for OpenAI-compatible APIs and remote inference nodes.

pub mod provider;
pub mod providers;

pub use provider::*;
pub use providers::*;
