//! Task executor agent
//!
//! Prompt construction, credential resolution, the executor itself and the
//! `tool_name` dispatch entry point.

pub mod credentials;
pub mod dispatch;
pub mod executor;
pub mod prompt;

pub use credentials::*;
pub use dispatch::*;
pub use executor::*;
pub use prompt::*;
