//! Testing utilities and mock implementations
//!
//! Mocks for exercising the executor without a completion backend.

pub mod mocks;

pub use mocks::*;
