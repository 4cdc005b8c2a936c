//! Error handling
//!
//! Defines error types for configuration and registry construction.

pub mod handlers;
pub mod types;

pub use types::*;
