//! Error handlers
//!
//! Reports fatal startup errors.

use crate::error::types::AuthorizerError;
use log::error;

/// Log a startup error and return the process exit code for it
pub fn handle_startup_error(err: &AuthorizerError) -> i32 {
    error!("Authorizer startup failed: {}", err);
    exit_code(err)
}

/// Map a startup error to a process exit code
pub fn exit_code(err: &AuthorizerError) -> i32 {
    match err {
        AuthorizerError::Config(_) => 78,
        AuthorizerError::Registry(_) => 65,
    }
}
