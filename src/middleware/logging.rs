//! Logging middleware
//!
//! Request and decision logging. Passwords never reach the log.

use crate::auth::AuthResponse;
use crate::handler::AuthRequest;
use log::{debug, info};

/// Log an incoming authorization event
pub fn log_event(request: &AuthRequest) {
    // AuthRequest's Debug impl redacts the password.
    debug!("Event: {:?}", request);
    info!(
        "Authorization request for {:?} from {} via {}",
        request.username,
        request.source_ip.as_deref().unwrap_or("unknown"),
        request.protocol.as_deref().unwrap_or("unknown")
    );
}

/// Log the response returned for an event
pub fn log_response(username: &str, response: &AuthResponse) {
    if response.is_empty() {
        info!("Returning empty response for {:?}", username);
    } else {
        info!("Returning grant for {:?}", username);
    }
    debug!("Returning {:?}", response);
}
