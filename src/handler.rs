//! Authorization event handler
//!
//! Boundary between the transfer endpoint's identity-provider event and the
//! authorizer. Every refusal, whatever its cause, yields the same empty
//! response.

use crate::auth::{AuthResponse, Authorizer};
use crate::middleware::RateLimiter;
use crate::middleware::logging::{log_event, log_response};
use log::warn;
use serde::Deserialize;
use std::fmt;
use tokio::sync::Mutex;

/// Identity-provider event sent by the transfer endpoint.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub server_id: Option<String>,
    #[serde(default)]
    pub source_ip: Option<String>,
}

impl AuthRequest {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("protocol", &self.protocol)
            .field("server_id", &self.server_id)
            .field("source_ip", &self.source_ip)
            .finish()
    }
}

/// Shared handler: immutable authorizer plus the rate limiter.
pub struct Handler {
    authorizer: Authorizer,
    server_id: String,
    limiter: Mutex<RateLimiter>,
}

impl Handler {
    pub fn new(authorizer: Authorizer, server_id: impl Into<String>, limiter: RateLimiter) -> Self {
        Self {
            authorizer,
            server_id: server_id.into(),
            limiter: Mutex::new(limiter),
        }
    }

    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Handles one event. Never fails; refusals are empty responses.
    pub async fn handle(&self, request: &AuthRequest) -> AuthResponse {
        log_event(request);

        let response = self.decide(request).await;

        log_response(&request.username, &response);
        response
    }

    async fn decide(&self, request: &AuthRequest) -> AuthResponse {
        if let Some(server_id) = &request.server_id {
            if server_id != &self.server_id {
                warn!(
                    "Rejecting event for server {} (configured {})",
                    server_id, self.server_id
                );
                return AuthResponse::denied();
            }
        }

        // Held across the check, authorize and the bookkeeping.
        let mut limiter = self.limiter.lock().await;
        if !limiter.is_allowed(&request.username) {
            warn!("Throttling attempts for {:?}", request.username);
            return AuthResponse::denied();
        }

        let result = self
            .authorizer
            .authorize(&request.username, &request.password);

        if result.is_authorized() {
            limiter.reset(&request.username);
        } else {
            limiter.record_failure(&request.username);
        }
        drop(limiter);

        result.into()
    }
}
