//! Authorization result types
//!
//! `AuthResult` is what the authorizer decides; `AuthResponse` is the wire
//! form handed back to the transfer endpoint.

use serde::{Deserialize, Serialize};

/// How the endpoint should interpret the home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HomeDirectoryType {
    /// The home directory is the virtual namespace described by a directory map.
    Logical,
}

/// Everything granted to a session that authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub role: String,
    /// JSON scope-down policy
    pub policy: String,
    pub home_directory_type: HomeDirectoryType,
    /// JSON array of `{Entry, Target}` rules
    pub home_directory_details: String,
}

/// Outcome of a single authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authorized(AuthGrant),
    Denied,
}

impl AuthResult {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthResult::Authorized(_))
    }

    pub fn grant(&self) -> Option<&AuthGrant> {
        match self {
            AuthResult::Authorized(grant) => Some(grant),
            AuthResult::Denied => None,
        }
    }
}

/// Response body. A denial serializes to `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_directory_type: Option<HomeDirectoryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_directory_details: Option<String>,
}

impl AuthResponse {
    pub fn denied() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        match result {
            AuthResult::Authorized(grant) => Self {
                role: Some(grant.role),
                policy: Some(grant.policy),
                home_directory_type: Some(grant.home_directory_type),
                home_directory_details: Some(grant.home_directory_details),
            },
            AuthResult::Denied => Self::denied(),
        }
    }
}
