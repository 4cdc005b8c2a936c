//! Authorization validator
//!
//! Checks a username/password pair against the user registry and, on success,
//! assembles the role, scope-down policy and logical home directory for it.

use super::credentials::Credential;
use super::registry::{UserRecord, UserRegistry};
use super::results::{AuthGrant, AuthResult, HomeDirectoryType};
use log::{error, info, warn};

/// Compared against when the username is unknown, so both failure paths hash once.
const DECOY_SALT: &str = "\0decoy";

/// Stateless credential check over an immutable registry.
#[derive(Debug)]
pub struct Authorizer {
    registry: UserRegistry,
    role: String,
    decoy: Credential,
}

impl Authorizer {
    pub fn new(registry: UserRegistry, role: impl Into<String>) -> Self {
        Self {
            registry,
            role: role.into(),
            decoy: Credential::from_secret(DECOY_SALT, ""),
        }
    }

    pub fn registry(&self) -> &UserRegistry {
        &self.registry
    }

    /// Returns `Denied` for an unknown user or a wrong password. The two cases
    /// are indistinguishable to the caller.
    pub fn authorize(&self, username: &str, password: &str) -> AuthResult {
        let Some(record) = self.registry.get(username) else {
            self.decoy.verify(password);
            warn!("Denied authorization for {:?}", username);
            return AuthResult::Denied;
        };

        if !record.credential().verify(password) {
            warn!("Denied authorization for {:?}", username);
            return AuthResult::Denied;
        }

        match self.grant(record) {
            Ok(grant) => {
                info!(
                    "Authorized {} with {} directory entries",
                    username,
                    record.directory_map().len()
                );
                AuthResult::Authorized(grant)
            }
            Err(e) => {
                error!("Failed to serialize grant for {}: {}", username, e);
                AuthResult::Denied
            }
        }
    }

    fn grant(&self, record: &UserRecord) -> Result<AuthGrant, serde_json::Error> {
        Ok(AuthGrant {
            role: self.role.clone(),
            policy: record.policy().to_json()?,
            home_directory_type: HomeDirectoryType::Logical,
            home_directory_details: record.directory_map().to_json()?,
        })
    }
}
