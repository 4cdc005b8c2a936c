//! Error types
//!
//! Defines domain-specific error types for each module of the authorizer.
//! Rejected credentials are not errors; these only surface while building
//! the configuration and the user registry.

use std::fmt;

/// Resource builder errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    InvalidBucketName(String),
    InvalidSubPath(String),
    ForeignResource(String),
    ForeignTarget(String),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::InvalidBucketName(b) => write!(f, "Invalid bucket name: {:?}", b),
            ResourceError::InvalidSubPath(p) => write!(f, "Invalid sub-path: {:?}", p),
            ResourceError::ForeignResource(r) => {
                write!(f, "Resource outside configured buckets: {}", r)
            }
            ResourceError::ForeignTarget(t) => {
                write!(f, "Directory target outside configured buckets: {}", t)
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// User registry errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateUser(String),
    DuplicateEntry { username: String, entry: String },
    InvalidUsername(String),
    InvalidCredential(String),
    Resource(ResourceError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateUser(u) => write!(f, "Duplicate user: {}", u),
            RegistryError::DuplicateEntry { username, entry } => {
                write!(f, "Duplicate directory entry {} for user {}", entry, username)
            }
            RegistryError::InvalidUsername(u) => write!(f, "Invalid username: {:?}", u),
            RegistryError::InvalidCredential(u) => {
                write!(f, "Invalid password digest for user: {}", u)
            }
            RegistryError::Resource(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<ResourceError> for RegistryError {
    fn from(error: ResourceError) -> Self {
        RegistryError::Resource(error)
    }
}

/// Startup error that encompasses all error types
#[derive(Debug)]
pub enum AuthorizerError {
    Config(config::ConfigError),
    Registry(RegistryError),
}

impl fmt::Display for AuthorizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizerError::Config(e) => write!(f, "Configuration error: {}", e),
            AuthorizerError::Registry(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl std::error::Error for AuthorizerError {}

impl From<config::ConfigError> for AuthorizerError {
    fn from(error: config::ConfigError) -> Self {
        AuthorizerError::Config(error)
    }
}

impl From<RegistryError> for AuthorizerError {
    fn from(error: RegistryError) -> Self {
        AuthorizerError::Registry(error)
    }
}
