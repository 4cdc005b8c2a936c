//! Authentication and authorization
//!
//! Credential checks against an immutable user registry and assembly of the
//! per-user role, policy and logical home directory.

pub mod credentials;
pub mod registry;
pub mod results;
pub mod validator;

pub use credentials::Credential;
pub use registry::{Subscription, UserRecord, UserRegistry};
pub use results::{AuthGrant, AuthResponse, AuthResult, HomeDirectoryType};
pub use validator::Authorizer;
