pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod policy;

pub use auth::Authorizer;
pub use handler::{AuthRequest, Handler};
