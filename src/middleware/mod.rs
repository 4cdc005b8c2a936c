//! Request middleware
//!
//! Provides logging and rate limiting around the authorizer.

pub mod logging;
pub mod rate_limit;

pub use rate_limit::RateLimiter;
