//! Configuration management for the SFTP authorizer
//!
//! Everything here is loaded once at startup and never mutated. Values come
//! from an optional `authorizer.toml` and are overridden by the environment
//! (`PUBLIC_BUCKET`, `SUBSCRIBE_BUCKET`, `USER_ROLE`, `SERVER_ID`,
//! `RATE_LIMIT_MAX_ATTEMPTS`, `RATE_LIMIT_WINDOW_SECS`).

use crate::auth::Subscription;
use crate::policy::{BucketName, Buckets};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::time::Duration;

const CONFIG_FILE: &str = "authorizer";
const DEFAULT_MAX_ATTEMPTS: i64 = 5;
const DEFAULT_WINDOW_SECS: i64 = 60;

/// Startup configuration for the authorizer
#[derive(Debug, Deserialize, Clone)]
pub struct AuthorizerConfig {
    /// Bucket holding research shared with every user
    pub public_bucket: BucketName,

    /// Bucket holding per-subscription historical data
    #[serde(alias = "subscribe_bucket")]
    pub subscription_bucket: BucketName,

    /// Role assumed by every authorized session
    pub user_role: String,

    /// Identifier of the transfer server this authorizer answers for
    pub server_id: String,

    /// Failed attempts allowed per username inside one window
    pub rate_limit_max_attempts: usize,
    pub rate_limit_window_secs: u64,

    /// Credential store. Empty means the built-in demo directory.
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

/// One configured user
#[derive(Debug, Deserialize, Clone)]
pub struct UserConfig {
    pub username: String,
    pub salt: String,
    /// Hex SHA-256 of `salt`, a zero byte, then the secret
    pub password_sha256: String,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl AuthorizerConfig {
    /// Load configuration from `authorizer.toml` (optional) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = Self::builder()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::default());
        Self::from_builder(builder)
    }

    /// Load configuration from TOML text only
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        let builder = Self::builder()?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        Config::builder()
            .set_default("rate_limit_max_attempts", DEFAULT_MAX_ATTEMPTS)?
            .set_default("rate_limit_window_secs", DEFAULT_WINDOW_SECS)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        let config: AuthorizerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for values serde cannot check on its own
    fn validate(&self) -> Result<(), config::ConfigError> {
        if !self.user_role.starts_with("arn:") {
            return Err(config::ConfigError::Message(format!(
                "user_role must be an ARN, got {:?}",
                self.user_role
            )));
        }

        if self.server_id.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "server_id cannot be empty".into(),
            ));
        }

        if self.public_bucket == self.subscription_bucket {
            return Err(config::ConfigError::Message(
                "public_bucket and subscription_bucket must differ".into(),
            ));
        }

        if self.rate_limit_max_attempts == 0 {
            return Err(config::ConfigError::Message(
                "rate_limit_max_attempts must be greater than 0".into(),
            ));
        }

        if self.rate_limit_window_secs == 0 {
            return Err(config::ConfigError::Message(
                "rate_limit_window_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn buckets(&self) -> Buckets {
        Buckets::new(self.public_bucket.clone(), self.subscription_bucket.clone())
    }

    /// Get the rate limit window as Duration
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}
