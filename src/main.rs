//! SFTP Authorizer - Entry Point
//!
//! Reads identity-provider events as newline-delimited JSON on stdin and
//! writes one JSON response per line to stdout.

use log::{info, warn};
use sftp_authorizer::auth::{AuthResponse, Authorizer, UserRegistry};
use sftp_authorizer::config::AuthorizerConfig;
use sftp_authorizer::error::AuthorizerError;
use sftp_authorizer::error::handlers::handle_startup_error;
use sftp_authorizer::handler::{AuthRequest, Handler};
use sftp_authorizer::middleware::RateLimiter;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn build_handler() -> Result<Handler, AuthorizerError> {
    let config = AuthorizerConfig::load()?;
    let registry = UserRegistry::from_config(&config)?;

    info!(
        "Loaded {} users for server {} (public bucket {}, subscription bucket {})",
        registry.len(),
        config.server_id,
        config.public_bucket,
        config.subscription_bucket
    );

    let limiter = RateLimiter::new(config.rate_limit_max_attempts, config.rate_limit_window());
    let authorizer = Authorizer::new(registry, config.user_role.clone());
    Ok(Handler::new(authorizer, config.server_id, limiter))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let handler = match build_handler() {
        Ok(handler) => handler,
        Err(e) => std::process::exit(handle_startup_error(&e)),
    };

    info!("Authorizer ready, reading events from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<AuthRequest>(&line) {
            Ok(request) => handler.handle(&request).await,
            Err(e) => {
                // The message can quote field values, so only report the position.
                warn!(
                    "Discarding malformed event ({:?} error at line {} column {})",
                    e.classify(),
                    e.line(),
                    e.column()
                );
                AuthResponse::denied()
            }
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    info!("Input closed, shutting down");
    Ok(())
}
