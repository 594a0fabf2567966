//! Taskstack API Server
//!
//! REST API server for user and todo management.
//!
//! # Features
//!
//! - JWT bearer authentication with Argon2id password hashing
//! - OpenAPI documentation with Swagger UI
//! - Graceful shutdown handling
//! - Health check endpoint
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (dev mode required for the built-in secret)
//! taskstack-server --dev-mode
//!
//! # Start with custom config
//! taskstack-server --config /path/to/config.toml
//!
//! # Start with environment overrides
//! TASKSTACK__SERVER__PORT=9090 JWT_SECRET=... taskstack-server
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskstack_api::{create_router, ApiConfig, AppState};
use taskstack_auth::{AuthConfig, JwtConfig, PasswordConfig, DEV_JWT_SECRET};

use crate::config::ServerConfig;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Taskstack API Server - JWT-guarded users and todos
#[derive(Parser, Debug)]
#[command(name = "taskstack-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long, env = "TASKSTACK_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "TASKSTACK_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "TASKSTACK_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "TASKSTACK_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log format (json, pretty)
    #[arg(long, env = "TASKSTACK_LOG_FORMAT", default_value = "pretty")]
    log_format: String,

    /// JWT signing secret, base64-encoded
    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: Option<String>,

    /// Enable development mode (permits the built-in signing secret)
    #[arg(long, env = "TASKSTACK_DEV_MODE")]
    dev_mode: bool,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    // Override with CLI arguments
    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(jwt_secret) = args.jwt_secret {
        server_config.auth.jwt_secret = jwt_secret;
    }
    server_config.logging.level = args.log_level;
    server_config.logging.format = args.log_format;

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Taskstack API Server"
    );

    validate_config(&server_config, args.dev_mode)?;

    let auth_config = AuthConfig {
        jwt: JwtConfig {
            secret: server_config.auth.jwt_secret.clone(),
            issuer: server_config.auth.jwt_issuer.clone(),
            access_token_lifetime: Duration::from_secs(
                server_config.auth.access_token_lifetime_secs,
            ),
        },
        password: PasswordConfig::default(),
    };

    let state = Arc::new(AppState::in_memory(auth_config)?);

    let api_config = ApiConfig {
        enable_cors: server_config.api.enable_cors,
        cors_origins: server_config.api.cors_origins.clone(),
        enable_compression: server_config.api.enable_compression,
        enable_tracing: server_config.api.enable_tracing,
    };

    let app = create_router(state, api_config);

    let addr = server_config.server.socket_addr()?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // The signal future resolves immediately so the listener stops
    // accepting right away; the drain of in-flight requests is bounded
    // separately by the shutdown timeout.
    let draining = Arc::new(tokio::sync::Notify::new());
    let server = {
        let draining = draining.clone();
        axum::serve(listener, app).with_graceful_shutdown(async move {
            shutdown_signal().await;
            draining.notify_one();
        })
    };

    let shutdown_timeout = server_config.server.shutdown_timeout();
    tokio::select! {
        result = server => result?,
        _ = async {
            draining.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "In-flight requests did not finish before the drain deadline"
            );
        }
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &config::LoggingConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber.with(fmt::layer().json().with_target(true)).init();
        }
        _ => {
            subscriber.with(fmt::layer().pretty().with_target(true)).init();
        }
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServerConfig, dev_mode: bool) -> anyhow::Result<()> {
    if !dev_mode && config.auth.jwt_secret == DEV_JWT_SECRET {
        anyhow::bail!(
            "The built-in JWT secret is for development only. Set JWT_SECRET, or pass --dev-mode."
        );
    }

    let auth_config = AuthConfig {
        jwt: JwtConfig {
            secret: config.auth.jwt_secret.clone(),
            issuer: config.auth.jwt_issuer.clone(),
            access_token_lifetime: Duration::from_secs(config.auth.access_token_lifetime_secs),
        },
        password: PasswordConfig::default(),
    };

    let problems = auth_config.validate();
    if !problems.is_empty() {
        anyhow::bail!("Invalid configuration: {}", problems.join("; "));
    }

    Ok(())
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
