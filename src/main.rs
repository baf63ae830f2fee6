// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gateway Service
//!
//! Intake service for a portfolio site's contact form. Every submission
//! passes through rate limiting, field validation and an optional
//! time-derived token check before it is dispatched to the configured
//! webhook.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `RATE_WINDOW_MS`: Rate window in milliseconds (default: 60000)
//! - `RATE_MAX_REQUESTS`: Max submissions per window per client (default: 3)
//! - `CONTACT_WEBHOOK_URL`: Webhook submissions are dispatched to (required)
//! - `CONTACT_TOKEN_SECRET`: Secret for the submission token; empty disables
//!   the check
//! - `TOKEN_ROTATION_SECS`: Token rotation interval (default: 30)
//! - `WEBHOOK_TIMEOUT_SECS`: Webhook request timeout (default: 10)

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_gateway::{
    config::Config,
    handlers::{health, submit, AppState},
    limiter::RateLimiter,
    notify::WebhookNotifier,
    token::TokenVerifier,
    validator::SubmissionValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        token_check = config.token.enabled(),
        "Starting contact gateway"
    );

    // Create application state
    let notifier = WebhookNotifier::new(&config.notify).context("webhook target")?;
    let state = Arc::new(AppState {
        limiter: RateLimiter::new(config.rate_limit.clone()),
        validator: SubmissionValidator::new(),
        tokens: TokenVerifier::new(config.token.clone()),
        notifier: Arc::new(notifier),
    });

    // Spawn cleanup task
    let cleanup_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            cleanup_state.limiter.cleanup(Utc::now()).await;
        }
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/contact", post(submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse().context("bind address")?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    Config {
        bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        rate_limit: contact_gateway::config::RateLimitConfig {
            window_ms: std::env::var("RATE_WINDOW_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60_000),
            max_requests: std::env::var("RATE_MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        },
        token: contact_gateway::config::TokenConfig {
            secret: std::env::var("CONTACT_TOKEN_SECRET").unwrap_or_default(),
            rotation_secs: std::env::var("TOKEN_ROTATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        },
        notify: contact_gateway::config::NotifyConfig {
            webhook_url: std::env::var("CONTACT_WEBHOOK_URL").unwrap_or_default(),
            timeout_secs: std::env::var("WEBHOOK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        },
    }
}
