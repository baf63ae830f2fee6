// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact gateway.
//!
//! Everything is fixed at process start; the rate-limit window map is the
//! only mutable state in the service and lives in memory only.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the contact gateway service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Submission token configuration
    #[serde(default)]
    pub token: TokenConfig,

    /// Webhook dispatch configuration
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Sliding-window rate limit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window duration in milliseconds (default: 60000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Maximum admitted submissions per window per client (default: 3)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
}

/// Time-derived submission token settings.
///
/// The check is active only when a secret is configured; an empty secret
/// disables it and the handler skips straight to dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Shared secret mixed into the token digest (default: empty = disabled)
    #[serde(default)]
    pub secret: String,

    /// Seconds before the derived token rotates (default: 30)
    #[serde(default = "default_rotation_secs")]
    pub rotation_secs: u64,
}

/// Outbound webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook URL submissions are dispatched to
    #[serde(default)]
    pub webhook_url: String,

    /// Request timeout for the webhook call in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_window_ms() -> u64 {
    60_000
}

fn default_max_requests() -> u32 {
    3
}

fn default_rotation_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            token: TokenConfig::default(),
            notify: NotifyConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            rotation_secs: default_rotation_secs(),
        }
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RateLimitConfig {
    /// Get the window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl TokenConfig {
    /// Whether the token check is active.
    pub fn enabled(&self) -> bool {
        !self.secret.is_empty()
    }
}

impl NotifyConfig {
    /// Get the webhook request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
