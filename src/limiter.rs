// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window rate limiter for contact submissions.
//!
//! Tracks the timestamps of recently admitted submissions per client
//! identifier. A submission is admitted while fewer than `max_requests`
//! timestamps fall inside the trailing window; rejected attempts are not
//! recorded, so hammering the endpoint does not extend the lockout.
//!
//! Time is always passed in by the caller, which keeps window sliding
//! deterministic under test.

use crate::config::RateLimitConfig;
use crate::identity::ClientIdentifier;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Thread-safe sliding-window rate limiter.
///
/// The window map is process-local; restarting the service forgets all
/// history. That only bounds abuse, not correctness.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Per-identifier timestamps (epoch milliseconds) of admitted submissions
    windows: RwLock<HashMap<ClientIdentifier, Vec<i64>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Decide whether a submission from `identifier` at `now` is admitted.
    ///
    /// Prunes expired timestamps, then either records `now` and admits, or
    /// rejects without recording. Prune, check and append happen under one
    /// write lock, so concurrent requests for the same identifier cannot
    /// both take the last slot.
    ///
    /// A timestamp exactly `window_ms` old is already expired: the window
    /// is the half-open interval `(now - window_ms, now]`.
    pub async fn admit(&self, identifier: &ClientIdentifier, now: DateTime<Utc>) -> bool {
        let now_ms = now.timestamp_millis();
        let window_start = now_ms - self.config.window_ms as i64;

        let mut windows = self.windows.write().await;
        let stamps = windows.entry(identifier.clone()).or_default();
        stamps.retain(|&t| t > window_start);

        if stamps.len() >= self.config.max_requests as usize {
            debug!(identifier = identifier.as_str(), "submission rejected by rate limit");
            return false;
        }

        stamps.push(now_ms);
        true
    }

    /// Advisory cooldown until the oldest recorded submission leaves the
    /// window. Zero for an identifier with no recorded submissions.
    ///
    /// Reads the window as-is without pruning; this is only used to build
    /// the retry message, never for the admit decision.
    pub async fn remaining_cooldown(
        &self,
        identifier: &ClientIdentifier,
        now: DateTime<Utc>,
    ) -> Duration {
        let windows = self.windows.read().await;
        match windows.get(identifier).and_then(|stamps| stamps.first()) {
            Some(&oldest) => {
                let remaining_ms = oldest + self.config.window_ms as i64 - now.timestamp_millis();
                if remaining_ms > 0 {
                    Duration::from_millis(remaining_ms as u64)
                } else {
                    Duration::ZERO
                }
            }
            None => Duration::ZERO,
        }
    }

    /// Drop identifiers whose windows are entirely expired (should be
    /// called periodically).
    pub async fn cleanup(&self, now: DateTime<Utc>) {
        let window_start = now.timestamp_millis() - self.config.window_ms as i64;
        let mut windows = self.windows.write().await;
        windows.retain(|_, stamps| {
            stamps.retain(|&t| t > window_start);
            !stamps.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            window_ms: 60_000,
            max_requests: 3,
        }
    }

    fn key(name: &str) -> ClientIdentifier {
        crate::identity::ClientIdentity {
            ip: name.to_string(),
            user_agent: "test".to_string(),
        }
        .identifier()
    }

    #[tokio::test]
    async fn test_admits_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(test_config());
        let id = key("10.0.0.1");

        for i in 0..3 {
            assert!(limiter.admit(&id, at(i * 1000)).await, "request {} should pass", i + 1);
        }
        assert!(!limiter.admit(&id, at(3000)).await);
    }

    #[tokio::test]
    async fn test_window_slides_forward() {
        let limiter = RateLimiter::new(test_config());
        let id = key("10.0.0.1");

        for i in 0..3 {
            assert!(limiter.admit(&id, at(i * 1000)).await);
        }
        assert!(!limiter.admit(&id, at(5000)).await);

        // 61s after the oldest admitted timestamp the slot is free again.
        assert!(limiter.admit(&id, at(61_000)).await);
    }

    #[tokio::test]
    async fn test_boundary_timestamp_counts_as_expired() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window_ms: 60_000,
            max_requests: 1,
        });
        let id = key("10.0.0.1");

        assert!(limiter.admit(&id, at(0)).await);
        assert!(!limiter.admit(&id, at(59_999)).await);
        // Exactly window_ms later the original timestamp is pruned.
        assert!(limiter.admit(&id, at(60_000)).await);
    }

    #[tokio::test]
    async fn test_rejected_attempts_are_not_recorded() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window_ms: 60_000,
            max_requests: 1,
        });
        let id = key("10.0.0.1");

        assert!(limiter.admit(&id, at(0)).await);
        // Hammering while limited must not push the cooldown out.
        for ms in (10_000..60_000).step_by(10_000) {
            assert!(!limiter.admit(&id, at(ms)).await);
        }
        assert!(limiter.admit(&id, at(60_001)).await);
    }

    #[tokio::test]
    async fn test_identifiers_are_independent() {
        let limiter = RateLimiter::new(RateLimitConfig {
            window_ms: 60_000,
            max_requests: 1,
        });

        assert!(limiter.admit(&key("10.0.0.1"), at(0)).await);
        assert!(!limiter.admit(&key("10.0.0.1"), at(1)).await);
        assert!(limiter.admit(&key("10.0.0.2"), at(1)).await);
    }

    #[tokio::test]
    async fn test_cooldown_zero_without_history() {
        let limiter = RateLimiter::new(test_config());
        assert_eq!(
            limiter.remaining_cooldown(&key("10.0.0.1"), at(0)).await,
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn test_cooldown_tracks_oldest_timestamp() {
        let limiter = RateLimiter::new(test_config());
        let id = key("10.0.0.1");

        limiter.admit(&id, at(0)).await;
        limiter.admit(&id, at(2000)).await;
        limiter.admit(&id, at(4000)).await;

        assert_eq!(
            limiter.remaining_cooldown(&id, at(5000)).await,
            Duration::from_millis(55_000)
        );
        assert_eq!(
            limiter.remaining_cooldown(&id, at(70_000)).await,
            Duration::ZERO
        );
    }

    #[tokio::test]
    async fn test_cleanup_drops_expired_identifiers() {
        let limiter = RateLimiter::new(test_config());
        let id = key("10.0.0.1");

        limiter.admit(&id, at(0)).await;
        limiter.cleanup(at(61_000)).await;

        assert!(limiter.windows.read().await.is_empty());
    }
}
