// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the contact gateway components.

use chrono::{DateTime, Utc};
use contact_gateway::{
    config::RateLimitConfig,
    identity::ClientIdentity,
    limiter::RateLimiter,
    validator::{SubmissionPayload, SubmissionValidator},
};
use std::time::Duration;

fn at(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap()
}

fn identity(ip: &str, agent: &str) -> ClientIdentity {
    ClientIdentity {
        ip: ip.to_string(),
        user_agent: agent.to_string(),
    }
}

fn payload() -> SubmissionPayload {
    SubmissionPayload {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.org".to_string(),
        subject: "Analytical engines".to_string(),
        message: "A note long enough to clear the minimum length.".to_string(),
        token: None,
    }
}

#[tokio::test]
async fn test_full_admit_and_validate_flow() {
    let limiter = RateLimiter::new(RateLimitConfig {
        window_ms: 60_000,
        max_requests: 3,
    });
    let validator = SubmissionValidator::new();
    let id = identity("192.168.1.100", "Mozilla/5.0").identifier();

    assert!(limiter.admit(&id, at(0)).await);
    assert!(validator.validate(&payload()).is_valid());
}

#[tokio::test]
async fn test_rate_limit_exhaustion() {
    let limiter = RateLimiter::new(RateLimitConfig {
        window_ms: 60_000,
        max_requests: 3,
    });
    let id = identity("10.0.0.1", "curl/8.4").identifier();

    for i in 0..3 {
        assert!(limiter.admit(&id, at(i * 100)).await, "request {} should be allowed", i + 1);
    }
    assert!(!limiter.admit(&id, at(400)).await);

    let cooldown = limiter.remaining_cooldown(&id, at(400)).await;
    assert_eq!(cooldown, Duration::from_millis(59_600));
}

#[tokio::test]
async fn test_same_ip_different_agent_is_a_different_client() {
    let limiter = RateLimiter::new(RateLimitConfig {
        window_ms: 60_000,
        max_requests: 1,
    });

    let browser = identity("10.0.0.1", "Mozilla/5.0").identifier();
    let script = identity("10.0.0.1", "curl/8.4").identifier();

    assert!(limiter.admit(&browser, at(0)).await);
    assert!(!limiter.admit(&browser, at(1)).await);
    assert!(limiter.admit(&script, at(1)).await);
}

#[tokio::test]
async fn test_validation_rejects_oversized_message() {
    let validator = SubmissionValidator::new();
    let mut p = payload();
    p.message = "x".repeat(5001);

    let result = validator.validate(&p);
    assert!(!result.is_valid());
    assert!(result.issues().iter().any(|i| i.field == "message"));
}
