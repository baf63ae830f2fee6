// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time-derived submission token.
//!
//! The token is a SHA-256 digest over the submitter's email, the current
//! rotation step and a shared secret. It rotates every `rotation_secs`
//! (30 s default), so a captured value is only replayable inside the step
//! it was minted in. With no secret configured the check is disabled and
//! `verify` admits everything.

use crate::config::TokenConfig;
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use sha2::{Digest, Sha256};
use tracing::debug;

/// Verifier for the time-derived submission token.
pub struct TokenVerifier {
    config: TokenConfig,
}

impl TokenVerifier {
    /// Create a new verifier with the given configuration.
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Whether submissions must carry a token at all.
    pub fn required(&self) -> bool {
        self.config.enabled()
    }

    /// Derive the expected token for `email` at `now`.
    pub fn derive(&self, email: &str, now: DateTime<Utc>) -> String {
        let step = now.timestamp() / self.config.rotation_secs as i64;
        let mut hasher = Sha256::new();
        hasher.update(format!("{}-{}-{}", email, step, self.config.secret));
        hex::encode(hasher.finalize())
    }

    /// Check a submitted token against the value derived for `email` at
    /// `now`. Always true when no secret is configured; always false when
    /// one is configured and the submission carries no token.
    ///
    /// Comparison is constant-time so the digest cannot be probed
    /// byte-by-byte through response timing.
    pub fn verify(&self, email: &str, token: Option<&str>, now: DateTime<Utc>) -> bool {
        if !self.config.enabled() {
            return true;
        }

        let Some(token) = token else {
            debug!("submission is missing a token");
            return false;
        };

        let expected = self.derive(email, now);
        constant_time_eq(expected.as_bytes(), token.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_secs(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn verifier(secret: &str) -> TokenVerifier {
        TokenVerifier::new(TokenConfig {
            secret: secret.to_string(),
            rotation_secs: 30,
        })
    }

    #[test]
    fn test_round_trip_within_step() {
        let v = verifier("s3cret");
        let token = v.derive("user@example.com", at_secs(100));
        // 100 and 119 share the same 30s step.
        assert!(v.verify("user@example.com", Some(&token), at_secs(119)));
    }

    #[test]
    fn test_token_rotates_between_steps() {
        let v = verifier("s3cret");
        let token = v.derive("user@example.com", at_secs(100));
        assert!(!v.verify("user@example.com", Some(&token), at_secs(130)));
    }

    #[test]
    fn test_token_is_bound_to_email() {
        let v = verifier("s3cret");
        let token = v.derive("user@example.com", at_secs(100));
        assert!(!v.verify("other@example.com", Some(&token), at_secs(100)));
    }

    #[test]
    fn test_disabled_without_secret() {
        let v = verifier("");
        assert!(!v.required());
        assert!(v.verify("user@example.com", None, at_secs(0)));
        assert!(v.verify("user@example.com", Some("anything"), at_secs(0)));
    }

    #[test]
    fn test_missing_token_rejected_when_required() {
        let v = verifier("s3cret");
        assert!(v.required());
        assert!(!v.verify("user@example.com", None, at_secs(0)));
    }
}
