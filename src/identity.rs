// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Client identity extraction.
//!
//! Derives the rate-limiting key for a request from its forwarded-for and
//! user-agent headers. Extraction never fails: absent or unreadable headers
//! fall back to the `"unknown"` sentinel.

use axum::http::{header, HeaderMap};

/// Sentinel for an absent or unreadable header value.
const UNKNOWN: &str = "unknown";

/// Opaque rate-limiting key for one client.
///
/// Composed from the client address and user agent, joined with a line
/// break; header values cannot contain one, so the two parts can never
/// collide with a different pair. Used only as a map key, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentifier(String);

impl ClientIdentifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The extracted parts of a client's identity.
///
/// Kept separate from [`ClientIdentifier`] so the outbound notification can
/// report IP and user agent individually without splitting the key back
/// apart.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub ip: String,
    pub user_agent: String,
}

impl ClientIdentity {
    /// Extract the client identity from request headers.
    ///
    /// The forwarded-for header may carry a proxy chain; only the first
    /// (client-nearest) entry is used.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ip = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(UNKNOWN)
            .to_string();

        Self { ip, user_agent }
    }

    /// The rate-limiting key for this identity.
    pub fn identifier(&self) -> ClientIdentifier {
        ClientIdentifier(format!("{}\n{}", self.ip, self.user_agent))
    }
}
