// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound notification dispatch.
//!
//! Accepted submissions are handed to a [`Notify`] implementation exactly
//! once. The production implementation posts a Discord-style embed to a
//! configured webhook URL; a failed or non-success call is reported back to
//! the submission handler, which surfaces it to the caller. No retries and
//! no queueing happen on this side.

use crate::config::NotifyConfig;
use crate::identity::ClientIdentity;
use crate::validator::SubmissionPayload;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Accent color of the embed, matching the site's primary blue.
const EMBED_COLOR: u32 = 0x3b82f6;

/// Dispatch error types.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("webhook URL is not configured")]
    MissingTarget,

    #[error("invalid webhook URL {url:?}: {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook rejected the notification with status {status}")]
    Rejected { status: u16 },
}

/// A validated submission on its way to the notification channel.
#[derive(Debug, Clone)]
pub struct ContactNotification {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub client_ip: String,
    pub user_agent: String,
    pub received_at: DateTime<Utc>,
}

impl ContactNotification {
    /// Assemble a notification from a validated payload and the client
    /// identity it arrived with.
    pub fn new(payload: &SubmissionPayload, identity: &ClientIdentity, received_at: DateTime<Utc>) -> Self {
        Self {
            name: payload.name.clone(),
            email: payload.email.clone(),
            subject: payload.subject.clone(),
            message: payload.message.clone(),
            client_ip: identity.ip.clone(),
            user_agent: identity.user_agent.clone(),
            received_at,
        }
    }
}

/// Notification channel contract.
///
/// `send` is called at most once per submission and must report failure
/// synchronously; the handler turns it into a user-visible error instead of
/// dropping the message silently.
#[async_trait]
pub trait Notify: Send + Sync {
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotifyError>;
}

/// Webhook-backed notifier.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: Url,
}

impl WebhookNotifier {
    /// Create a notifier for the configured webhook target.
    ///
    /// The URL is parsed and checked up front so a misconfigured target
    /// fails at startup rather than on the first submission.
    pub fn new(config: &NotifyConfig) -> Result<Self, NotifyError> {
        if config.webhook_url.is_empty() {
            return Err(NotifyError::MissingTarget);
        }

        let url = Url::parse(&config.webhook_url).map_err(|e| NotifyError::InvalidTarget {
            url: config.webhook_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(NotifyError::InvalidTarget {
                url: config.webhook_url.clone(),
                reason: "expected an http(s) URL with a host".to_string(),
            });
        }

        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notify for WebhookNotifier {
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&embed_body(notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
            });
        }

        debug!(status = status.as_u16(), "notification dispatched");
        Ok(())
    }
}

/// Build the Discord-style embed payload for a notification.
fn embed_body(notification: &ContactNotification) -> Value {
    json!({
        "embeds": [{
            "title": "New contact form message",
            "color": EMBED_COLOR,
            "fields": [
                { "name": "Name", "value": notification.name, "inline": true },
                { "name": "Email", "value": notification.email, "inline": true },
                { "name": "Subject", "value": notification.subject },
                { "name": "Message", "value": notification.message },
                {
                    "name": "Client",
                    "value": format!("IP: {}\nUser agent: {}", notification.client_ip, notification.user_agent),
                },
            ],
            "footer": { "text": "Portfolio contact form" },
            "timestamp": notification.received_at.to_rfc3339(),
        }]
    })
}
