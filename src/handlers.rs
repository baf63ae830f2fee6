// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers and submission orchestration.
//!
//! One submission runs a fixed pipeline: extract the client identity, check
//! the rate limit, validate the fields, verify the optional token, dispatch
//! to the notifier. The first failing step terminates the pipeline, and the
//! rate check always comes first so abusive clients never pay for
//! validation or dispatch.

use crate::identity::ClientIdentity;
use crate::limiter::RateLimiter;
use crate::notify::{ContactNotification, Notify};
use crate::token::TokenVerifier;
use crate::validator::{FieldIssue, SubmissionPayload, SubmissionValidator};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shared application state.
pub struct AppState {
    pub limiter: RateLimiter,
    pub validator: SubmissionValidator,
    pub tokens: TokenVerifier,
    pub notifier: Arc<dyn Notify>,
}

/// Terminal state of one submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Dispatched to the notification channel
    Sent,
    /// Rejected by the rate limiter
    RateLimited {
        /// Advisory wait until the oldest recorded attempt expires
        retry_after: Duration,
    },
    /// One or more fields violated their constraints
    Invalid { issues: Vec<FieldIssue> },
    /// Submission token missing or mismatched
    TokenRejected,
    /// The notifier reported a failure
    DispatchFailed,
}

/// Success response body.
#[derive(Debug, Serialize)]
pub struct SentResponse {
    pub success: bool,
}

/// Rate-limited response body; `remainingTime` is in whole seconds so a
/// client UI can show a countdown.
#[derive(Debug, Serialize)]
pub struct RateLimitedResponse {
    pub error: String,
    #[serde(rename = "remainingTime")]
    pub remaining_time: u64,
}

/// Validation failure response body.
#[derive(Debug, Serialize)]
pub struct InvalidResponse {
    pub error: &'static str,
    pub issues: Vec<FieldIssue>,
}

/// Generic error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "contact-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Run one submission through the pipeline.
///
/// Time is taken as a parameter so the rate window and token step can be
/// driven deterministically under test; the HTTP handler passes the wall
/// clock.
pub async fn process_submission(
    state: &AppState,
    identity: &ClientIdentity,
    payload: &SubmissionPayload,
    now: DateTime<Utc>,
) -> SubmissionOutcome {
    let identifier = identity.identifier();

    if !state.limiter.admit(&identifier, now).await {
        let retry_after = state.limiter.remaining_cooldown(&identifier, now).await;
        info!(
            ip = %identity.ip,
            retry_after_secs = retry_after.as_secs(),
            "submission rate limited"
        );
        return SubmissionOutcome::RateLimited { retry_after };
    }

    let validation = state.validator.validate(payload);
    if !validation.is_valid() {
        info!(
            ip = %identity.ip,
            issue_count = validation.issues().len(),
            "submission failed validation"
        );
        return SubmissionOutcome::Invalid {
            issues: validation.issues().to_vec(),
        };
    }

    if !state.tokens.verify(&payload.email, payload.token.as_deref(), now) {
        info!(ip = %identity.ip, "submission token rejected");
        return SubmissionOutcome::TokenRejected;
    }

    let notification = ContactNotification::new(payload, identity, now);
    match state.notifier.send(&notification).await {
        Ok(()) => {
            debug!(ip = %identity.ip, "submission dispatched");
            SubmissionOutcome::Sent
        }
        Err(e) => {
            warn!(ip = %identity.ip, error = %e, "notification dispatch failed");
            SubmissionOutcome::DispatchFailed
        }
    }
}

/// Contact form submission endpoint.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SubmissionPayload>,
) -> Response {
    let identity = ClientIdentity::from_headers(&headers);
    let outcome = process_submission(&state, &identity, &payload, Utc::now()).await;
    outcome_response(outcome)
}

/// Map a terminal pipeline state onto the HTTP response contract.
fn outcome_response(outcome: SubmissionOutcome) -> Response {
    match outcome {
        SubmissionOutcome::Sent => {
            (StatusCode::OK, Json(SentResponse { success: true })).into_response()
        }
        SubmissionOutcome::RateLimited { retry_after } => {
            let remaining = retry_after.as_millis().div_ceil(1000) as u64;
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("Retry-After", remaining.to_string())],
                Json(RateLimitedResponse {
                    error: format!(
                        "Too many messages sent. Please try again in {remaining} seconds."
                    ),
                    remaining_time: remaining,
                }),
            )
                .into_response()
        }
        SubmissionOutcome::Invalid { issues } => (
            StatusCode::BAD_REQUEST,
            Json(InvalidResponse {
                error: "Validation failed",
                issues,
            }),
        )
            .into_response(),
        SubmissionOutcome::TokenRejected => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid token",
            }),
        )
            .into_response(),
        SubmissionOutcome::DispatchFailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to send message",
            }),
        )
            .into_response(),
    }
}
