// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Gateway
//!
//! This crate provides the intake pipeline for a portfolio site's contact
//! form, run as a standalone ingress service:
//!
//! - Per-client sliding-window rate limiting (3 per minute default)
//! - Server-side field validation (length bounds, character whitelists)
//! - Optional time-derived submission token check
//! - Webhook dispatch of accepted submissions
//!
//! Rejections always happen in that order: a rate-limited client never pays
//! for validation, and nothing reaches the webhook before every check has
//! passed.

pub mod config;
pub mod handlers;
pub mod identity;
pub mod limiter;
pub mod notify;
pub mod token;
pub mod validator;

pub use config::Config;
pub use identity::{ClientIdentifier, ClientIdentity};
pub use limiter::RateLimiter;
pub use notify::{ContactNotification, Notify, WebhookNotifier};
pub use token::TokenVerifier;
pub use validator::{FieldIssue, SubmissionValidator, ValidationResult};
