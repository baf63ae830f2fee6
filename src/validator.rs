// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission validator.
//!
//! Re-checks every field server-side regardless of what the client form
//! already validated:
//! - `name`: 2-100 chars, letters (including Latin-1 accents), spaces, hyphens
//! - `email`: at most 254 chars, standard address shape
//! - `subject`: 5-200 chars, no angle brackets or braces
//! - `message`: 10-5000 chars, no angle brackets or braces
//!
//! Checks are pure and field-independent; all violations are accumulated so
//! the caller can surface every problem at once.

use serde::{Deserialize, Serialize};

/// Length bounds, in Unicode scalar values.
const NAME_LEN: (usize, usize) = (2, 100);
const EMAIL_MAX_LEN: usize = 254;
const SUBJECT_LEN: (usize, usize) = (5, 200);
const MESSAGE_LEN: (usize, usize) = (10, 5000);

/// A contact form submission, as deserialized from the request body.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// A single field violation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Result of validating a submission.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// All fields are within bounds
    Valid,
    /// One or more fields violated their constraints
    Invalid(Vec<FieldIssue>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn issues(&self) -> &[FieldIssue] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(issues) => issues,
        }
    }
}

/// Contact submission validator.
#[derive(Debug, Default)]
pub struct SubmissionValidator;

impl SubmissionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a complete submission, accumulating every violation.
    ///
    /// Re-validating the same payload always yields the same result; there
    /// is no hidden state and no I/O here.
    pub fn validate(&self, payload: &SubmissionPayload) -> ValidationResult {
        let issues: Vec<FieldIssue> = [
            check_name(&payload.name),
            check_email(&payload.email),
            check_subject(&payload.subject),
            check_message(&payload.message),
        ]
        .into_iter()
        .flatten()
        .collect();

        if issues.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(issues)
        }
    }
}

fn check_name(name: &str) -> Option<FieldIssue> {
    let len = name.chars().count();
    if len < NAME_LEN.0 {
        return Some(FieldIssue::new("name", "Name must be at least 2 characters"));
    }
    if len > NAME_LEN.1 {
        return Some(FieldIssue::new("name", "Name is too long"));
    }
    if !name.chars().all(name_char_ok) {
        return Some(FieldIssue::new("name", "Name contains disallowed characters"));
    }
    None
}

fn check_email(email: &str) -> Option<FieldIssue> {
    if email.chars().count() > EMAIL_MAX_LEN {
        return Some(FieldIssue::new("email", "Email is too long"));
    }
    if !email_format_ok(email) {
        return Some(FieldIssue::new("email", "Invalid email format"));
    }
    None
}

fn check_subject(subject: &str) -> Option<FieldIssue> {
    let len = subject.chars().count();
    if len < SUBJECT_LEN.0 {
        return Some(FieldIssue::new("subject", "Subject must be at least 5 characters"));
    }
    if len > SUBJECT_LEN.1 {
        return Some(FieldIssue::new("subject", "Subject is too long"));
    }
    if contains_markup_char(subject) {
        return Some(FieldIssue::new("subject", "Subject contains disallowed characters"));
    }
    None
}

fn check_message(message: &str) -> Option<FieldIssue> {
    let len = message.chars().count();
    if len < MESSAGE_LEN.0 {
        return Some(FieldIssue::new("message", "Message must be at least 10 characters"));
    }
    if len > MESSAGE_LEN.1 {
        return Some(FieldIssue::new("message", "Message is too long"));
    }
    if contains_markup_char(message) {
        return Some(FieldIssue::new("message", "Message contains disallowed characters"));
    }
    None
}

/// Letters (ASCII or Latin-1 accented), whitespace and hyphens.
fn name_char_ok(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{00FF}').contains(&c) || c.is_whitespace() || c == '-'
}

/// Angle brackets and braces are never legitimate in a subject or message.
fn contains_markup_char(s: &str) -> bool {
    s.chars().any(|c| matches!(c, '<' | '>' | '{' | '}'))
}

/// `local@domain.tld` with a restricted character set on both sides and an
/// alphabetic final label of at least two characters.
fn email_format_ok(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
    {
        return false;
    }

    if domain.is_empty()
        || !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}
