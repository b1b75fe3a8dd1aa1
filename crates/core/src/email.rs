//! Email address syntax checks.
//!
//! Only the shape `local@domain.tld` is checked locally; whether the
//! mailbox exists is proven by the OTP round trip.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// No whitespace, exactly one `@`, at least one dot in the domain part.
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

pub const MSG_EMAIL_REQUIRED: &str = "Please enter your email address";
pub const MSG_EMAIL_INVALID: &str = "Please enter a valid email address";

/// Whether `email` looks like `local@domain.tld`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim and validate an email typed by the user.
///
/// Returns the trimmed address on success.
pub fn validate_email(raw: &str) -> Result<String, CoreError> {
    let email = raw.trim();
    if email.is_empty() {
        return Err(CoreError::validation(MSG_EMAIL_REQUIRED));
    }
    if !is_valid_email(email) {
        return Err(CoreError::validation(MSG_EMAIL_INVALID));
    }
    Ok(email.to_string())
}
