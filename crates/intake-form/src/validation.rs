//! Ordered submission validation
//!
//! Rules run in a fixed order and stop at the first failure:
//! 1. required fields present
//! 2. platform in its set
//! 3. outcome in its set
//! 4. email shape
//! 5. both consents affirmed

use crate::error::{Field, ValidationError};
use crate::payload::{Outcome, Platform, SubmissionPayload, ValidatedPayload};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

/// `local@domain.tld`, no whitespace, exactly one `@`
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Validate a raw submission
///
/// # Errors
/// Returns the first [`ValidationError`] encountered, in rule order.
pub fn validate(payload: &SubmissionPayload) -> Result<ValidatedPayload, ValidationError> {
    let name = required(payload.name.as_deref(), Field::Name)?;
    let email = required(payload.email.as_deref(), Field::Email)?;
    let platform = required(payload.platform.as_deref(), Field::Platform)?;
    let outcome = required(payload.outcome.as_deref(), Field::Outcome)?;

    let platform = Platform::from_str(platform).map_err(|_| ValidationError::InvalidEnum {
        field: Field::Platform,
        value: platform.to_string(),
    })?;
    let outcome = Outcome::from_str(outcome).map_err(|_| ValidationError::InvalidEnum {
        field: Field::Outcome,
        value: outcome.to_string(),
    })?;

    if !is_plausible_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    if payload.consent_files != Some(true) || payload.consent_data != Some(true) {
        return Err(ValidationError::ConsentRequired);
    }

    let figma_url = payload
        .figma_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string);

    Ok(ValidatedPayload {
        name: name.to_string(),
        email: email.to_string(),
        platform,
        figma_url,
        outcome,
        consent_files: true,
        consent_data: true,
    })
}

/// Basic address heuristic, not RFC 5322
#[must_use]
pub fn is_plausible_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

fn required(value: Option<&str>, field: Field) -> Result<&str, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::MissingField(field)),
    }
}
